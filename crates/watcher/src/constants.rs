//! Default values of the scanner configuration.

use std::time::Duration;

/// The default number of in-flight block requests.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// The default capacity of the notification channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// The default maximum number of retries for a failed request.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// The default delay before the first retry, in milliseconds.
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 100;

/// The default timeout of a single request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The default number of processed blocks between two checkpoint writes.
pub const DEFAULT_CHECKPOINT_INTERVAL: u64 = 100;
