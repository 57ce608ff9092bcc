//! Retry policy for transient request failures.

use crate::constants::{DEFAULT_INITIAL_BACKOFF_MS, DEFAULT_MAX_RETRIES};

use std::{fmt::Debug, future::Future, time::Duration};

/// A type used for retrying transient failures in requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retry {
    /// Maximum number of retry attempts. None means infinite retries.
    pub max_retries: Option<usize>,
    /// Initial delay between retries in milliseconds.
    pub initial_delay_ms: u64,
    /// Whether to use exponential backoff.
    pub exponential_backoff: bool,
}

impl Default for Retry {
    fn default() -> Self {
        Self {
            max_retries: Some(DEFAULT_MAX_RETRIES),
            initial_delay_ms: DEFAULT_INITIAL_BACKOFF_MS,
            exponential_backoff: true,
        }
    }
}

impl Retry {
    /// Creates a new [`Retry`] with the specified parameters.
    pub const fn new(
        max_retries: Option<usize>,
        initial_delay_ms: u64,
        exponential_backoff: bool,
    ) -> Self {
        Self { max_retries, initial_delay_ms, exponential_backoff }
    }

    /// Returns a [`Retry`] which never retries.
    pub const fn none() -> Self {
        Self::new(Some(0), 0, false)
    }

    /// Returns the delay before the retry `attempt`, starting at 1.
    pub fn delay(&self, attempt: usize) -> Duration {
        let delay_ms = if self.exponential_backoff {
            let exponent = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
            self.initial_delay_ms.saturating_mul(2_u64.saturating_pow(exponent))
        } else {
            self.initial_delay_ms
        };
        Duration::from_millis(delay_ms)
    }

    /// Retry an asynchronous operation with the configured retry strategy. Errors which cannot
    /// be retried are returned immediately.
    pub async fn retry<F, Fut, T, E>(&self, operation_name: &str, operation: F) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: CanRetry + Debug,
    {
        let mut attempt: usize = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    if !error.can_retry() {
                        return Err(error);
                    }
                    if let Some(max_retries) = self.max_retries {
                        if attempt >= max_retries {
                            tracing::debug!(
                                target: "commit_scanner::watcher",
                                operation = operation_name,
                                ?error,
                                attempts = attempt + 1,
                                "Retries exhausted"
                            );
                            return Err(error);
                        }
                    }

                    attempt += 1;
                    tracing::debug!(
                        target: "commit_scanner::watcher",
                        operation = operation_name,
                        ?error,
                        attempt,
                        "Retrying operation"
                    );

                    tokio::time::sleep(self.delay(attempt)).await;
                }
            }
        }
    }
}

/// A trait for errors that can indicate whether an operation can be retried.
pub trait CanRetry {
    /// Returns true if the implementer can be retried.
    fn can_retry(&self) -> bool;
}
