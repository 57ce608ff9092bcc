use crate::{
    constants::{
        DEFAULT_CHANNEL_CAPACITY, DEFAULT_CHECKPOINT_INTERVAL, DEFAULT_CONCURRENCY,
        DEFAULT_REQUEST_TIMEOUT,
    },
    retry::Retry,
};

use std::{path::PathBuf, time::Duration};

use commit_scanner_codec::CalldataDecoder;
use commit_scanner_primitives::{BlockRange, InvalidConfiguration, ScanTarget};

/// What the scanner does with a matching transaction whose calldata fails to decode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Stop the scan and return the error.
    #[default]
    Abort,
    /// Report the transaction as skipped and continue.
    Skip,
}

/// The checkpointing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointConfig {
    /// The path of the checkpoint file.
    pub path: PathBuf,
    /// The number of processed blocks between two checkpoint writes.
    pub interval: u64,
}

impl CheckpointConfig {
    /// Returns a configuration writing to `path` every [`DEFAULT_CHECKPOINT_INTERVAL`] blocks.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), interval: DEFAULT_CHECKPOINT_INTERVAL }
    }

    /// Sets the checkpoint interval, a zero interval checkpoints every block.
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }
}

/// The configuration of a [`crate::BatchCommitmentScanner`].
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// The recipient and selector of matching transactions.
    pub target: ScanTarget,
    /// The first block to scan.
    pub from_block: u64,
    /// The last block to scan, defaults to the chain head at start.
    pub to_block: Option<u64>,
    /// The decoder extracting the commitment from matching calldata.
    pub decoder: CalldataDecoder,
    /// The handling of malformed calldata.
    pub malformed_policy: MalformedPolicy,
    /// The number of in-flight block requests.
    pub concurrency: usize,
    /// The retry policy for requests.
    pub retry: Retry,
    /// The timeout of a single request.
    pub request_timeout: Duration,
    /// The optional checkpointing configuration.
    pub checkpoint: Option<CheckpointConfig>,
    /// The capacity of the notification channel.
    pub channel_capacity: usize,
}

impl ScannerConfig {
    /// Returns a configuration scanning from genesis to the chain head with default settings.
    pub fn new(target: ScanTarget, decoder: CalldataDecoder) -> Self {
        Self {
            target,
            from_block: 0,
            to_block: None,
            decoder,
            malformed_policy: MalformedPolicy::default(),
            concurrency: DEFAULT_CONCURRENCY,
            retry: Retry::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            checkpoint: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Sets the block range. A missing end scans up to the chain head.
    pub const fn with_range(mut self, from_block: u64, to_block: Option<u64>) -> Self {
        self.from_block = from_block;
        self.to_block = to_block;
        self
    }

    /// Sets the malformed calldata policy.
    pub const fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.malformed_policy = policy;
        self
    }

    /// Sets the number of in-flight block requests.
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the retry policy.
    pub const fn with_retry(mut self, retry: Retry) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the request timeout.
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enables checkpointing.
    pub fn with_checkpoint(mut self, checkpoint: CheckpointConfig) -> Self {
        self.checkpoint = Some(checkpoint);
        self
    }

    /// Sets the capacity of the notification channel.
    pub const fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        if self.concurrency == 0 {
            return Err(InvalidConfiguration::ZeroConcurrency);
        }
        if let Some(to_block) = self.to_block {
            BlockRange::checked(self.from_block, to_block)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commit_scanner_primitives::FunctionSelector;

    fn config() -> eyre::Result<ScannerConfig> {
        Ok(ScannerConfig::new(
            ScanTarget::new(Default::default(), FunctionSelector::default()),
            CalldataDecoder::commit_batches_shared_bridge()?,
        ))
    }

    #[test]
    fn test_default_config_is_valid() -> eyre::Result<()> {
        let config = config()?;
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.malformed_policy, MalformedPolicy::Abort);
        assert_eq!(config.retry, Retry::new(Some(3), 100, true));
        config.validate()?;
        Ok(())
    }

    #[test]
    fn test_reject_invalid_config() -> eyre::Result<()> {
        assert_eq!(
            config()?.with_concurrency(0).validate(),
            Err(InvalidConfiguration::ZeroConcurrency)
        );
        assert_eq!(
            config()?.with_range(10, Some(5)).validate(),
            Err(InvalidConfiguration::InvertedRange { start: 10, end: 5 })
        );
        config()?.with_range(10, None).validate()?;
        Ok(())
    }

    #[test]
    fn test_zero_checkpoint_interval() {
        assert_eq!(CheckpointConfig::new("checkpoint.json").with_interval(0).interval, 1);
    }
}
