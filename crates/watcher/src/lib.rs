//! Scanner extracting batch commitments from the calldata of commit transactions.

mod checkpoint;
pub use checkpoint::{Checkpoint, CheckpointError, FileCheckpointStore};

mod config;
pub use config::{CheckpointConfig, MalformedPolicy, ScannerConfig};

pub mod constants;

mod error;
pub use error::{RpcRequest, ScannerError};

mod fetcher;
use fetcher::BlockFetcher;

mod handle;
pub use handle::{ScanStream, ScannerHandle};

mod metrics;
pub use metrics::ScannerMetrics;

mod provider;
pub use provider::BlockProvider;

mod retry;
pub use retry::{CanRetry, Retry};

#[cfg(any(test, feature = "test-utils"))]
/// Common test helpers
pub mod test_utils;

use error::ScannerResult;

use alloy_network::{Ethereum, Network};
use alloy_rpc_types_eth::{BlockTransactions, TransactionTrait};
use commit_scanner_primitives::{BlockRange, ExtractedCommitment, TxLocation, SELECTOR_LEN};
use futures::{stream, StreamExt};
use std::fmt::{Display, Formatter};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// The Ethereum block response.
pub type Block = <Ethereum as Network>::BlockResponse;

/// The notification type yielded by the [`BatchCommitmentScanner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanNotification {
    /// A commitment was extracted from a matching transaction.
    Commitment(ExtractedCommitment),
    /// A matching transaction was skipped because its calldata failed to decode.
    Skipped {
        /// The location of the skipped transaction.
        location: TxLocation,
        /// The reason the transaction was skipped.
        reason: String,
    },
    /// All the transactions of the block were processed.
    Processed(u64),
}

impl Display for ScanNotification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Commitment(commitment) => {
                write!(f, "Commitment({}, {:?})", commitment.location, commitment.commitment)
            }
            Self::Skipped { location, reason } => write!(f, "Skipped({location}, {reason})"),
            Self::Processed(n) => write!(f, "Processed({n})"),
        }
    }
}

/// The summary of a finished scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    /// The scanned range, after resuming from a checkpoint.
    pub range: BlockRange,
    /// The number of blocks fully processed.
    pub blocks_scanned: u64,
    /// The number of transactions matching the target.
    pub matched_transactions: u64,
    /// The number of extracted commitments.
    pub commitments: u64,
    /// The number of matching transactions skipped.
    pub skipped: u64,
    /// The last block fully processed.
    pub last_processed_block: Option<u64>,
    /// Whether the scan was stopped before the end of the range.
    pub cancelled: bool,
}

impl ScanOutcome {
    const fn new(range: BlockRange) -> Self {
        Self {
            range,
            blocks_scanned: 0,
            matched_transactions: 0,
            commitments: 0,
            skipped: 0,
            last_processed_block: None,
            cancelled: false,
        }
    }
}

/// The scanner walks a block range and extracts the commitment carried by every transaction
/// sent to the scan target.
#[derive(Debug)]
pub struct BatchCommitmentScanner<P> {
    /// The execution node requests.
    fetcher: BlockFetcher<P>,
    /// The scanner configuration.
    config: ScannerConfig,
    /// The sender part of the channel for [`ScanNotification`].
    sender: mpsc::Sender<ScanNotification>,
    /// The token stopping the scan.
    cancel: CancellationToken,
    /// The optional checkpoint store.
    checkpoint_store: Option<FileCheckpointStore>,
    /// The metrics for the scanner.
    metrics: ScannerMetrics,
}

impl<P> BatchCommitmentScanner<P>
where
    P: BlockProvider + 'static,
{
    /// Spawn a new [`BatchCommitmentScanner`]. The configuration is validated before any request
    /// is issued to the provider.
    pub fn spawn(
        provider: P,
        config: ScannerConfig,
    ) -> Result<ScannerHandle, commit_scanner_primitives::InvalidConfiguration> {
        config.validate()?;
        tracing::trace!(target: "commit_scanner::watcher", ?config, "spawning scanner");

        let schema_selector = config.decoder.selector();
        if schema_selector != config.target.selector.as_selector() {
            tracing::warn!(
                target: "commit_scanner::watcher",
                %schema_selector,
                selector = %config.target.selector,
                signature = %config.decoder.schema().signature(),
                "configured selector does not match the calldata schema"
            );
        }

        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
        let cancel = CancellationToken::new();
        let metrics = ScannerMetrics::default();
        let scanner = Self {
            fetcher: BlockFetcher::new(
                provider,
                config.retry,
                config.request_timeout,
                metrics.retries.clone(),
            ),
            checkpoint_store: config
                .checkpoint
                .as_ref()
                .map(|checkpoint| FileCheckpointStore::new(checkpoint.path.clone())),
            config,
            sender: tx,
            cancel: cancel.clone(),
            metrics,
        };

        let task = tokio::spawn(scanner.run());

        Ok(ScannerHandle::new(rx, cancel, task))
    }

    /// Main execution of the [`BatchCommitmentScanner`].
    async fn run(self) -> ScannerResult<ScanOutcome> {
        let range = self.resolve_range().await?;
        tracing::info!(
            target: "commit_scanner::watcher",
            %range,
            target = %self.config.target,
            concurrency = self.config.concurrency,
            "starting scan"
        );

        if range.is_empty() {
            tracing::info!(target: "commit_scanner::watcher", %range, "no block to scan");
        }

        let mut outcome = ScanOutcome::new(range);
        let result = self.scan_range(&mut outcome).await;
        let saved = self.save_checkpoint(&outcome).await;

        match result {
            Ok(()) => {
                saved?;
                tracing::info!(target: "commit_scanner::watcher", ?outcome, "scan finished");
                Ok(outcome)
            }
            Err(err) => {
                if let Err(checkpoint_err) = saved {
                    tracing::warn!(target: "commit_scanner::watcher", ?checkpoint_err, "failed to save checkpoint");
                }
                tracing::error!(target: "commit_scanner::watcher", %err, ?outcome, "scan failed");
                Err(err)
            }
        }
    }

    /// Returns the range to scan: the configured range, resumed after the checkpoint and capped
    /// at the chain head when no end is configured.
    async fn resolve_range(&self) -> ScannerResult<BlockRange> {
        let checkpoint = match &self.checkpoint_store {
            Some(store) => store.load().await?,
            None => None,
        };

        let end = match self.config.to_block {
            Some(end) => end,
            None => self.fetcher.latest_block_number().await?,
        };
        let range = BlockRange::new(self.config.from_block, end);

        Ok(match checkpoint {
            Some(checkpoint) if !checkpoint.matches(&self.config) => {
                tracing::warn!(target: "commit_scanner::watcher", ?checkpoint, "ignoring checkpoint of another scan");
                range
            }
            Some(checkpoint) if !checkpoint.resumes(&range) => {
                tracing::warn!(
                    target: "commit_scanner::watcher",
                    %range,
                    last_processed_block = checkpoint.last_processed_block,
                    "ignoring checkpoint outside of the scanned range"
                );
                range
            }
            Some(checkpoint) => {
                tracing::info!(
                    target: "commit_scanner::watcher",
                    last_processed_block = checkpoint.last_processed_block,
                    "resuming from checkpoint"
                );
                range.resume_after(checkpoint.last_processed_block)
            }
            None => range,
        })
    }

    /// Fetches the blocks of the range in order and processes them, until the end of the range,
    /// cancellation or the first fatal error.
    async fn scan_range(&self, outcome: &mut ScanOutcome) -> ScannerResult<()> {
        let blocks = stream::iter(outcome.range.iter())
            .map(|number| {
                let fetcher = self.fetcher.clone();
                async move { fetcher.block(number).await }
            })
            .buffered(self.config.concurrency);
        let mut blocks = std::pin::pin!(blocks);
        let checkpoint_interval = self.config.checkpoint.as_ref().map(|c| c.interval);
        let mut since_checkpoint = 0;

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::info!(target: "commit_scanner::watcher", last_processed_block = ?outcome.last_processed_block, "scan cancelled");
                    outcome.cancelled = true;
                    break
                }
                next = blocks.next() => next,
            };
            let Some(block) = next else { break };

            match self.process_block(&block?, outcome).await {
                Err(ScannerError::ChannelClosed) => {
                    tracing::warn!(target: "commit_scanner::watcher", "scanner channel closed, stopping the scan");
                    outcome.cancelled = true;
                    break
                }
                result => result?,
            }

            since_checkpoint += 1;
            if checkpoint_interval.is_some_and(|interval| since_checkpoint >= interval) {
                self.save_checkpoint(outcome).await?;
                since_checkpoint = 0;
            }
        }

        Ok(())
    }

    /// Processes the transactions of the block in order, notifying the extracted commitments.
    #[tracing::instrument(
        target = "commit_scanner::watcher",
        skip_all,
        fields(block_number = block.header.number)
    )]
    async fn process_block(&self, block: &Block, outcome: &mut ScanOutcome) -> ScannerResult<()> {
        let number = block.header.number;
        let transactions = match &block.transactions {
            BlockTransactions::Full(transactions) => transactions.as_slice(),
            BlockTransactions::Hashes(hashes) if hashes.is_empty() => &[],
            BlockTransactions::Uncle => &[],
            BlockTransactions::Hashes(_) => {
                return Err(ScannerError::MissingTransactionBodies(number))
            }
        };

        for (index, tx) in transactions.iter().enumerate() {
            let input = tx.input();
            if !self.config.target.matches(tx.to(), input) {
                continue;
            }
            outcome.matched_transactions += 1;
            self.metrics.matched_transactions.increment(1);

            let location = TxLocation::new(
                number,
                tx.transaction_index.unwrap_or(index as u64),
                *tx.inner.tx_hash(),
            );

            match self.config.decoder.decode_commitment(&input[SELECTOR_LEN..]) {
                Ok(commitment) => {
                    tracing::debug!(target: "commit_scanner::watcher", %location, ?commitment, "extracted commitment");
                    self.notify(ScanNotification::Commitment(ExtractedCommitment::new(
                        location, commitment,
                    )))
                    .await?;
                    outcome.commitments += 1;
                    self.metrics.commitments.increment(1);
                }
                Err(err) => match self.config.malformed_policy {
                    MalformedPolicy::Abort => return Err(ScannerError::decoding(location, err)),
                    MalformedPolicy::Skip => {
                        tracing::warn!(target: "commit_scanner::watcher", %location, %err, "skipping malformed transaction");
                        self.notify(ScanNotification::Skipped { location, reason: err.to_string() })
                            .await?;
                        outcome.skipped += 1;
                        self.metrics.skipped_transactions.increment(1);
                    }
                },
            }
        }

        self.notify(ScanNotification::Processed(number)).await?;
        outcome.blocks_scanned += 1;
        outcome.last_processed_block = Some(number);
        self.metrics.blocks_scanned.increment(1);
        self.metrics.last_processed_block.set(number as f64);

        Ok(())
    }

    /// Saves the progress of the scan if checkpointing is enabled and a block was processed.
    async fn save_checkpoint(&self, outcome: &ScanOutcome) -> ScannerResult<()> {
        if let (Some(store), Some(last_processed_block)) =
            (&self.checkpoint_store, outcome.last_processed_block)
        {
            store.save(&Checkpoint::new(&self.config, last_processed_block)).await?;
        }
        Ok(())
    }

    /// Sends the notification to the channel.
    async fn notify(&self, notification: ScanNotification) -> ScannerResult<()> {
        self.sender.send(notification).await.map_err(|_| ScannerError::ChannelClosed)
    }
}
