//! The commit scanner command line tool.

pub mod args;
pub use args::ScannerArgs;

pub mod constants;

pub mod output;

use std::io::Write;

use commit_scanner_watcher::{
    BatchCommitmentScanner, BlockProvider, ScanNotification, ScanOutcome, ScannerConfig,
};
use output::CommitmentWriter;

/// Runs the scan described by the arguments against the configured execution node.
pub async fn run(args: ScannerArgs) -> eyre::Result<ScanOutcome> {
    let config = args.scanner_config()?;
    args.metrics.install()?;
    let provider = args.rpc.provider();
    let writer = args.output.writer()?;
    scan(provider, config, writer).await
}

/// Runs the scan, writing the commitments as they are extracted. The scan is cancelled on
/// Ctrl-C.
pub async fn scan<P, W>(
    provider: P,
    config: ScannerConfig,
    mut writer: CommitmentWriter<W>,
) -> eyre::Result<ScanOutcome>
where
    P: BlockProvider + 'static,
    W: Write,
{
    let mut handle = BatchCommitmentScanner::spawn(provider, config)?;

    let cancel = handle.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!(target: "commit_scanner::cli", "received ctrl-c, stopping the scan");
            cancel.cancel();
        }
    });

    while let Some(notification) = handle.next().await {
        match notification {
            ScanNotification::Commitment(commitment) => writer.write(&commitment)?,
            ScanNotification::Skipped { location, reason } => {
                tracing::debug!(target: "commit_scanner::cli", %location, %reason, "skipped transaction");
            }
            ScanNotification::Processed(number) => {
                tracing::trace!(target: "commit_scanner::cli", number, "processed block");
            }
        }
    }
    writer.flush()?;

    let outcome = handle.wait().await?;
    if outcome.commitments == 0 {
        tracing::info!(target: "commit_scanner::cli", range = %outcome.range, "no commitments found");
    }
    Ok(outcome)
}
