//! Commit scanner binary

use clap::Parser;
use commit_scanner::ScannerArgs;

#[tokio::main]
async fn main() {
    init_tracing_subscriber();

    let args = ScannerArgs::parse();
    match commit_scanner::run(args).await {
        Ok(outcome) => {
            tracing::info!(
                target: "commit_scanner::cli",
                blocks = outcome.blocks_scanned,
                commitments = outcome.commitments,
                skipped = outcome.skipped,
                cancelled = outcome.cancelled,
                "scan complete"
            );
        }
        Err(err) => {
            eprintln!("Error: {err:?}");
            std::process::exit(1);
        }
    }
}

/// Initialize the tracing subscriber, writing to stderr and filtered by `RUST_LOG`.
fn init_tracing_subscriber() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(false),
        )
        .with(filter)
        .init();
}
