use metrics::{Counter, Gauge};
use metrics_derive::Metrics;

/// The metrics for the [`super::BatchCommitmentScanner`]. The metrics are recorded by the
/// global recorder installed by the embedder, e.g. a Prometheus exporter, and dropped otherwise.
#[derive(Metrics)]
#[metrics(scope = "commit_scanner")]
pub struct ScannerMetrics {
    /// A counter on the blocks scanned.
    pub blocks_scanned: Counter,
    /// A counter on the transactions matching the scan target.
    pub matched_transactions: Counter,
    /// A counter on the extracted commitments.
    pub commitments: Counter,
    /// A counter on the matching transactions skipped because of malformed calldata.
    pub skipped_transactions: Counter,
    /// A counter on the retried requests.
    pub retries: Counter,
    /// The last block fully processed by the scanner.
    pub last_processed_block: Gauge,
}
