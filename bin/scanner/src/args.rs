//! Command line arguments of the scanner.

use crate::{constants, output::OutputFormat};

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_client::RpcClient;
use alloy_transport::layers::RetryBackoffLayer;
use commit_scanner_codec::{CalldataDecoder, CalldataSchema, FieldPath};
use commit_scanner_l1::COMMIT_BATCHES_SHARED_BRIDGE;
use commit_scanner_primitives::ScanTarget;
use commit_scanner_watcher::{
    constants::{
        DEFAULT_CHECKPOINT_INTERVAL, DEFAULT_CONCURRENCY, DEFAULT_INITIAL_BACKOFF_MS,
        DEFAULT_MAX_RETRIES,
    },
    CheckpointConfig, MalformedPolicy, Retry, ScannerConfig,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Extracts the batch commitments posted to a validator timelock.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "commit-scanner", version, about)]
pub struct ScannerArgs {
    /// The RPC arguments.
    #[command(flatten)]
    pub rpc: RpcArgs,
    /// The scan arguments.
    #[command(flatten)]
    pub scan: ScanArgs,
    /// The calldata schema arguments.
    #[command(flatten)]
    pub abi: AbiArgs,
    /// The checkpoint arguments.
    #[command(flatten)]
    pub checkpoint: CheckpointArgs,
    /// The output arguments.
    #[command(flatten)]
    pub output: OutputArgs,
    /// The metrics arguments.
    #[command(flatten)]
    pub metrics: MetricsArgs,
}

impl ScannerArgs {
    /// Returns the scanner configuration. Fails on invalid arguments, before any request is
    /// issued to the execution node.
    pub fn scanner_config(&self) -> eyre::Result<ScannerConfig> {
        let target = ScanTarget::parse(&self.scan.target, &self.scan.selector)?;
        let mut config = ScannerConfig::new(target, self.abi.decoder()?)
            .with_range(self.scan.from_block, self.scan.to_block)
            .with_concurrency(self.scan.concurrency)
            .with_malformed_policy(if self.scan.skip_malformed {
                MalformedPolicy::Skip
            } else {
                MalformedPolicy::Abort
            })
            .with_retry(Retry::new(Some(self.rpc.max_retries), self.rpc.initial_backoff, true))
            .with_request_timeout(Duration::from_millis(self.rpc.timeout));

        if let Some(path) = &self.checkpoint.path {
            let checkpoint = CheckpointConfig::new(path).with_interval(self.checkpoint.interval);
            config = config.with_checkpoint(checkpoint);
        }

        config.validate()?;
        Ok(config)
    }
}

/// The arguments for the execution node provider.
#[derive(Debug, Clone, clap::Args)]
pub struct RpcArgs {
    /// The URL of the execution node JSON-RPC endpoint.
    #[arg(long = "rpc.url", id = "rpc_url", value_name = "RPC_URL", env = "SCANNER_RPC_URL", default_value = constants::DEFAULT_RPC_URL)]
    pub url: reqwest::Url,
    /// The max amount of retries for a failed request.
    #[arg(long = "rpc.max-retries", id = "rpc_max_retries", value_name = "RPC_MAX_RETRIES", env = "SCANNER_RPC_MAX_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: usize,
    /// The initial backoff in milliseconds, doubled on each retry.
    #[arg(long = "rpc.initial-backoff", id = "rpc_initial_backoff", value_name = "RPC_INITIAL_BACKOFF", env = "SCANNER_RPC_INITIAL_BACKOFF", default_value_t = DEFAULT_INITIAL_BACKOFF_MS)]
    pub initial_backoff: u64,
    /// The timeout of a single request in milliseconds.
    #[arg(long = "rpc.timeout", id = "rpc_timeout", value_name = "RPC_TIMEOUT", env = "SCANNER_RPC_TIMEOUT", default_value_t = constants::DEFAULT_REQUEST_TIMEOUT_MS)]
    pub timeout: u64,
    /// The compute units per second for the provider.
    #[arg(long = "rpc.cups", id = "rpc_compute_units_per_second", value_name = "RPC_COMPUTE_UNITS_PER_SECOND", env = "SCANNER_RPC_CUPS", default_value_t = constants::PROVIDER_COMPUTE_UNITS_PER_SECOND)]
    pub compute_units_per_second: u64,
}

impl RpcArgs {
    /// Returns a provider to the execution node, backing off on rate limited responses.
    pub fn provider(&self) -> impl Provider + Clone + 'static {
        let client = RpcClient::builder()
            .layer(RetryBackoffLayer::new(
                constants::PROVIDER_RATE_LIMIT_MAX_RETRIES,
                self.initial_backoff,
                self.compute_units_per_second,
            ))
            .http(self.url.clone());
        ProviderBuilder::new().connect_client(client)
    }
}

/// The arguments selecting the scanned transactions and blocks.
#[derive(Debug, Clone, clap::Args)]
pub struct ScanArgs {
    /// The address of the validator timelock receiving the commit transactions.
    #[arg(long = "scan.target", id = "scan_target", value_name = "ADDRESS", env = "SCANNER_TARGET")]
    pub target: String,
    /// The selector of the commit function.
    #[arg(long = "scan.selector", id = "scan_selector", value_name = "SELECTOR", env = "SCANNER_SELECTOR", default_value = constants::DEFAULT_SELECTOR)]
    pub selector: String,
    /// The first scanned block.
    #[arg(long = "scan.from-block", id = "scan_from_block", value_name = "BLOCK", env = "SCANNER_FROM_BLOCK", default_value_t = 0)]
    pub from_block: u64,
    /// The last scanned block, defaults to the chain head at start.
    #[arg(long = "scan.to-block", id = "scan_to_block", value_name = "BLOCK", env = "SCANNER_TO_BLOCK")]
    pub to_block: Option<u64>,
    /// The number of in-flight block requests.
    #[arg(long = "scan.concurrency", id = "scan_concurrency", value_name = "CONCURRENCY", env = "SCANNER_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
    /// Skip the transactions with malformed calldata instead of aborting the scan.
    #[arg(long = "scan.skip-malformed", id = "scan_skip_malformed", env = "SCANNER_SKIP_MALFORMED")]
    pub skip_malformed: bool,
}

/// The arguments describing the calldata.
#[derive(Debug, Clone, clap::Args)]
pub struct AbiArgs {
    /// The path of an ABI JSON file describing the commit function. Defaults to the built-in
    /// `commitBatchesSharedBridge` schema.
    #[arg(long = "abi.path", id = "abi_path", value_name = "ABI_PATH", env = "SCANNER_ABI_PATH")]
    pub path: Option<PathBuf>,
    /// The name of the commit function in the ABI file.
    #[arg(long = "abi.function", id = "abi_function", value_name = "FUNCTION", env = "SCANNER_ABI_FUNCTION", default_value = COMMIT_BATCHES_SHARED_BRIDGE)]
    pub function: String,
    /// The path of the pubdata commitments inside the decoded arguments.
    #[arg(long = "abi.field", id = "abi_field", value_name = "FIELD_PATH", env = "SCANNER_ABI_FIELD", default_value = constants::DEFAULT_FIELD_PATH)]
    pub field: String,
}

impl AbiArgs {
    /// Returns the calldata decoder described by the arguments.
    pub fn decoder(&self) -> eyre::Result<CalldataDecoder> {
        let schema = match &self.path {
            Some(path) => CalldataSchema::from_abi_file(path, &self.function)?,
            None => CalldataSchema::commit_batches_shared_bridge(),
        };
        let path: FieldPath = self.field.parse()?;
        Ok(CalldataDecoder::new(schema, path)?)
    }
}

/// The arguments for the scan checkpoint.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckpointArgs {
    /// The path of the checkpoint file. The scan resumes from it and keeps it up to date.
    #[arg(long = "checkpoint.path", id = "checkpoint_path", value_name = "CHECKPOINT_PATH", env = "SCANNER_CHECKPOINT_PATH")]
    pub path: Option<PathBuf>,
    /// The number of processed blocks between two checkpoint writes.
    #[arg(long = "checkpoint.interval", id = "checkpoint_interval", value_name = "BLOCKS", env = "SCANNER_CHECKPOINT_INTERVAL", default_value_t = DEFAULT_CHECKPOINT_INTERVAL)]
    pub interval: u64,
}

/// The arguments for the output of the commitments.
#[derive(Debug, Clone, clap::Args)]
pub struct OutputArgs {
    /// The output format.
    #[arg(long = "output.format", id = "output_format", value_name = "FORMAT", env = "SCANNER_OUTPUT_FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// The file the commitments are written to, defaults to stdout.
    #[arg(long = "output.path", id = "output_path", value_name = "OUTPUT_PATH", env = "SCANNER_OUTPUT_PATH")]
    pub path: Option<PathBuf>,
}

/// The arguments for the metrics exporter.
#[derive(Debug, Clone, clap::Args)]
pub struct MetricsArgs {
    /// The address serving the Prometheus metrics of the scan. Metrics are disabled if unset.
    #[arg(long = "metrics.addr", id = "metrics_addr", value_name = "METRICS_ADDR", env = "SCANNER_METRICS_ADDR")]
    pub addr: Option<SocketAddr>,
}

impl MetricsArgs {
    /// Installs the Prometheus recorder and its HTTP listener if an address is configured.
    pub fn install(&self) -> Result<(), BuildError> {
        if let Some(addr) = self.addr {
            PrometheusBuilder::new().with_http_listener(addr).install()?;
            tracing::info!(target: "commit_scanner::cli", %addr, "serving metrics");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use commit_scanner_l1::COMMIT_BATCHES_SHARED_BRIDGE_SELECTOR;
    use commit_scanner_primitives::FunctionSelector;

    const TIMELOCK: &str = "0xeacf0411de906bdd8f2576692486383797d06004";

    #[test]
    fn test_default_args() -> eyre::Result<()> {
        let args = ScannerArgs::try_parse_from(["commit-scanner", "--scan.target", TIMELOCK])?;
        let config = args.scanner_config()?;

        assert_eq!(args.rpc.url.as_str(), "http://localhost:8545/");
        assert_eq!(
            config.target.selector,
            FunctionSelector::from(COMMIT_BATCHES_SHARED_BRIDGE_SELECTOR)
        );
        assert_eq!(config.from_block, 0);
        assert_eq!(config.to_block, None);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.malformed_policy, MalformedPolicy::Abort);
        assert_eq!(config.retry, Retry::new(Some(3), 100, true));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.checkpoint.is_none());
        assert_eq!(args.output.format, OutputFormat::Text);
        assert_eq!(args.metrics.addr, None);
        args.metrics.install()?;
        Ok(())
    }

    #[test]
    fn test_dotted_args() -> eyre::Result<()> {
        let args = ScannerArgs::try_parse_from([
            "commit-scanner",
            "--scan.target",
            TIMELOCK,
            "--scan.from-block",
            "10",
            "--scan.to-block",
            "20",
            "--scan.concurrency",
            "4",
            "--scan.skip-malformed",
            "--checkpoint.path",
            "checkpoint.json",
            "--checkpoint.interval",
            "5",
            "--output.format",
            "json",
            "--metrics.addr",
            "127.0.0.1:9001",
        ])?;
        let config = args.scanner_config()?;

        assert_eq!((config.from_block, config.to_block), (10, Some(20)));
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.malformed_policy, MalformedPolicy::Skip);
        assert_eq!(
            config.checkpoint,
            Some(CheckpointConfig::new("checkpoint.json").with_interval(5))
        );
        assert_eq!(args.output.format, OutputFormat::Json);
        assert_eq!(args.metrics.addr, Some(SocketAddr::from(([127, 0, 0, 1], 9001))));
        Ok(())
    }

    #[test]
    fn test_reject_invalid_args() -> eyre::Result<()> {
        assert!(ScannerArgs::try_parse_from(["commit-scanner"]).is_err());

        let invalid: [&[&str]; 4] = [
            &["--scan.target", "0x1234"],
            &["--scan.target", TIMELOCK, "--scan.selector", "0x6edd4f"],
            &["--scan.target", TIMELOCK, "--scan.from-block", "1", "--scan.to-block", "0"],
            &["--scan.target", TIMELOCK, "--abi.field", "_newBatchesData[0].systemHash"],
        ];
        for flags in invalid {
            let argv = std::iter::once("commit-scanner").chain(flags.iter().copied());
            let args = ScannerArgs::try_parse_from(argv)?;
            assert!(args.scanner_config().is_err(), "{flags:?} should be rejected");
        }
        Ok(())
    }

    #[test]
    fn test_default_selector_matches_schema() {
        assert_eq!(
            constants::DEFAULT_SELECTOR.parse::<FunctionSelector>().ok(),
            Some(FunctionSelector::from(COMMIT_BATCHES_SHARED_BRIDGE_SELECTOR))
        );
    }
}
