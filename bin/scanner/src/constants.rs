//! Constants of the scanner command line tool.

/// The default URL of the execution node.
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// The default selector of the scanned function, `commitBatchesSharedBridge`.
pub const DEFAULT_SELECTOR: &str = "0x6edd4f12";

/// The default path of the commitment inside the decoded calldata.
pub const DEFAULT_FIELD_PATH: &str = "_newBatchesData[0].pubdataCommitments";

/// The max retries of the provider on rate limit responses.
pub const PROVIDER_RATE_LIMIT_MAX_RETRIES: u32 = 10;

/// The default provider compute units per second.
pub const PROVIDER_COMPUTE_UNITS_PER_SECOND: u64 = 330;

/// The default request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
