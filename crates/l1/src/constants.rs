use alloy_primitives::{fixed_bytes, Selector};

/// The name of the function committing batches to the shared bridge.
pub const COMMIT_BATCHES_SHARED_BRIDGE: &str = "commitBatchesSharedBridge";

/// The selector of `commitBatchesSharedBridge(uint256,StoredBatchInfo,CommitBatchInfo[])`.
pub const COMMIT_BATCHES_SHARED_BRIDGE_SELECTOR: Selector = fixed_bytes!("6edd4f12");

/// The name of the parameter holding the newly committed batches.
pub const NEW_BATCHES_DATA_PARAM: &str = "_newBatchesData";

/// The name of the batch field holding the pubdata commitments.
pub const PUBDATA_COMMITMENTS_FIELD: &str = "pubdataCommitments";
