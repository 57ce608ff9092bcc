use alloy_primitives::Bytes;
use alloy_sol_types::{sol, SolCall};

sol! {
    #[allow(missing_docs)]
    #[derive(Debug, Default, PartialEq, Eq)]
    struct StoredBatchInfo {
        uint64 batchNumber;
        bytes32 batchHash;
        uint64 indexRepeatedStorageChanges;
        uint256 numberOfLayer1Txs;
        bytes32 priorityOperationsHash;
        bytes32 l2LogsTreeRoot;
        uint256 timestamp;
        bytes32 commitment;
    }

    #[allow(missing_docs)]
    #[derive(Debug, Default, PartialEq, Eq)]
    struct CommitBatchInfo {
        uint64 batchNumber;
        uint64 timestamp;
        uint64 indexRepeatedStorageChanges;
        bytes32 newStateRoot;
        uint256 numberOfLayer1Txs;
        bytes32 priorityOperationsHash;
        bytes32 bootloaderHeapInitialContentsHash;
        bytes32 eventsQueueStateHash;
        bytes systemLogs;
        bytes pubdataCommitments;
    }

    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    function commitBatchesSharedBridge(
        uint256 _chainId,
        StoredBatchInfo calldata _lastCommittedBatchData,
        CommitBatchInfo[] calldata _newBatchesData
    ) external;
}

/// A call committing batches on the settlement layer.
#[derive(Debug, derive_more::From)]
pub enum CommitBatchesCall {
    /// A call to the shared bridge commit function.
    SharedBridge(commitBatchesSharedBridgeCall),
}

impl CommitBatchesCall {
    /// Tries to decode the calldata, including its selector, into a [`CommitBatchesCall`].
    pub fn try_decode(calldata: &[u8]) -> Option<Self> {
        let selector: [u8; 4] = calldata.get(0..4)?.try_into().ok()?;
        match selector {
            commitBatchesSharedBridgeCall::SELECTOR => {
                commitBatchesSharedBridgeCall::abi_decode(calldata).map(Into::into).ok()
            }
            _ => None,
        }
    }

    /// Returns the batches committed by the call.
    pub fn batches(&self) -> &[CommitBatchInfo] {
        match self {
            Self::SharedBridge(call) => &call._newBatchesData,
        }
    }

    /// Returns the pubdata commitments of the first committed batch, if any.
    pub fn first_pubdata_commitments(&self) -> Option<&Bytes> {
        self.batches().first().map(|batch| &batch.pubdataCommitments)
    }
}

impl CommitBatchInfo {
    /// Returns a [`CommitBatchInfo`] carrying the provided pubdata commitments.
    pub fn with_pubdata_commitments(batch_number: u64, pubdata_commitments: Bytes) -> Self {
        Self {
            batchNumber: batch_number,
            pubdataCommitments: pubdata_commitments,
            ..Default::default()
        }
    }
}
