use alloy_primitives::{Bytes, U256};
use alloy_sol_types::SolCall;
use commit_scanner_l1::abi::calls::{
    commitBatchesSharedBridgeCall, CommitBatchInfo, StoredBatchInfo,
};

/// An ABI with a single function taking an array of `(uint64,bytes)` tuples.
pub(crate) const TEST_ABI: &str = r#"[
  {
    "type": "function",
    "name": "submit",
    "stateMutability": "nonpayable",
    "inputs": [
      { "name": "id", "type": "uint256", "internalType": "uint256" },
      {
        "name": "items",
        "type": "tuple[]",
        "internalType": "struct Item[]",
        "components": [
          { "name": "index", "type": "uint64", "internalType": "uint64" },
          { "name": "data", "type": "bytes", "internalType": "bytes" }
        ]
      }
    ],
    "outputs": []
  }
]"#;

/// Returns the abi encoded arguments of a `commitBatchesSharedBridge` call committing one batch
/// per provided pubdata commitments.
pub(crate) fn commit_batches_args(pubdata_commitments: Vec<Bytes>) -> Vec<u8> {
    let call = commitBatchesSharedBridgeCall {
        _chainId: U256::from(271),
        _lastCommittedBatchData: StoredBatchInfo::default(),
        _newBatchesData: pubdata_commitments
            .into_iter()
            .enumerate()
            .map(|(i, data)| CommitBatchInfo::with_pubdata_commitments(i as u64 + 1, data))
            .collect(),
    };
    call.abi_encode()[4..].to_vec()
}
