use crate::Block;

use alloy_consensus::{transaction::Recovered, Signed, TxEip1559, TxEnvelope};
use alloy_primitives::{keccak256, Address, Bytes, Signature, TxKind, B256, U256};
use alloy_rpc_types_eth::{BlockTransactions, Transaction};
use alloy_sol_types::SolCall;
use commit_scanner_l1::abi::calls::{
    commitBatchesSharedBridgeCall, CommitBatchInfo, StoredBatchInfo,
};

/// Test utils for provider.
pub mod provider;

/// Returns a block at `number` carrying transactions built from the provided recipients and
/// calldata, in order.
pub fn block(number: u64, transactions: Vec<(Address, Bytes)>) -> Block {
    let block_hash = keccak256(number.to_be_bytes());
    let transactions = transactions
        .into_iter()
        .enumerate()
        .map(|(index, (to, input))| transaction(number, block_hash, index as u64, to, input))
        .collect();

    let mut block =
        Block { transactions: BlockTransactions::Full(transactions), ..Default::default() };
    block.header.hash = block_hash;
    block.header.inner.number = number;
    block
}

/// Returns an empty block at `number`.
pub fn empty_block(number: u64) -> Block {
    block(number, vec![])
}

/// Returns the transaction at `index` in the block.
pub fn transaction(
    block_number: u64,
    block_hash: B256,
    index: u64,
    to: Address,
    input: Bytes,
) -> Transaction {
    let hash = transaction_hash(block_number, index);
    let tx = TxEip1559 { chain_id: 1, to: TxKind::Call(to), input, ..Default::default() };
    let signature = Signature::new(U256::from(1), U256::from(1), false);
    let signed = Signed::new_unchecked(tx, signature, hash);

    Transaction {
        inner: Recovered::new_unchecked(TxEnvelope::Eip1559(signed), Address::ZERO),
        block_hash: Some(block_hash),
        block_number: Some(block_number),
        transaction_index: Some(index),
        effective_gas_price: None,
    }
}

/// Returns the hash assigned to the transaction at `index` in block `block_number`.
pub fn transaction_hash(block_number: u64, index: u64) -> B256 {
    let mut preimage = [0u8; 16];
    preimage[..8].copy_from_slice(&block_number.to_be_bytes());
    preimage[8..].copy_from_slice(&index.to_be_bytes());
    keccak256(preimage)
}

/// Returns the `commitBatchesSharedBridge` calldata, selector included, committing one batch per
/// provided pubdata commitments.
pub fn commit_calldata(pubdata_commitments: Vec<Bytes>) -> Bytes {
    let call = commitBatchesSharedBridgeCall {
        _chainId: U256::from(271),
        _lastCommittedBatchData: StoredBatchInfo::default(),
        _newBatchesData: pubdata_commitments
            .into_iter()
            .enumerate()
            .map(|(i, data)| CommitBatchInfo::with_pubdata_commitments(i as u64 + 1, data))
            .collect(),
    };
    call.abi_encode().into()
}

/// Returns the `commitBatchesSharedBridge` calldata committing a single batch which carries the
/// commitment behind a zeroed version prefix.
pub fn commitment_calldata(commitment: &str) -> Bytes {
    let mut pubdata = vec![0u8; 4];
    pubdata.extend_from_slice(commitment.as_bytes());
    commit_calldata(vec![pubdata.into()])
}
