use crate::{Block, BlockProvider};

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use alloy_rpc_types_eth::BlockTransactions;
use alloy_transport::{TransportErrorKind, TransportResult};

/// A mock implementation of the [`BlockProvider`] trait serving blocks from memory.
#[derive(Debug, Default, Clone)]
pub struct MockProvider {
    head: u64,
    blocks: HashMap<u64, Block>,
    failures: Arc<Mutex<HashMap<u64, usize>>>,
    delays: HashMap<u64, Duration>,
    requests: Arc<Mutex<Vec<u64>>>,
    head_requests: Arc<Mutex<usize>>,
}

impl MockProvider {
    /// Returns a new [`MockProvider`] serving the provided blocks. The head is the highest block.
    pub fn new(blocks: impl IntoIterator<Item = Block>) -> Self {
        let blocks: HashMap<_, _> =
            blocks.into_iter().map(|block| (block.header.number, block)).collect();
        let head = blocks.keys().copied().max().unwrap_or_default();
        Self { head, blocks, ..Default::default() }
    }

    /// Sets the head of the chain.
    pub const fn with_head(mut self, head: u64) -> Self {
        self.head = head;
        self
    }

    /// The next `count` requests for the block fail with a transport error.
    pub fn with_failures(self, number: u64, count: usize) -> Self {
        self.failures.lock().expect("lock poisoned").insert(number, count);
        self
    }

    /// Delays the responses for the block.
    pub fn with_delay(mut self, number: u64, delay: Duration) -> Self {
        self.delays.insert(number, delay);
        self
    }

    /// Strips the transaction bodies from the block, leaving only their hashes.
    pub fn without_bodies(mut self, number: u64) -> Self {
        if let Some(block) = self.blocks.get_mut(&number) {
            let hashes = block.transactions.hashes().collect();
            block.transactions = BlockTransactions::Hashes(hashes);
        }
        self
    }

    /// Returns the block numbers requested so far, in request order.
    pub fn block_requests(&self) -> Vec<u64> {
        self.requests.lock().expect("lock poisoned").clone()
    }

    /// Returns the number of head requests.
    pub fn head_requests(&self) -> usize {
        *self.head_requests.lock().expect("lock poisoned")
    }
}

#[async_trait::async_trait]
impl BlockProvider for MockProvider {
    async fn latest_block_number(&self) -> TransportResult<u64> {
        *self.head_requests.lock().expect("lock poisoned") += 1;
        Ok(self.head)
    }

    async fn block_with_transactions(&self, number: u64) -> TransportResult<Option<Block>> {
        self.requests.lock().expect("lock poisoned").push(number);
        if let Some(delay) = self.delays.get(&number) {
            tokio::time::sleep(*delay).await;
        }

        {
            let mut failures = self.failures.lock().expect("lock poisoned");
            if let Some(remaining) = failures.get_mut(&number).filter(|remaining| **remaining > 0) {
                *remaining -= 1;
                return Err(TransportErrorKind::custom_str("connection reset"));
            }
        }

        Ok(self.blocks.get(&number).cloned())
    }
}
