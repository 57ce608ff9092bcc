use crate::Block;

use alloy_network::Ethereum;
use alloy_provider::Provider;
use alloy_transport::TransportResult;

/// The chain access required by the scanner.
#[async_trait::async_trait]
pub trait BlockProvider: Send + Sync {
    /// Returns the number of the latest block.
    async fn latest_block_number(&self) -> TransportResult<u64>;

    /// Returns the block at `number` with full transaction bodies, or `None` if the block is
    /// unknown to the node.
    async fn block_with_transactions(&self, number: u64) -> TransportResult<Option<Block>>;
}

#[async_trait::async_trait]
impl<P> BlockProvider for P
where
    P: Provider<Ethereum>,
{
    async fn latest_block_number(&self) -> TransportResult<u64> {
        self.get_block_number().await
    }

    async fn block_with_transactions(&self, number: u64) -> TransportResult<Option<Block>> {
        self.get_block_by_number(number.into()).full().await
    }
}
