use crate::{error::ScannerResult, retry::Retry, Block, BlockProvider, RpcRequest, ScannerError};

use std::{
    future::Future,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use alloy_transport::TransportResult;
use metrics::Counter;

/// Issues the scanner requests to the provider, applying the timeout and retry policy.
#[derive(Debug)]
pub(crate) struct BlockFetcher<P> {
    provider: Arc<P>,
    retry: Retry,
    timeout: Duration,
    retries: Counter,
}

impl<P> Clone for BlockFetcher<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            retry: self.retry,
            timeout: self.timeout,
            retries: self.retries.clone(),
        }
    }
}

impl<P: BlockProvider> BlockFetcher<P> {
    /// Returns a new [`BlockFetcher`].
    pub(crate) fn new(provider: P, retry: Retry, timeout: Duration, retries: Counter) -> Self {
        Self { provider: Arc::new(provider), retry, timeout, retries }
    }

    /// Returns the number of the latest block.
    pub(crate) async fn latest_block_number(&self) -> ScannerResult<u64> {
        let request = RpcRequest::BlockNumber;
        self.with_retry(request, || self.timed(request, self.provider.latest_block_number())).await
    }

    /// Returns the block at `number` with its transactions.
    pub(crate) async fn block(&self, number: u64) -> ScannerResult<Block> {
        let request = RpcRequest::Block(number);
        self.with_retry(request, || async move {
            self.timed(request, self.provider.block_with_transactions(number))
                .await?
                .ok_or(ScannerError::MissingBlock(number))
        })
        .await
    }

    /// Runs the request with the retry policy.
    async fn with_retry<T, F, Fut>(&self, request: RpcRequest, operation: F) -> ScannerResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = ScannerResult<T>>,
    {
        let attempts = AtomicUsize::new(0);
        let operation_name = request.to_string();
        let result = self
            .retry
            .retry(&operation_name, || {
                attempts.fetch_add(1, Ordering::Relaxed);
                operation()
            })
            .await;

        let retries = attempts.load(Ordering::Relaxed).saturating_sub(1);
        if retries > 0 {
            self.retries.increment(retries as u64);
        }
        result
    }

    /// Applies the request timeout to the call.
    async fn timed<T>(
        &self,
        request: RpcRequest,
        call: impl Future<Output = TransportResult<T>>,
    ) -> ScannerResult<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(ScannerError::Rpc { request, source }),
            Err(_) => Err(ScannerError::Timeout { request, timeout: self.timeout }),
        }
    }
}
