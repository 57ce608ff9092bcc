/// A configuration value supplied to the scanner was rejected before any request was made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidConfiguration {
    /// The target address is not a 20 byte hex string.
    #[error("invalid target address {0:?}")]
    InvalidAddress(String),
    /// The function selector is not a 4 byte hex string.
    #[error("invalid function selector {0:?}: expected 0x followed by 8 hex characters")]
    InvalidSelector(String),
    /// The block range starts after it ends.
    #[error("invalid block range: start {start} is greater than end {end}")]
    InvertedRange {
        /// The first block of the range.
        start: u64,
        /// The last block of the range.
        end: u64,
    },
    /// The amount of in-flight block requests must be positive.
    #[error("concurrency must be greater than zero")]
    ZeroConcurrency,
}
