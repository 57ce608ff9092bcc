use crate::{checkpoint::CheckpointError, retry::CanRetry};

use std::{fmt, time::Duration};

use alloy_transport::TransportError;
use commit_scanner_codec::DecodingError;
use commit_scanner_primitives::TxLocation;
use tokio::task::JoinError;

/// A [`Result`] that uses [`ScannerError`] as the error type.
pub(crate) type ScannerResult<T> = Result<T, ScannerError>;

/// The request issued to the execution node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcRequest {
    /// The request for the latest block number.
    BlockNumber,
    /// The request for a block and its transactions.
    Block(u64),
}

impl fmt::Display for RpcRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockNumber => write!(f, "latest block number"),
            Self::Block(number) => write!(f, "block {number}"),
        }
    }
}

/// An error that occurred during a scan.
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    /// The execution node returned an error.
    #[error("rpc request for {request} failed: {source}")]
    Rpc {
        /// The failed request.
        request: RpcRequest,
        /// The transport error.
        source: TransportError,
    },
    /// The execution node did not answer in time.
    #[error("rpc request for {request} timed out after {timeout:?}")]
    Timeout {
        /// The timed out request.
        request: RpcRequest,
        /// The configured timeout.
        timeout: Duration,
    },
    /// The requested block is unknown to the execution node.
    #[error("unknown block {0}")]
    MissingBlock(u64),
    /// The block was returned without its transaction bodies.
    #[error("block {0} returned without transaction bodies")]
    MissingTransactionBodies(u64),
    /// A matching transaction carries calldata that does not decode against the schema.
    #[error("malformed calldata at {location}: {source}")]
    MalformedCalldata {
        /// The location of the transaction.
        location: TxLocation,
        /// The decoding error.
        source: DecodingError,
    },
    /// A matching transaction carries a commitment which is not valid UTF-8.
    #[error("invalid commitment encoding at {location}: {source}")]
    InvalidEncoding {
        /// The location of the transaction.
        location: TxLocation,
        /// The decoding error.
        source: DecodingError,
    },
    /// The checkpoint could not be loaded or persisted.
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    /// The notification channel was closed by the receiver.
    #[error("scanner notification channel closed")]
    ChannelClosed,
    /// The scanner task panicked or was aborted.
    #[error("scanner task failed: {0}")]
    Task(#[from] JoinError),
}

impl ScannerError {
    /// Returns a [`ScannerError`] for a transaction whose calldata failed to decode.
    pub fn decoding(location: TxLocation, source: DecodingError) -> Self {
        if source.is_malformed() {
            Self::MalformedCalldata { location, source }
        } else {
            Self::InvalidEncoding { location, source }
        }
    }

    /// Returns true if the request that produced the error can be retried.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Rpc { .. } | Self::Timeout { .. } | Self::MissingBlock(_))
    }

    /// Returns the location of the offending transaction, if any.
    pub const fn location(&self) -> Option<&TxLocation> {
        match self {
            Self::MalformedCalldata { location, .. } | Self::InvalidEncoding { location, .. } => {
                Some(location)
            }
            _ => None,
        }
    }
}

impl CanRetry for ScannerError {
    fn can_retry(&self) -> bool {
        self.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_transport::TransportErrorKind;

    #[test]
    fn test_retry_classification() {
        let rpc = ScannerError::Rpc {
            request: RpcRequest::Block(1),
            source: TransportErrorKind::custom_str("connection reset"),
        };
        assert!(rpc.is_retryable());
        assert!(ScannerError::Timeout {
            request: RpcRequest::BlockNumber,
            timeout: Duration::from_secs(1)
        }
        .is_retryable());
        assert!(ScannerError::MissingBlock(1).is_retryable());
        assert!(!ScannerError::MissingTransactionBodies(1).is_retryable());
        assert!(!ScannerError::ChannelClosed.is_retryable());
    }

    #[test]
    fn test_error_names_block_and_transaction() {
        let location = TxLocation::new(5, 2, Default::default());
        let err = ScannerError::decoding(
            location,
            DecodingError::IndexOutOfBounds { index: 0, len: 0 },
        );
        assert!(matches!(err, ScannerError::MalformedCalldata { .. }));
        assert_eq!(err.location(), Some(&location));
        assert!(err.to_string().contains("block 5 tx 2"));
    }
}
