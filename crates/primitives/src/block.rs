use crate::InvalidConfiguration;

use alloy_primitives::{BlockNumber, TxHash};
use serde::{Deserialize, Serialize};
use std::{fmt, ops::RangeInclusive};

/// An inclusive range of block numbers visited by a scan.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlockRange {
    /// The first block of the range.
    pub start: BlockNumber,
    /// The last block of the range.
    pub end: BlockNumber,
}

impl BlockRange {
    /// Returns a new [`BlockRange`]. A range where `start > end` is empty.
    pub const fn new(start: BlockNumber, end: BlockNumber) -> Self {
        Self { start, end }
    }

    /// Returns a new [`BlockRange`], rejecting ranges that start after they end.
    pub const fn checked(
        start: BlockNumber,
        end: BlockNumber,
    ) -> Result<Self, InvalidConfiguration> {
        if start > end {
            return Err(InvalidConfiguration::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the range resumed after `block`, never moving the start backwards.
    pub fn resume_after(self, block: BlockNumber) -> Self {
        Self { start: self.start.max(block.saturating_add(1)), end: self.end }
    }

    /// Returns true if the range contains no blocks.
    pub const fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Returns an iterator over the block numbers, in ascending order.
    pub const fn iter(&self) -> RangeInclusive<BlockNumber> {
        self.start..=self.end
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// The position of a transaction on chain.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxLocation {
    /// The number of the block including the transaction.
    pub block_number: BlockNumber,
    /// The index of the transaction in the block.
    pub transaction_index: u64,
    /// The hash of the transaction.
    pub transaction_hash: TxHash,
}

impl TxLocation {
    /// Returns a new instance of [`TxLocation`].
    pub const fn new(
        block_number: BlockNumber,
        transaction_index: u64,
        transaction_hash: TxHash,
    ) -> Self {
        Self { block_number, transaction_index, transaction_hash }
    }
}

impl fmt::Display for TxLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "block {} tx {} ({})",
            self.block_number, self.transaction_index, self.transaction_hash
        )
    }
}
