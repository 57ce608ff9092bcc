use crate::TxLocation;

use serde::{Deserialize, Serialize};

/// A commitment recovered from the `pubdataCommitments` of a committed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedCommitment {
    /// Where the commit transaction was found.
    #[serde(flatten)]
    pub location: TxLocation,
    /// The decoded commitment text.
    pub commitment: String,
}

impl ExtractedCommitment {
    /// Returns a new instance of [`ExtractedCommitment`].
    pub const fn new(location: TxLocation, commitment: String) -> Self {
        Self { location, commitment }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;

    #[test]
    fn test_should_serialize_as_flat_record() {
        let commitment = ExtractedCommitment::new(
            TxLocation::new(7, 2, B256::with_last_byte(1)),
            "hello".to_owned(),
        );

        let json = serde_json::to_value(&commitment).unwrap();

        assert_eq!(json["block_number"], 7);
        assert_eq!(json["transaction_index"], 2);
        assert_eq!(
            json["transaction_hash"],
            "0x0000000000000000000000000000000000000000000000000000000000000001"
        );
        assert_eq!(json["commitment"], "hello");
    }
}
