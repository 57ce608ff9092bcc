use std::str::Utf8Error;

/// The length of the version prefix preceding the commitment in the pubdata commitments.
pub const COMMITMENT_PREFIX_LEN: usize = 4;

/// Extracts the commitment from the pubdata commitments: the bytes following the
/// [`COMMITMENT_PREFIX_LEN`] bytes prefix, decoded as UTF-8. Inputs no longer than the prefix
/// yield an empty commitment.
pub fn extract_commitment(pubdata_commitments: &[u8]) -> Result<String, Utf8Error> {
    let payload = pubdata_commitments.get(COMMITMENT_PREFIX_LEN..).unwrap_or_default();
    Ok(std::str::from_utf8(payload)?.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::bytes;

    #[test]
    fn test_extract_commitment() -> eyre::Result<()> {
        assert_eq!(extract_commitment(&bytes!("0000000068656c6c6f"))?, "hello");
        Ok(())
    }

    #[test]
    fn test_extract_empty_commitment() -> eyre::Result<()> {
        assert_eq!(extract_commitment(&bytes!("01000000"))?, "");
        assert_eq!(extract_commitment(&bytes!("0100"))?, "");
        assert_eq!(extract_commitment(&[])?, "");
        Ok(())
    }

    #[test]
    fn test_reject_invalid_utf8() {
        assert!(extract_commitment(&bytes!("00000000ff00")).is_err());
    }
}
