use crate::{FunctionSelector, InvalidConfiguration};

use alloy_primitives::Address;
use std::{fmt, str::FromStr};

/// The transaction filter applied by the scanner: a recipient contract and a function selector.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    /// The recipient of matching transactions, usually the validator timelock.
    pub address: Address,
    /// The selector matching calldata must start with.
    pub selector: FunctionSelector,
}

impl ScanTarget {
    /// Returns a new [`ScanTarget`].
    pub const fn new(address: Address, selector: FunctionSelector) -> Self {
        Self { address, selector }
    }

    /// Parses a [`ScanTarget`] from hex strings. The address comparison is performed on the raw
    /// bytes, so the casing of `address` is irrelevant.
    pub fn parse(address: &str, selector: &str) -> Result<Self, InvalidConfiguration> {
        let address = Address::from_str(address.trim())
            .map_err(|_| InvalidConfiguration::InvalidAddress(address.to_owned()))?;
        let selector = selector.trim().parse()?;
        Ok(Self { address, selector })
    }

    /// Returns true if a transaction sent to `to` with the provided calldata matches the target.
    pub fn matches(&self, to: Option<Address>, calldata: &[u8]) -> bool {
        to == Some(self.address) && self.selector.matches(calldata)
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.address, self.selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const SELECTOR: &str = "0x6edd4f12";

    #[test]
    fn test_should_match_address_case_insensitively() {
        let upper =
            ScanTarget::parse("0xEACF0411DE906BDD8F2576692486383797D06004", SELECTOR).unwrap();
        let lower =
            ScanTarget::parse("0xeacf0411de906bdd8f2576692486383797d06004", SELECTOR).unwrap();

        assert_eq!(upper, lower);
        assert_eq!(upper.address, address!("0xeacf0411de906bdd8f2576692486383797d06004"));
    }

    #[test]
    fn test_should_reject_invalid_address() {
        let err = ScanTarget::parse("0xeacf0411", SELECTOR).unwrap_err();
        assert_eq!(err, InvalidConfiguration::InvalidAddress("0xeacf0411".to_owned()));
    }

    #[test]
    fn test_should_match_recipient_and_selector() {
        let target =
            ScanTarget::parse("0xeacf0411de906bdd8f2576692486383797d06004", SELECTOR).unwrap();
        let calldata = [0x6e, 0xdd, 0x4f, 0x12, 0xff];

        assert!(target.matches(Some(target.address), &calldata));
        assert!(!target.matches(None, &calldata));
        assert!(!target.matches(Some(Address::ZERO), &calldata));
        assert!(!target.matches(Some(target.address), &calldata[1..]));
    }
}
