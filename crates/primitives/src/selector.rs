use crate::InvalidConfiguration;

use alloy_primitives::{hex, Selector};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The length in bytes of a function selector.
pub const SELECTOR_LEN: usize = 4;

/// The 4 byte prefix of a contract call identifying the invoked function.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionSelector(Selector);

impl FunctionSelector {
    /// Returns a new [`FunctionSelector`] from the raw bytes.
    pub const fn new(bytes: [u8; SELECTOR_LEN]) -> Self {
        Self(Selector::new(bytes))
    }

    /// Returns true if the calldata starts with this selector.
    pub fn matches(&self, calldata: &[u8]) -> bool {
        calldata.get(..SELECTOR_LEN).is_some_and(|prefix| prefix == self.0.as_slice())
    }

    /// Returns the selector as a [`Selector`].
    pub const fn as_selector(&self) -> Selector {
        self.0
    }
}

impl From<Selector> for FunctionSelector {
    fn from(value: Selector) -> Self {
        Self(value)
    }
}

impl FromStr for FunctionSelector {
    type Err = InvalidConfiguration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidConfiguration::InvalidSelector(s.to_owned());
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 2 * SELECTOR_LEN {
            return Err(invalid());
        }
        let bytes = hex::decode(digits).map_err(|_| invalid())?;
        let bytes: [u8; SELECTOR_LEN] = bytes.try_into().map_err(|_| invalid())?;
        Ok(Self::new(bytes))
    }
}

impl fmt::Display for FunctionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_selector_with_and_without_prefix() {
        let with_prefix: FunctionSelector = "0x6edd4f12".parse().unwrap();
        let without_prefix: FunctionSelector = "6EDD4F12".parse().unwrap();

        assert_eq!(with_prefix, without_prefix);
        assert_eq!(with_prefix.to_string(), "0x6edd4f12");
    }

    #[test]
    fn test_should_reject_malformed_selectors() {
        for input in ["", "0x", "0x6edd4f", "0x6edd4f1234", "0xzzzzzzzz"] {
            assert_eq!(
                input.parse::<FunctionSelector>(),
                Err(InvalidConfiguration::InvalidSelector(input.to_owned())),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_should_match_calldata_prefix() {
        let selector = FunctionSelector::new([0x6e, 0xdd, 0x4f, 0x12]);

        assert!(selector.matches(&[0x6e, 0xdd, 0x4f, 0x12, 0x00, 0x01]));
        assert!(selector.matches(&[0x6e, 0xdd, 0x4f, 0x12]));
        assert!(!selector.matches(&[0x6e, 0xdd, 0x4f]));
        assert!(!selector.matches(&[0x00, 0xdd, 0x4f, 0x12]));
        assert!(!selector.matches(&[]));
    }
}
