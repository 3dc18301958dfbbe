//! Account identifiers
//!
//! An [`Address`] is an opaque 20-byte value. The all-zero address is
//! reserved as the null account and is never a valid destination.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Address length in bytes
pub const ADDRESS_LEN: usize = 20;

/// Address parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
    #[error("Invalid address hex: {0}")]
    InvalidHex(String),
}

/// A fixed-width account identifier
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The null account
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Wrap raw bytes
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Build an address from a slice, which must be exactly 20 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let array: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }

    /// Whether this is the reserved null account
    pub fn is_null(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Lowercase hex with a `0x` prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// Accepts 40 hex digits, with or without a `0x` prefix
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

// Serialized as a hex string so it can also key JSON maps
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_and_display() {
        let addr: Address = "0x00000000000000000000000000000000000000a1".parse().unwrap();
        assert_eq!(addr.as_bytes()[19], 0xa1);
        assert_eq!(addr.to_string(), "0x00000000000000000000000000000000000000a1");

        // Prefix is optional
        let same: Address = "00000000000000000000000000000000000000A1".parse().unwrap();
        assert_eq!(addr, same);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "0x1234".parse::<Address>(),
            Err(AddressError::InvalidLength(2))
        );
        assert!(matches!(
            "0xzz00000000000000000000000000000000000000".parse::<Address>(),
            Err(AddressError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_null_address() {
        assert!(Address::ZERO.is_null());
        assert!(Address::default().is_null());
        assert!(!Address::new([1u8; ADDRESS_LEN]).is_null());
    }

    #[test]
    fn test_serde_as_map_key() {
        let mut map = HashMap::new();
        map.insert(Address::new([7u8; ADDRESS_LEN]), 42u128);

        let json = serde_json::to_string(&map).unwrap();
        assert!(json.contains("0x0707"));

        let back: HashMap<Address, u128> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
