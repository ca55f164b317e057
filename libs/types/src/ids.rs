//! Identity types for bond participants and deployed contracts
//!
//! Every party (owner, beneficiary, funded dev account) and every deployed
//! bond is addressed by a 20-byte `Address`, rendered as `0x`-prefixed hex.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::errors::AddressError;

/// Number of bytes in an address.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte identity.
///
/// `Address::ZERO` is the null identity and is never a valid beneficiary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The null identity.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Create from raw bytes
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive an address from arbitrary seed bytes.
    ///
    /// Takes the last 20 bytes of `SHA-256(seed)`. Used for deterministic
    /// dev accounts and for contract addresses derived from `(deployer, nonce)`.
    pub fn derive(seed: &[u8]) -> Self {
        let digest = Sha256::digest(seed);
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&digest[digest.len() - ADDRESS_LEN..]);
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Whether this is the null identity
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.len() != ADDRESS_LEN * 2 {
            return Err(AddressError::InvalidLength {
                actual: digits.len(),
            });
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(Address::default().is_zero());
        assert!(!Address::derive(b"alice").is_zero());
    }

    #[test]
    fn test_derive_is_deterministic() {
        assert_eq!(Address::derive(b"alice"), Address::derive(b"alice"));
        assert_ne!(Address::derive(b"alice"), Address::derive(b"bob"));
    }

    #[test]
    fn test_display_format() {
        let s = Address::ZERO.to_string();
        assert_eq!(s, "0x0000000000000000000000000000000000000000");
    }

    #[test]
    fn test_parse_with_and_without_prefix() {
        let addr: Address = "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap();
        let bare: Address = "5fbdb2315678afecb367f032d93f642f64180aa3".parse().unwrap();
        assert_eq!(addr, bare);
        assert_eq!(addr.to_string(), "0x5fbdb2315678afecb367f032d93f642f64180aa3");
    }

    #[test]
    fn test_parse_invalid_length() {
        let result = "0x1234".parse::<Address>();
        assert_eq!(result, Err(AddressError::InvalidLength { actual: 4 }));
    }

    #[test]
    fn test_parse_invalid_hex() {
        let result = "0xzzbdb2315678afecb367f032d93f642f64180aa3".parse::<Address>();
        assert!(matches!(result, Err(AddressError::InvalidHex(_))));
    }

    #[test]
    fn test_address_serialization() {
        let addr = Address::derive(b"bob");
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr));

        let deserialized: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, deserialized);
    }

    #[test]
    fn test_address_deserialize_rejects_garbage() {
        let result = serde_json::from_str::<Address>("\"not-an-address\"");
        assert!(result.is_err());
    }
}
