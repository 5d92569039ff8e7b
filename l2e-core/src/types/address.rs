//! Participant identity

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// Length of an account address in bytes
pub const ADDRESS_LEN: usize = 20;

/// Canonical wallet address (`0x` + 40 lower-case hex digits)
///
/// This is the unique key of a submission. Two inputs that differ only in
/// letter case or surrounding whitespace canonicalize to the same address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse and canonicalize an address string
    pub fn parse(input: &str) -> ValidationResult<Self> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| ValidationError::InvalidAddress(trimmed.to_string()))?;

        if digits.len() != ADDRESS_LEN * 2 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidAddress(trimmed.to_string()));
        }

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    /// Build an address from raw bytes
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw 20-byte form
    pub fn to_bytes(&self) -> [u8; ADDRESS_LEN] {
        let mut out = [0u8; ADDRESS_LEN];
        // parse() only admits 40 hex digits, so decoding cannot fail
        hex::decode_to_slice(&self.0[2..], &mut out)
            .map(|()| out)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for WalletAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "0xABCdef0123456789abcdef0123456789ABCDEF01";

    #[test]
    fn test_parse_canonicalizes_case() {
        let addr = WalletAddress::parse(MIXED).unwrap();
        assert_eq!(addr.as_str(), "0xabcdef0123456789abcdef0123456789abcdef01");
        assert_eq!(addr, WalletAddress::parse(&MIXED.to_lowercase()).unwrap());
        assert_eq!(addr, WalletAddress::parse(&MIXED.to_uppercase()).unwrap());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let addr = WalletAddress::parse(&format!("  {}\n", MIXED)).unwrap();
        assert_eq!(addr.as_str().len(), 42);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(WalletAddress::parse("").is_err());
        assert!(WalletAddress::parse("abcdef0123456789abcdef0123456789abcdef01").is_err());
        assert!(WalletAddress::parse("0x1234").is_err());
        assert!(WalletAddress::parse("0xzzcdef0123456789abcdef0123456789abcdef01").is_err());
        assert!(WalletAddress::parse(&format!("{}00", MIXED)).is_err());
    }

    #[test]
    fn test_bytes_round_trip() {
        let addr = WalletAddress::parse(MIXED).unwrap();
        let bytes = addr.to_bytes();
        assert_eq!(bytes[0], 0xab);
        assert_eq!(bytes[19], 0x01);
        assert_eq!(WalletAddress::from_bytes(bytes), addr);

        let expected = hex::decode(&MIXED[2..]).unwrap();
        assert_eq!(bytes.as_slice(), expected.as_slice());

        let zero = WalletAddress::parse(&format!("0x{}", "0".repeat(40))).unwrap();
        assert_eq!(zero.to_bytes(), [0u8; ADDRESS_LEN]);
    }

    #[test]
    fn test_serde_validates() {
        let ok: WalletAddress = serde_json::from_str(&format!("\"{}\"", MIXED)).unwrap();
        assert_eq!(serde_json::to_string(&ok).unwrap(), format!("\"{}\"", ok));
        assert!(serde_json::from_str::<WalletAddress>("\"0x12\"").is_err());
    }
}
