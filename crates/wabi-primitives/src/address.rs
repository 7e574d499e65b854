//! Ethereum-compatible address type (20 bytes)

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::hexutil;

/// Address parsing error
#[derive(Debug, Error)]
pub enum AddressError {
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
}

/// Ethereum-compatible 20-byte address
///
/// Inside an ABI word an address occupies the low-order 20 bytes, see
/// [`Address::to_word`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// Size of address in bytes
    pub const LEN: usize = 20;

    /// Zero address (0x0000...0000)
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create address from bytes
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Create address from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, AddressError> {
        if slice.len() != Self::LEN {
            return Err(AddressError::InvalidLength(slice.len()));
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(slice);
        Ok(Address(bytes))
    }

    /// Parse address from hex string (with or without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let bytes = hexutil::decode(s).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Read an address from the low-order 20 bytes of a 32-byte word
    pub fn from_word(word: &[u8; 32]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&word[12..]);
        Address(bytes)
    }

    /// Left-pad into a 32-byte word
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.0);
        word
    }

    /// Get as byte slice
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Convert to hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        hexutil::encode(self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d";

    // ==================== Parsing ====================

    #[test]
    fn test_address_from_hex() {
        let addr = Address::from_hex(SAMPLE).unwrap();
        assert!(!addr.is_zero());

        let addr2 = Address::from_hex(&SAMPLE[2..]).unwrap();
        assert_eq!(addr, addr2);
    }

    #[test]
    fn test_address_from_str() {
        let addr: Address = SAMPLE.parse().unwrap();
        assert_eq!(addr.to_hex(), SAMPLE.to_lowercase());
    }

    #[test]
    fn test_address_from_hex_invalid_chars() {
        let result = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aGGG");
        assert!(matches!(result, Err(AddressError::InvalidHex(_))));
    }

    #[test]
    fn test_address_from_hex_wrong_length() {
        assert!(matches!(
            Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB"),
            Err(AddressError::InvalidLength(19))
        ));
        assert!(matches!(
            Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d00"),
            Err(AddressError::InvalidLength(21))
        ));
        assert!(matches!(Address::from_hex("0x"), Err(AddressError::InvalidLength(0))));
    }

    // ==================== Word layout ====================

    #[test]
    fn test_address_word_is_left_padded() {
        let addr = Address::from_hex(SAMPLE).unwrap();
        let word = addr.to_word();
        assert_eq!(&word[..12], &[0u8; 12]);
        assert_eq!(&word[12..], addr.as_bytes());
        assert_eq!(Address::from_word(&word), addr);
    }

    // ==================== Formatting ====================

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert_eq!(Address::ZERO.to_hex(), "0x0000000000000000000000000000000000000000");
        assert_eq!(Address::default(), Address::ZERO);
    }

    #[test]
    fn test_address_display_and_debug() {
        let addr = Address::from_hex(SAMPLE).unwrap();
        assert_eq!(format!("{}", addr), "0x742d35cc6634c0532925a3b844bc9e7595f0ab3d");
        assert_eq!(
            format!("{:?}", addr),
            "Address(0x742d35cc6634c0532925a3b844bc9e7595f0ab3d)"
        );
    }
}
