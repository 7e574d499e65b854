//! `0x`-prefixed hex conversions
//!
//! Call data, return data and log payloads travel as `0x` hex strings on the
//! transport side; these helpers are the only place the prefix is handled.

use hex::FromHexError;

/// Strip an optional `0x`/`0X` prefix
pub fn strip_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decode a hex string, with or without `0x` prefix
pub fn decode(s: &str) -> Result<Vec<u8>, FromHexError> {
    hex::decode(strip_prefix(s.trim()))
}

/// Encode bytes as a lowercase `0x`-prefixed hex string
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_with_and_without_prefix() {
        assert_eq!(decode("0xdeadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode("0XDEADBEEF").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode("deadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode("0x").unwrap().is_empty());
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_odd_length() {
        assert_eq!(decode("0xabc"), Err(FromHexError::OddLength));
    }

    #[test]
    fn test_decode_invalid_char() {
        assert!(matches!(
            decode("0xzz"),
            Err(FromHexError::InvalidHexCharacter { .. })
        ));
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode([0x01u8, 0xab]), "0x01ab");
        assert_eq!(encode([0u8; 0]), "0x");
    }
}
