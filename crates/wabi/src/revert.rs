//! Revert payloads
//!
//! Solidity reverts with `Error(string)` for `require`/`revert("...")`,
//! `Panic(uint256)` for failed assertions and arithmetic faults, or a custom
//! error declared in the contract ABI.

use std::fmt;

use wabi_primitives::{hexutil, U256};

use crate::abi::Token;

/// Selector of `Error(string)`
pub const ERROR_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Selector of `Panic(uint256)`
pub const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// Decoded reason carried by reverted return data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertReason {
    /// `Error(string)`
    Message(String),
    /// `Panic(uint256)` with the compiler-assigned code
    Panic(U256),
    /// Custom error from the ABI
    Custom {
        /// Error signature, `InsufficientBalance(uint256,uint256)`
        signature: String,
        /// Decoded arguments
        args: Vec<Token>,
    },
    /// Selector not found in the ABI
    Unknown(Vec<u8>),
}

impl RevertReason {
    /// Short description of a Solidity panic code
    pub fn panic_description(code: &U256) -> Option<&'static str> {
        if *code > U256::from(u8::MAX) {
            return None;
        }
        let description = match code.low_u32() {
            0x00 => "generic compiler panic",
            0x01 => "assertion failed",
            0x11 => "arithmetic overflow or underflow",
            0x12 => "division or modulo by zero",
            0x21 => "invalid enum value",
            0x22 => "invalid storage byte array encoding",
            0x31 => "pop on empty array",
            0x32 => "array index out of bounds",
            0x41 => "out of memory",
            0x51 => "call to zero-initialized function",
            _ => return None,
        };
        Some(description)
    }
}

impl fmt::Display for RevertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevertReason::Message(message) => write!(f, "{:?}", message),
            RevertReason::Panic(code) => match Self::panic_description(code) {
                Some(description) => write!(f, "panic 0x{:02x} ({})", code.low_u32(), description),
                None => write!(f, "panic 0x{:02x}", code),
            },
            RevertReason::Custom { signature, args } => {
                let args: Vec<String> = args.iter().map(|a| a.to_json_value().to_string()).collect();
                write!(f, "{} [{}]", signature, args.join(", "))
            }
            RevertReason::Unknown(data) => write!(f, "unknown revert data {}", hexutil::encode(data)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_match_signatures() {
        assert_eq!(wabi_crypto::selector("Error(string)"), ERROR_SELECTOR);
        assert_eq!(wabi_crypto::selector("Panic(uint256)"), PANIC_SELECTOR);
    }

    #[test]
    fn test_display() {
        assert_eq!(RevertReason::Message("no".into()).to_string(), "\"no\"");
        assert_eq!(
            RevertReason::Panic(U256::from(0x11)).to_string(),
            "panic 0x11 (arithmetic overflow or underflow)"
        );
        assert_eq!(RevertReason::Panic(U256::from(0x99)).to_string(), "panic 0x99");
        assert_eq!(
            RevertReason::Custom {
                signature: "Denied(uint256)".into(),
                args: vec![Token::uint(3)],
            }
            .to_string(),
            "Denied(uint256) [\"3\"]"
        );
        assert_eq!(RevertReason::Unknown(vec![0xde, 0xad]).to_string(), "unknown revert data 0xdead");
    }
}
