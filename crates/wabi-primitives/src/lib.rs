//! # wabi-primitives
//!
//! Primitive types used by the wabi ABI codec.
//!
//! - [`Address`]: 20-byte account address
//! - [`H256`]: 32-byte word (hashes, event topics)
//! - [`U256`]: 256-bit unsigned integer, re-exported from `primitive-types`
//! - [`hexutil`]: `0x`-prefixed hex conversions

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;
pub mod hexutil;

pub use address::{Address, AddressError};
pub use hash::{HashError, H256};

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Size of one ABI word in bytes
pub const WORD_SIZE: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_word_roundtrip() {
        let value = U256::from_dec_str("115792089237316195423570985008687907853269984665640564039457584007913129639935").unwrap();
        assert_eq!(value, U256::MAX);

        let mut word = [0u8; WORD_SIZE];
        value.to_big_endian(&mut word);
        assert_eq!(word, [0xff; WORD_SIZE]);
        assert_eq!(U256::from_big_endian(&word), value);
    }
}
