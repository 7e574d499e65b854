//! ABI value types

use std::fmt;

use wabi_primitives::{Address, H256, U256};

/// A Solidity ABI value
///
/// The variant must agree with the [`TypeDescriptor`](super::TypeDescriptor)
/// it is encoded against; the coder never converts between variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer (8-256 bits)
    Uint(U256),
    /// Signed integer (8-256 bits)
    Int(I256),
    /// Boolean
    Bool(bool),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Dynamic array
    Array(Vec<Token>),
    /// Fixed-size array
    FixedArray(Vec<Token>),
    /// Tuple (struct)
    Tuple(Vec<Token>),
}

impl Token {
    /// Create a uint256 from u128
    pub fn uint(value: u128) -> Self {
        Token::Uint(U256::from(value))
    }

    /// Create an int256 from i128
    pub fn int(value: i128) -> Self {
        Token::Int(I256::from_i128(value))
    }

    /// Create a string token
    pub fn string(s: impl Into<String>) -> Self {
        Token::String(s.into())
    }

    /// Create a bytes32 token
    pub fn bytes32(data: H256) -> Self {
        Token::FixedBytes(data.as_bytes().to_vec())
    }

    /// Short name of the variant, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Address(_) => "address",
            Token::Uint(_) => "uint",
            Token::Int(_) => "int",
            Token::Bool(_) => "bool",
            Token::Bytes(_) => "bytes",
            Token::FixedBytes(_) => "fixed bytes",
            Token::String(_) => "string",
            Token::Array(_) => "array",
            Token::FixedArray(_) => "fixed array",
            Token::Tuple(_) => "tuple",
        }
    }

    /// Unsigned integer value
    pub fn as_uint(&self) -> Option<&U256> {
        match self {
            Token::Uint(v) => Some(v),
            _ => None,
        }
    }

    /// Signed integer value
    pub fn as_int(&self) -> Option<&I256> {
        match self {
            Token::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Address value
    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Token::Address(a) => Some(a),
            _ => None,
        }
    }

    /// String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Token::String(s) => Some(s),
            _ => None,
        }
    }

    /// Bytes of a `bytes` or `bytesN` value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Token::Bytes(b) | Token::FixedBytes(b) => Some(b),
            _ => None,
        }
    }

    /// Elements of an array, fixed array or tuple
    pub fn as_slice(&self) -> Option<&[Token]> {
        match self {
            Token::Array(items) | Token::FixedArray(items) | Token::Tuple(items) => Some(items),
            _ => None,
        }
    }
}

/// Signed 256-bit integer as sign and magnitude
///
/// Zero is never negative, so derived equality is numeric equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct I256 {
    /// Absolute value
    pub abs: U256,
    /// Sign (true if negative)
    pub negative: bool,
}

impl I256 {
    /// Create a new I256
    pub fn new(abs: U256, negative: bool) -> Self {
        Self {
            abs,
            negative: negative && !abs.is_zero(),
        }
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }

    /// Parse a decimal string with optional leading `-`
    pub fn from_dec_str(s: &str) -> Option<Self> {
        match s.strip_prefix('-') {
            Some(digits) => Some(Self::new(U256::from_dec_str(digits).ok()?, true)),
            None => Some(Self::new(U256::from_dec_str(s).ok()?, false)),
        }
    }

    /// Interpret a full 256-bit word as two's complement
    pub fn from_twos_complement(word: U256) -> Self {
        Self::from_twos_complement_bits(word, 256)
    }

    /// Interpret the low `bits` bits of `word` as a two's-complement integer
    pub fn from_twos_complement_bits(word: U256, bits: usize) -> Self {
        let mask = width_mask(bits);
        let low = word & mask;
        if low.bit(bits - 1) {
            let abs = ((!low) & mask) + U256::one();
            Self::new(abs, true)
        } else {
            Self::new(low, false)
        }
    }

    /// Two's-complement representation over 256 bits (sign-extended)
    pub fn to_twos_complement(&self) -> U256 {
        if self.negative {
            (!self.abs).overflowing_add(U256::one()).0
        } else {
            self.abs
        }
    }

    /// Whether the value is representable as `int<bits>`
    pub fn fits_bits(&self, bits: usize) -> bool {
        let limit = U256::one() << (bits - 1);
        if self.negative {
            self.abs <= limit
        } else {
            self.abs < limit
        }
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        Self::from_i128(value as i128)
    }
}

impl From<i128> for I256 {
    fn from(value: i128) -> Self {
        Self::from_i128(value)
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

/// All-ones mask over the low `bits` bits
pub(crate) fn width_mask(bits: usize) -> U256 {
    if bits >= 256 {
        U256::MAX
    } else {
        (U256::one() << bits) - U256::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i256_from_i128() {
        let positive = I256::from_i128(100);
        assert!(!positive.negative);
        assert_eq!(positive.abs, U256::from(100));

        let negative = I256::from_i128(-100);
        assert!(negative.negative);
        assert_eq!(negative.abs, U256::from(100));

        assert!(I256::from_i128(0).is_zero());
        assert_eq!(I256::from_i128(i128::MIN).abs, U256::from(1u128 << 127));
    }

    #[test]
    fn test_i256_negative_zero_is_zero() {
        assert_eq!(I256::new(U256::zero(), true), I256::default());
    }

    #[test]
    fn test_i256_twos_complement() {
        assert_eq!(I256::from_i128(-1).to_twos_complement(), U256::MAX);
        assert_eq!(I256::from_twos_complement(U256::MAX), I256::from_i128(-1));

        let min = I256::new(U256::one() << 255, true);
        assert_eq!(min.to_twos_complement(), U256::one() << 255);
        assert_eq!(I256::from_twos_complement(U256::one() << 255), min);
    }

    #[test]
    fn test_i256_narrow_twos_complement() {
        // 0x80 as int8 is -128
        let v = I256::from_twos_complement_bits(U256::from(0x80), 8);
        assert_eq!(v, I256::from_i128(-128));
        // high bits above the width are ignored
        let v = I256::from_twos_complement_bits(U256::from(0x1_7f), 8);
        assert_eq!(v, I256::from_i128(127));
    }

    #[test]
    fn test_i256_fits_bits() {
        assert!(I256::from_i128(127).fits_bits(8));
        assert!(!I256::from_i128(128).fits_bits(8));
        assert!(I256::from_i128(-128).fits_bits(8));
        assert!(!I256::from_i128(-129).fits_bits(8));
        assert!(I256::new(U256::one() << 255, true).fits_bits(256));
        assert!(!I256::new(U256::one() << 255, false).fits_bits(256));
    }

    #[test]
    fn test_i256_dec_str() {
        assert_eq!(I256::from_dec_str("-42").unwrap(), I256::from_i128(-42));
        assert_eq!(I256::from_dec_str("42").unwrap(), I256::from_i128(42));
        assert!(I256::from_dec_str("4x2").is_none());
        assert_eq!(I256::from_i128(-42).to_string(), "-42");
    }

    #[test]
    fn test_width_mask() {
        assert_eq!(width_mask(8), U256::from(0xff));
        assert_eq!(width_mask(256), U256::MAX);
    }

    #[test]
    fn test_token_accessors() {
        assert_eq!(Token::uint(7).as_uint(), Some(&U256::from(7)));
        assert_eq!(Token::string("a").as_str(), Some("a"));
        assert_eq!(Token::Bool(true).as_uint(), None);
        assert_eq!(
            Token::Tuple(vec![Token::Bool(true)]).as_slice().map(|s| s.len()),
            Some(1)
        );
        assert_eq!(Token::FixedArray(vec![]).kind_name(), "fixed array");
    }
}
