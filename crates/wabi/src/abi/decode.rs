//! ABI decoding

use wabi_primitives::{Address, U256, WORD_SIZE};

use super::param::{BaseKind, ScalarType, TypeDescriptor};
use super::types::{width_mask, Token, I256};
use super::CoderConfig;
use crate::AbiError;

/// Reader over one ABI-encoded buffer
///
/// Every read is bounds-checked; nothing is allocated from a count found in
/// the data until the data is known to be large enough to hold it.
pub(crate) struct Decoder<'a> {
    data: &'a [u8],
    config: &'a CoderConfig,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(data: &'a [u8], config: &'a CoderConfig) -> Self {
        Self { data, config }
    }

    /// Decode a head/tail region starting at `start`
    pub(crate) fn sequence(
        &self,
        types: &[TypeDescriptor],
        start: usize,
        depth: usize,
    ) -> Result<Vec<Token>, AbiError> {
        let head_size = types
            .iter()
            .fold(0usize, |acc, ty| acc.saturating_add(ty.head_size()));
        self.ensure(start, head_size)?;

        let mut tokens = Vec::with_capacity(types.len());
        let mut head = start;
        for ty in types {
            tokens.push(self.value(ty, start, head, depth)?);
            head += ty.head_size();
        }
        Ok(tokens)
    }

    /// Decode `count` elements of one type laid out as a head/tail region
    fn repeated(
        &self,
        element: &TypeDescriptor,
        count: usize,
        start: usize,
        depth: usize,
    ) -> Result<Vec<Token>, AbiError> {
        let size = element.head_size();
        self.ensure(start, count.saturating_mul(size))?;

        // count is bounded by the buffer length at this point
        let mut tokens = Vec::with_capacity(count);
        for i in 0..count {
            tokens.push(self.value(element, start, start + i * size, depth)?);
        }
        Ok(tokens)
    }

    /// Decode the value whose head word sits at `at` in the region starting at `base`
    fn value(
        &self,
        ty: &TypeDescriptor,
        base: usize,
        at: usize,
        depth: usize,
    ) -> Result<Token, AbiError> {
        if depth > self.config.max_depth {
            return Err(AbiError::TypeDepthExceeded {
                limit: self.config.max_depth,
            });
        }

        if !ty.is_dynamic() {
            return self.inline(ty, at, depth);
        }

        let start = self.offset(at, base)?;
        match &ty.kind {
            BaseKind::Scalar(ScalarType::Bytes) => Ok(Token::Bytes(self.dynamic_bytes(start)?.to_vec())),
            BaseKind::Scalar(ScalarType::String) => {
                let bytes = self.dynamic_bytes(start)?;
                let s = std::str::from_utf8(bytes)
                    .map_err(|e| AbiError::InvalidData(format!("invalid UTF-8 in string: {}", e)))?;
                Ok(Token::String(s.to_string()))
            }
            BaseKind::Array { element, length: None } => {
                let count = self.length(start)?;
                let elements = start + WORD_SIZE;
                // Every element occupies at least one word
                if count > self.remaining(elements) / WORD_SIZE {
                    return Err(AbiError::BufferOverrun {
                        offset: elements,
                        needed: count.saturating_mul(WORD_SIZE),
                        available: self.remaining(elements),
                    });
                }
                Ok(Token::Array(self.repeated(element, count, elements, depth + 1)?))
            }
            BaseKind::Array {
                element,
                length: Some(length),
            } => Ok(Token::FixedArray(self.repeated(element, *length, start, depth + 1)?)),
            BaseKind::Tuple(components) => Ok(Token::Tuple(self.sequence(components, start, depth + 1)?)),
            BaseKind::Scalar(_) => Err(AbiError::InvalidData(format!(
                "{} is not a dynamic type",
                ty.canonical_type()
            ))),
        }
    }

    /// Static values are consumed in place
    fn inline(&self, ty: &TypeDescriptor, at: usize, depth: usize) -> Result<Token, AbiError> {
        match &ty.kind {
            BaseKind::Scalar(scalar) => self.scalar(*scalar, at),
            BaseKind::Array {
                element,
                length: Some(length),
            } => Ok(Token::FixedArray(self.repeated(element, *length, at, depth + 1)?)),
            BaseKind::Tuple(components) => Ok(Token::Tuple(self.sequence(components, at, depth + 1)?)),
            BaseKind::Array { length: None, .. } => Err(AbiError::InvalidData(format!(
                "{} cannot be decoded in place",
                ty.canonical_type()
            ))),
        }
    }

    fn scalar(&self, scalar: ScalarType, at: usize) -> Result<Token, AbiError> {
        let word = self.word(at)?;
        let value = U256::from_big_endian(word);
        let strict = self.config.strict;

        match scalar {
            ScalarType::Address => {
                if strict && word[..12].iter().any(|b| *b != 0) {
                    return Err(self.dirty(scalar, at));
                }
                let mut bytes = [0u8; 20];
                bytes.copy_from_slice(&word[12..]);
                Ok(Token::Address(Address::from_bytes(bytes)))
            }
            ScalarType::Uint(bits) => {
                let mask = width_mask(bits);
                if strict && value > mask {
                    return Err(self.dirty(scalar, at));
                }
                Ok(Token::Uint(value & mask))
            }
            ScalarType::Int(bits) => {
                let decoded = I256::from_twos_complement_bits(value, bits);
                // Canonical words are sign-extended to 256 bits
                if strict && decoded.to_twos_complement() != value {
                    return Err(self.dirty(scalar, at));
                }
                Ok(Token::Int(decoded))
            }
            ScalarType::Bool => {
                if strict && value > U256::one() {
                    return Err(self.dirty(scalar, at));
                }
                Ok(Token::Bool(!value.is_zero()))
            }
            ScalarType::FixedBytes(size) => {
                if strict && word[size..].iter().any(|b| *b != 0) {
                    return Err(self.dirty(scalar, at));
                }
                Ok(Token::FixedBytes(word[..size].to_vec()))
            }
            ScalarType::Bytes | ScalarType::String => Err(AbiError::InvalidData(format!(
                "{} cannot be decoded in place",
                scalar
            ))),
        }
    }

    fn dirty(&self, scalar: ScalarType, at: usize) -> AbiError {
        AbiError::InvalidData(format!("non-canonical {} word at offset {}", scalar, at))
    }

    /// Length-prefixed byte payload at `start`
    fn dynamic_bytes(&self, start: usize) -> Result<&'a [u8], AbiError> {
        let len = self.length(start)?;
        let data_start = start + WORD_SIZE;
        self.ensure(data_start, len)?;
        let bytes = &self.data[data_start..data_start + len];

        if self.config.strict {
            let padding = (WORD_SIZE - len % WORD_SIZE) % WORD_SIZE;
            self.ensure(data_start + len, padding)?;
            let pad = &self.data[data_start + len..data_start + len + padding];
            if pad.iter().any(|b| *b != 0) {
                return Err(AbiError::InvalidData(format!(
                    "non-zero padding after dynamic bytes at offset {}",
                    start
                )));
            }
        }
        Ok(bytes)
    }

    /// Length or count word; a value beyond the buffer is an overrun
    fn length(&self, at: usize) -> Result<usize, AbiError> {
        let value = U256::from_big_endian(self.word(at)?);
        let available = self.remaining(at + WORD_SIZE);
        if value > U256::from(available) {
            return Err(AbiError::BufferOverrun {
                offset: at + WORD_SIZE,
                needed: if value > U256::from(usize::MAX) {
                    usize::MAX
                } else {
                    value.as_usize()
                },
                available,
            });
        }
        Ok(value.as_usize())
    }

    /// Follow the offset word at `at`, relative to `base`
    fn offset(&self, at: usize, base: usize) -> Result<usize, AbiError> {
        let value = U256::from_big_endian(self.word(at)?);
        let available = self.remaining(base);
        if value > U256::from(available) {
            return Err(AbiError::OffsetOutOfRange {
                offset: value.to_string(),
                available,
            });
        }
        Ok(base + value.as_usize())
    }

    fn word(&self, at: usize) -> Result<&'a [u8], AbiError> {
        self.ensure(at, WORD_SIZE)?;
        Ok(&self.data[at..at + WORD_SIZE])
    }

    fn ensure(&self, at: usize, needed: usize) -> Result<(), AbiError> {
        let available = self.remaining(at);
        if needed > available {
            return Err(AbiError::BufferOverrun {
                offset: at,
                needed,
                available,
            });
        }
        Ok(())
    }

    fn remaining(&self, at: usize) -> usize {
        self.data.len().saturating_sub(at)
    }
}
