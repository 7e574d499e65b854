//! ABI encoding

use bytes::{BufMut, BytesMut};
use wabi_primitives::{U256, WORD_SIZE};

use super::param::{BaseKind, ScalarType, TypeDescriptor};
use super::types::{width_mask, Token};
use crate::AbiError;

/// Head/tail encoder bounded by a nesting limit
pub(crate) struct Encoder {
    max_depth: usize,
}

impl Encoder {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Encode a sequence of values as one head/tail region
    ///
    /// Offsets written into the head are relative to the start of this
    /// region, so the result can be embedded anywhere by the caller.
    pub(crate) fn encode_sequence(
        &self,
        types: &[&TypeDescriptor],
        values: &[Token],
        depth: usize,
    ) -> Result<BytesMut, AbiError> {
        if types.len() != values.len() {
            return Err(AbiError::encode_type(
                format!("{} values", types.len()),
                format!("got {}", values.len()),
            ));
        }

        let head_size = types
            .iter()
            .fold(0usize, |acc, ty| acc.saturating_add(ty.head_size()));

        // Sized by the values present; a declared head can be arbitrarily large
        let mut head = BytesMut::with_capacity(values.len().saturating_mul(WORD_SIZE));
        let mut tail = BytesMut::new();

        for (index, (ty, value)) in types.iter().zip(values).enumerate() {
            let encoded = self
                .encode_value(ty, value, depth)
                .map_err(|e| e.at_index(index))?;
            if ty.is_dynamic() {
                // Offset to tail
                let offset = head_size.checked_add(tail.len()).ok_or_else(|| {
                    AbiError::encode_type(ty.canonical_type(), "offset exceeds addressable size")
                })?;
                head.put_slice(&u256_word(&U256::from(offset)));
                tail.put_slice(&encoded);
            } else {
                head.put_slice(&encoded);
            }
        }

        head.put_slice(&tail);
        Ok(head)
    }

    /// Encode one value; for dynamic types this is the tail payload
    fn encode_value(
        &self,
        ty: &TypeDescriptor,
        value: &Token,
        depth: usize,
    ) -> Result<BytesMut, AbiError> {
        if depth > self.max_depth {
            return Err(AbiError::TypeDepthExceeded {
                limit: self.max_depth,
            });
        }

        match (&ty.kind, value) {
            (BaseKind::Scalar(scalar), _) => encode_scalar(*scalar, value),
            (BaseKind::Array { element, length: None }, Token::Array(items)) => {
                let mut out = BytesMut::new();
                out.put_slice(&u256_word(&U256::from(items.len())));
                let types = vec![element.as_ref(); items.len()];
                out.put_slice(&self.encode_sequence(&types, items, depth + 1)?);
                Ok(out)
            }
            (
                BaseKind::Array {
                    element,
                    length: Some(length),
                },
                Token::FixedArray(items),
            ) => {
                if items.len() != *length {
                    return Err(AbiError::encode_type(
                        ty.canonical_type(),
                        format!("got {} elements", items.len()),
                    ));
                }
                let types = vec![element.as_ref(); items.len()];
                self.encode_sequence(&types, items, depth + 1)
            }
            (BaseKind::Tuple(components), Token::Tuple(items)) => {
                if items.len() != components.len() {
                    return Err(AbiError::encode_type(
                        ty.canonical_type(),
                        format!("got {} members", items.len()),
                    ));
                }
                let types: Vec<&TypeDescriptor> = components.iter().collect();
                self.encode_sequence(&types, items, depth + 1)
            }
            _ => Err(AbiError::encode_type(
                ty.canonical_type(),
                format!("got {}", value.kind_name()),
            )),
        }
    }

    /// In-place encoding hashed into the topic of an indexed array or tuple
    ///
    /// Values are concatenated without offsets or length prefixes; `bytes` and
    /// `string` are right-padded unless they are the outermost value.
    pub(crate) fn encode_topic_preimage(
        &self,
        ty: &TypeDescriptor,
        value: &Token,
    ) -> Result<Vec<u8>, AbiError> {
        let mut out = BytesMut::new();
        self.write_preimage(ty, value, 0, &mut out)?;
        Ok(out.to_vec())
    }

    fn write_preimage(
        &self,
        ty: &TypeDescriptor,
        value: &Token,
        depth: usize,
        out: &mut BytesMut,
    ) -> Result<(), AbiError> {
        if depth > self.max_depth {
            return Err(AbiError::TypeDepthExceeded {
                limit: self.max_depth,
            });
        }

        let items = match (&ty.kind, value) {
            (BaseKind::Scalar(ScalarType::Bytes), Token::Bytes(data)) => {
                put_preimage_bytes(out, data, depth == 0);
                return Ok(());
            }
            (BaseKind::Scalar(ScalarType::String), Token::String(s)) => {
                put_preimage_bytes(out, s.as_bytes(), depth == 0);
                return Ok(());
            }
            (BaseKind::Scalar(scalar), _) => {
                out.put_slice(&encode_scalar(*scalar, value)?);
                return Ok(());
            }
            (BaseKind::Array { length: None, .. }, Token::Array(items)) => items,
            (BaseKind::Array { length: Some(n), .. }, Token::FixedArray(items)) if items.len() == *n => {
                items
            }
            (BaseKind::Tuple(components), Token::Tuple(items)) if items.len() == components.len() => {
                items
            }
            _ => {
                return Err(AbiError::encode_type(
                    ty.canonical_type(),
                    format!("got {}", value.kind_name()),
                ))
            }
        };

        for (index, item) in items.iter().enumerate() {
            let item_ty = match &ty.kind {
                BaseKind::Tuple(components) => &components[index],
                BaseKind::Array { element, .. } => element.as_ref(),
                BaseKind::Scalar(_) => ty,
            };
            self.write_preimage(item_ty, item, depth + 1, out)
                .map_err(|e| e.at_index(index))?;
        }
        Ok(())
    }
}

fn put_preimage_bytes(out: &mut BytesMut, data: &[u8], outermost: bool) {
    out.put_slice(data);
    if !outermost {
        out.put_bytes(0, padding_len(data.len()));
    }
}

/// Encode a scalar value into its head word or, for `bytes`/`string`, its tail payload
fn encode_scalar(scalar: ScalarType, value: &Token) -> Result<BytesMut, AbiError> {
    let mut out = BytesMut::with_capacity(WORD_SIZE);
    match (scalar, value) {
        (ScalarType::Address, Token::Address(addr)) => out.put_slice(&addr.to_word()),
        (ScalarType::Uint(bits), Token::Uint(v)) => {
            if *v > width_mask(bits) {
                return Err(AbiError::encode_type(
                    scalar.to_string(),
                    format!("value {} does not fit", v),
                ));
            }
            out.put_slice(&u256_word(v));
        }
        (ScalarType::Int(bits), Token::Int(v)) => {
            if !v.fits_bits(bits) {
                return Err(AbiError::encode_type(
                    scalar.to_string(),
                    format!("value {} does not fit", v),
                ));
            }
            // Sign-extended two's complement
            out.put_slice(&u256_word(&v.to_twos_complement()));
        }
        (ScalarType::Bool, Token::Bool(b)) => {
            let mut word = [0u8; WORD_SIZE];
            word[31] = u8::from(*b);
            out.put_slice(&word);
        }
        (ScalarType::FixedBytes(size), Token::FixedBytes(data)) => {
            if data.len() != size {
                return Err(AbiError::encode_type(
                    scalar.to_string(),
                    format!("got {} bytes", data.len()),
                ));
            }
            // Left-aligned
            let mut word = [0u8; WORD_SIZE];
            word[..size].copy_from_slice(data);
            out.put_slice(&word);
        }
        (ScalarType::Bytes, Token::Bytes(data)) => put_dynamic_bytes(&mut out, data),
        (ScalarType::String, Token::String(s)) => put_dynamic_bytes(&mut out, s.as_bytes()),
        _ => {
            return Err(AbiError::encode_type(
                scalar.to_string(),
                format!("got {}", value.kind_name()),
            ))
        }
    }
    Ok(out)
}

/// Length word followed by the data right-padded to a word boundary
fn put_dynamic_bytes(out: &mut BytesMut, data: &[u8]) {
    out.put_slice(&u256_word(&U256::from(data.len())));
    out.put_slice(data);
    out.put_bytes(0, padding_len(data.len()));
}

fn padding_len(len: usize) -> usize {
    (WORD_SIZE - len % WORD_SIZE) % WORD_SIZE
}

/// Convert U256 to a 32-byte big-endian word
fn u256_word(value: &U256) -> [u8; WORD_SIZE] {
    let mut word = [0u8; WORD_SIZE];
    value.to_big_endian(&mut word);
    word
}
