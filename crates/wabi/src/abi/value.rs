//! JSON-shaped values
//!
//! Integers are read from JSON numbers or from decimal / `0x` hex strings and
//! written back as decimal strings; byte values are `0x` hex.

use serde_json::{Map, Value};
use wabi_primitives::{hexutil, Address, U256};

use super::param::{BaseKind, ScalarType, TypeDescriptor};
use super::types::{Token, I256};
use crate::AbiError;

impl Token {
    /// Build a token of type `ty` from a JSON value
    ///
    /// Tuples accept either an array or an object keyed by component names.
    pub fn from_json_value(ty: &TypeDescriptor, value: &Value) -> Result<Token, AbiError> {
        let mismatch = |reason: String| AbiError::encode_type(ty.canonical_type(), reason);

        match &ty.kind {
            BaseKind::Scalar(scalar) => scalar_from_json(*scalar, value).map_err(mismatch),
            BaseKind::Array { element, length } => {
                let items = value
                    .as_array()
                    .ok_or_else(|| mismatch(format!("got {}", json_kind(value))))?;
                if let Some(length) = length {
                    if items.len() != *length {
                        return Err(mismatch(format!("got {} elements", items.len())));
                    }
                }
                let tokens = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| Token::from_json_value(element, item).map_err(|e| e.at_index(i)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(match length {
                    Some(_) => Token::FixedArray(tokens),
                    None => Token::Array(tokens),
                })
            }
            BaseKind::Tuple(components) => {
                let items: Vec<&Value> = match value {
                    Value::Array(items) => items.iter().collect(),
                    Value::Object(map) => components
                        .iter()
                        .map(|c| {
                            map.get(&c.name)
                                .ok_or_else(|| mismatch(format!("missing member {:?}", c.name)))
                        })
                        .collect::<Result<_, _>>()?,
                    other => return Err(mismatch(format!("got {}", json_kind(other)))),
                };
                if items.len() != components.len() {
                    return Err(mismatch(format!("got {} members", items.len())));
                }
                let tokens = components
                    .iter()
                    .zip(items)
                    .enumerate()
                    .map(|(i, (c, item))| Token::from_json_value(c, item).map_err(|e| e.at_index(i)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Token::Tuple(tokens))
            }
        }
    }

    /// Convert to a JSON value
    pub fn to_json_value(&self) -> Value {
        match self {
            Token::Address(addr) => Value::String(addr.to_hex()),
            Token::Uint(v) => Value::String(v.to_string()),
            Token::Int(v) => Value::String(v.to_string()),
            Token::Bool(b) => Value::Bool(*b),
            Token::Bytes(b) | Token::FixedBytes(b) => Value::String(hexutil::encode(b)),
            Token::String(s) => Value::String(s.clone()),
            Token::Array(items) | Token::FixedArray(items) | Token::Tuple(items) => {
                Value::Array(items.iter().map(Token::to_json_value).collect())
            }
        }
    }
}

/// Name tokens after the parameters they were decoded for
///
/// Unnamed parameters fall back to their position.
pub fn to_named_json(params: &[TypeDescriptor], tokens: &[Token]) -> Value {
    let mut map = Map::new();
    for (i, (param, token)) in params.iter().zip(tokens).enumerate() {
        let key = if param.name.is_empty() {
            i.to_string()
        } else {
            param.name.clone()
        };
        map.insert(key, token.to_json_value());
    }
    Value::Object(map)
}

fn scalar_from_json(scalar: ScalarType, value: &Value) -> Result<Token, String> {
    match scalar {
        ScalarType::Address => {
            let s = expect_str(value)?;
            Address::from_hex(s)
                .map(Token::Address)
                .map_err(|e| e.to_string())
        }
        ScalarType::Uint(_) => parse_uint(value).map(Token::Uint),
        ScalarType::Int(_) => parse_int(value).map(Token::Int),
        ScalarType::Bool => match value {
            Value::Bool(b) => Ok(Token::Bool(*b)),
            Value::String(s) if s == "true" => Ok(Token::Bool(true)),
            Value::String(s) if s == "false" => Ok(Token::Bool(false)),
            other => Err(format!("got {}", json_kind(other))),
        },
        ScalarType::FixedBytes(size) => {
            let bytes = hexutil::decode(expect_str(value)?).map_err(|e| e.to_string())?;
            if bytes.len() != size {
                return Err(format!("got {} bytes", bytes.len()));
            }
            Ok(Token::FixedBytes(bytes))
        }
        ScalarType::Bytes => hexutil::decode(expect_str(value)?)
            .map(Token::Bytes)
            .map_err(|e| e.to_string()),
        ScalarType::String => expect_str(value).map(Token::string),
    }
}

fn parse_uint(value: &Value) -> Result<U256, String> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(U256::from)
            .ok_or_else(|| format!("{} is not an unsigned integer", n)),
        Value::String(s) => parse_uint_str(s),
        other => Err(format!("got {}", json_kind(other))),
    }
}

fn parse_uint_str(s: &str) -> Result<U256, String> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    if digits.is_empty() {
        return Err(format!("{:?} has no digits", s));
    }
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => U256::from_str_radix(hex, 16).ok(),
        None => U256::from_dec_str(s).ok(),
    };
    parsed.ok_or_else(|| format!("{:?} is not an unsigned integer", s))
}

fn parse_int(value: &Value) -> Result<I256, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(I256::from)
            .ok_or_else(|| format!("{} is not an integer", n)),
        Value::String(s) => match s.strip_prefix('-') {
            Some(abs) => parse_uint_str(abs).map(|abs| I256::new(abs, true)),
            None => parse_uint_str(s).map(|abs| I256::new(abs, false)),
        },
        other => Err(format!("got {}", json_kind(other))),
    }
}

fn expect_str(value: &Value) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("got {}", json_kind(value)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
