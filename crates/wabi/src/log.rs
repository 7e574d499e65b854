//! Event log values

use serde_json::{json, Value};
use wabi_primitives::H256;

use crate::abi::Token;
use crate::fragment::Fragment;

/// Placeholder for an indexed parameter whose value is not in the log
///
/// `hash` is the topic word when the parameter type is hashed into its topic
/// (`string`, `bytes`, arrays, tuples), and `None` when no topics were
/// supplied at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indexed {
    /// Topic holding `keccak256` of the value, when known
    pub hash: Option<H256>,
}

/// One decoded event parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedLogEntry {
    /// Value recovered from the data or from a static topic
    Value(Token),
    /// Indexed parameter with no recoverable value
    Indexed(Indexed),
}

impl DecodedLogEntry {
    /// The recovered value, if any
    pub fn value(&self) -> Option<&Token> {
        match self {
            DecodedLogEntry::Value(token) => Some(token),
            DecodedLogEntry::Indexed(_) => None,
        }
    }

    /// The indexed placeholder, if this is one
    pub fn indexed(&self) -> Option<&Indexed> {
        match self {
            DecodedLogEntry::Indexed(indexed) => Some(indexed),
            DecodedLogEntry::Value(_) => None,
        }
    }

    /// Convert to a JSON value; placeholders become `{"indexed": true, "hash": ...}`
    pub fn to_json_value(&self) -> Value {
        match self {
            DecodedLogEntry::Value(token) => token.to_json_value(),
            DecodedLogEntry::Indexed(Indexed { hash }) => json!({
                "indexed": true,
                "hash": hash.map(|h| h.to_hex()),
            }),
        }
    }
}

/// Topics and data of an event log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLog {
    /// Signature topic (unless anonymous) followed by indexed values
    pub topics: Vec<H256>,
    /// ABI-encoded non-indexed values
    pub data: Vec<u8>,
}

/// Event log matched against an ABI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLog<'a> {
    /// Matching event
    pub event: &'a Fragment,
    /// Signature topic
    pub topic: H256,
    /// Parameters in declaration order
    pub args: Vec<DecodedLogEntry>,
}

impl ParsedLog<'_> {
    /// Parameters keyed by name (position when unnamed)
    pub fn to_json_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (i, (param, arg)) in self.event.inputs.iter().zip(&self.args).enumerate() {
            let key = if param.name.is_empty() {
                i.to_string()
            } else {
                param.name.clone()
            };
            map.insert(key, arg.to_json_value());
        }
        json!({
            "event": self.event.signature(),
            "topic": self.topic.to_hex(),
            "args": Value::Object(map),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_accessors() {
        let value = DecodedLogEntry::Value(Token::uint(1));
        assert_eq!(value.value(), Some(&Token::uint(1)));
        assert!(value.indexed().is_none());

        let placeholder = DecodedLogEntry::Indexed(Indexed { hash: None });
        assert!(placeholder.value().is_none());
        assert_eq!(placeholder.indexed().unwrap().hash, None);
    }

    #[test]
    fn test_entry_json() {
        let hashed = DecodedLogEntry::Indexed(Indexed {
            hash: Some(H256::ZERO),
        });
        assert_eq!(
            hashed.to_json_value(),
            json!({"indexed": true, "hash": H256::ZERO.to_hex()})
        );
        assert_eq!(
            DecodedLogEntry::Indexed(Indexed { hash: None }).to_json_value(),
            json!({"indexed": true, "hash": null})
        );
    }
}
