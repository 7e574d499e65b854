//! ABI error types

use thiserror::Error;

use crate::revert::RevertReason;

/// ABI error type
///
/// Every variant is a recoverable, caller-surfaced failure. A given input
/// always fails the same way.
#[derive(Debug, Error)]
pub enum AbiError {
    /// A fragment or parameter name fails the identifier grammar
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// `stateMutability` is unknown or contradicts `constant`
    #[error("invalid state mutability: {0}")]
    InvalidMutability(String),

    /// `stateMutability` contradicts `payable`, or payable and constant together
    #[error("invalid payable: {0}")]
    InvalidPayable(String),

    /// Not enough fields to resolve state mutability
    #[error("unable to determine state mutability: {0}")]
    UndeterminedStateMutability(String),

    /// Fragment `type` field absent or not the expected kind
    #[error("fragment type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected fragment type
        expected: String,
        /// Type found in the input
        got: String,
    },

    /// Malformed type string
    #[error("invalid type {input:?}: {reason}")]
    FromStringParse {
        /// Offending type string
        input: String,
        /// What is wrong with it
        reason: String,
    },

    /// Type nesting beyond the recursion limit
    #[error("type error: nesting exceeds {limit} levels")]
    TypeDepthExceeded {
        /// Configured limit
        limit: usize,
    },

    /// A value does not have the shape its type requires
    #[error("cannot encode value at {path}: expected {expected}, {reason}")]
    EncodeType {
        /// Position of the value, e.g. `[1][0]`
        path: String,
        /// Canonical type expected at that position
        expected: String,
        /// What was found instead
        reason: String,
    },

    /// Decoding read past the end of the data
    #[error("buffer overrun: need {needed} bytes at offset {offset}, {available} available")]
    BufferOverrun {
        /// Absolute position of the read
        offset: usize,
        /// Bytes required
        needed: usize,
        /// Bytes left from `offset`
        available: usize,
    },

    /// A dynamic offset points outside the data
    #[error("offset {offset} out of range: region holds {available} bytes")]
    OffsetOutOfRange {
        /// Offset as found in the head word
        offset: String,
        /// Size of the region the offset is relative to
        available: usize,
    },

    /// Non-canonical or malformed payload (dirty padding, bad UTF-8)
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// No fragment matches the lookup key
    #[error("unknown {kind}: {key}")]
    UnknownFragment {
        /// `function`, `event` or `error`
        kind: &'static str,
        /// Lookup key
        key: String,
    },

    /// A bare name matches several overloads
    #[error("ambiguous {kind} name {name:?}, candidates: {candidates}")]
    AmbiguousFragment {
        /// `function`, `event` or `error`
        kind: &'static str,
        /// Lookup name
        name: String,
        /// Matching signatures, comma separated
        candidates: String,
    },

    /// Call data or error data starts with another selector
    #[error("selector mismatch for {signature}: expected {expected}, got {got}")]
    SelectorMismatch {
        /// Fragment signature
        signature: String,
        /// Selector of the fragment
        expected: String,
        /// Selector found in the data
        got: String,
    },

    /// First log topic is not the event topic
    #[error("topic mismatch for {signature}: expected {expected}, got {got}")]
    TopicMismatch {
        /// Event signature
        signature: String,
        /// Topic of the event
        expected: String,
        /// Topic found in the log
        got: String,
    },

    /// Fewer topics than the event requires
    #[error("{signature} expects {expected} topics, got {got}")]
    TopicCount {
        /// Event signature
        signature: String,
        /// Required topic count
        expected: usize,
        /// Supplied topic count
        got: usize,
    },

    /// Return data is a revert payload
    #[error("execution reverted: {0}")]
    Revert(RevertReason),

    /// JSON ABI could not be read
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid hex string
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl AbiError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        AbiError::FromStringParse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn encode_type(expected: impl Into<String>, reason: impl Into<String>) -> Self {
        AbiError::EncodeType {
            path: String::new(),
            expected: expected.into(),
            reason: reason.into(),
        }
    }

    /// Prefix the path of an encode error with the element index it occurred at
    pub(crate) fn at_index(self, index: usize) -> Self {
        match self {
            AbiError::EncodeType {
                path,
                expected,
                reason,
            } => AbiError::EncodeType {
                path: format!("[{}]{}", index, path),
                expected,
                reason,
            },
            other => other,
        }
    }
}

impl From<hex::FromHexError> for AbiError {
    fn from(e: hex::FromHexError) -> Self {
        AbiError::InvalidHex(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_error_path_prefix() {
        let err = AbiError::encode_type("uint8", "value does not fit")
            .at_index(0)
            .at_index(2);
        match err {
            AbiError::EncodeType { path, .. } => assert_eq!(path, "[2][0]"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_at_index_leaves_other_errors() {
        let err = AbiError::InvalidData("x".into()).at_index(1);
        assert!(matches!(err, AbiError::InvalidData(_)));
    }

    #[test]
    fn test_display() {
        let err = AbiError::BufferOverrun {
            offset: 32,
            needed: 64,
            available: 10,
        };
        assert_eq!(
            err.to_string(),
            "buffer overrun: need 64 bytes at offset 32, 10 available"
        );
    }
}
