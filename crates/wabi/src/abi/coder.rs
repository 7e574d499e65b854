//! Coder entry points

use serde::{Deserialize, Serialize};

use super::decode::Decoder;
use super::encode::Encoder;
use super::param::{TypeDescriptor, MAX_TYPE_DEPTH};
use super::types::Token;
use crate::AbiError;

/// Decoding and recursion settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoderConfig {
    /// Reject non-canonical words instead of masking them
    #[serde(default = "default_strict")]
    pub strict: bool,
    /// Maximum array/tuple nesting followed by the coder
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_strict() -> bool {
    true
}

fn default_max_depth() -> usize {
    MAX_TYPE_DEPTH
}

impl Default for CoderConfig {
    fn default() -> Self {
        Self {
            strict: default_strict(),
            max_depth: default_max_depth(),
        }
    }
}

/// ABI encoder/decoder
///
/// Stateless apart from its configuration; share one instance freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbiCoder {
    config: CoderConfig,
}

impl AbiCoder {
    /// Create a coder with the given settings
    pub fn new(config: CoderConfig) -> Self {
        Self { config }
    }

    /// Active settings
    pub fn config(&self) -> &CoderConfig {
        &self.config
    }

    /// Encode `values` against `types` as one head/tail region
    pub fn encode(&self, types: &[TypeDescriptor], values: &[Token]) -> Result<Vec<u8>, AbiError> {
        let refs: Vec<&TypeDescriptor> = types.iter().collect();
        let encoded = Encoder::new(self.config.max_depth).encode_sequence(&refs, values, 0)?;
        tracing::trace!(params = types.len(), bytes = encoded.len(), "abi encode");
        Ok(encoded.to_vec())
    }

    /// Decode `data` as a head/tail region holding `types`
    ///
    /// Bytes after the last value are ignored.
    pub fn decode(&self, types: &[TypeDescriptor], data: &[u8]) -> Result<Vec<Token>, AbiError> {
        tracing::trace!(params = types.len(), bytes = data.len(), strict = self.config.strict, "abi decode");
        Decoder::new(data, &self.config).sequence(types, 0, 0)
    }

    /// In-place encoding of one value, as hashed into an indexed event topic
    pub fn encode_topic_preimage(&self, ty: &TypeDescriptor, value: &Token) -> Result<Vec<u8>, AbiError> {
        Encoder::new(self.config.max_depth).encode_topic_preimage(ty, value)
    }
}

/// Encode with the default (strict) coder
pub fn encode(types: &[TypeDescriptor], values: &[Token]) -> Result<Vec<u8>, AbiError> {
    AbiCoder::default().encode(types, values)
}

/// Decode with the default (strict) coder
pub fn decode(types: &[TypeDescriptor], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    AbiCoder::default().decode(types, data)
}
