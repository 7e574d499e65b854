//! JSON ABI shapes
//!
//! These mirror the `abi.json` emitted by solc and are only a transport
//! format: [`crate::Fragment`] and [`crate::TypeDescriptor`] are built from
//! them and validated on the way.

use serde::{Deserialize, Serialize};

/// One parameter of a JSON ABI entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonParam {
    /// Parameter name, empty when unbound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Solidity type string (`uint256`, `tuple[]`, ...)
    #[serde(rename = "type")]
    pub ty: String,
    /// Event parameters only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
    /// Tuple members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<JsonParam>>,
    /// Source-level type name, informational
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
}

impl JsonParam {
    /// Parameter with just a type
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            ..Default::default()
        }
    }

    /// Set the parameter name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// One entry of a JSON ABI array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonFragment {
    /// `function`, `event`, `error`, `constructor`, `fallback` or `receive`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    /// Fragment name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Input parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<JsonParam>>,
    /// Function outputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<JsonParam>>,
    /// Modern mutability field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
    /// Legacy flag (pre-0.6 ABIs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<bool>,
    /// Legacy flag (pre-0.6 ABIs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable: Option<bool>,
    /// Events only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous: Option<bool>,
}

/// Read a JSON ABI: either a bare array or a build artifact with an `abi` key
pub fn parse_abi(json: &str) -> Result<Vec<JsonFragment>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    match value {
        serde_json::Value::Object(mut artifact) if artifact.contains_key("abi") => {
            serde_json::from_value(artifact.remove("abi").unwrap_or_default())
        }
        other => serde_json::from_value(other),
    }
}
