//! ABI fragments
//!
//! A [`Fragment`] is one validated entry of a JSON ABI: a function, event,
//! error or constructor. Legacy `constant`/`payable` flags and the modern
//! `stateMutability` field are reconciled by [`verified_state`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wabi_primitives::H256;

use crate::abi::{format_signature, is_identifier, FormatType, TypeDescriptor};
use crate::json::{JsonFragment, JsonParam};
use crate::AbiError;

/// Solidity function state mutability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    /// Reads nothing from state
    Pure,
    /// Reads but does not modify state
    View,
    /// Modifies state, rejects ether
    NonPayable,
    /// Modifies state, accepts ether
    Payable,
}

impl StateMutability {
    /// JSON ABI spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            StateMutability::Pure => "pure",
            StateMutability::View => "view",
            StateMutability::NonPayable => "nonpayable",
            StateMutability::Payable => "payable",
        }
    }

    /// `view` or `pure`
    pub fn is_constant(&self) -> bool {
        matches!(self, StateMutability::Pure | StateMutability::View)
    }
}

impl fmt::Display for StateMutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateMutability {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pure" => Ok(StateMutability::Pure),
            "view" => Ok(StateMutability::View),
            "nonpayable" => Ok(StateMutability::NonPayable),
            "payable" => Ok(StateMutability::Payable),
            other => Err(AbiError::InvalidMutability(format!(
                "unknown stateMutability {:?}",
                other
            ))),
        }
    }
}

/// Resolved mutability of a function or constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutabilityState {
    /// `view` or `pure`
    pub constant: bool,
    /// Accepts ether
    pub payable: bool,
    /// Canonical mutability
    pub state_mutability: StateMutability,
}

impl MutabilityState {
    /// State derived from a canonical mutability
    pub fn from_mutability(state_mutability: StateMutability) -> Self {
        Self {
            constant: state_mutability.is_constant(),
            payable: state_mutability == StateMutability::Payable,
            state_mutability,
        }
    }
}

/// Resolve state mutability from `stateMutability`, `payable` and `constant`
///
/// Precedence:
/// 1. `stateMutability` wins; explicit flags must agree with it.
/// 2. `payable` alone: a non-payable entry also needs `constant`, except
///    constructors; payable and constant together are rejected.
/// 3. `constant` alone: constant means `view`, otherwise `payable`.
/// 4. Nothing given: constructors are `payable`, anything else is an error.
pub fn verified_state(json: &JsonFragment) -> Result<MutabilityState, AbiError> {
    let is_constructor = json.ty.as_deref() == Some("constructor");

    if let Some(raw) = json.state_mutability.as_deref() {
        let state_mutability: StateMutability = raw.parse()?;
        let resolved = MutabilityState::from_mutability(state_mutability);
        if let Some(constant) = json.constant {
            if constant != resolved.constant {
                return Err(AbiError::InvalidMutability(format!(
                    "cannot have constant={} with stateMutability {}",
                    constant, raw
                )));
            }
        }
        if let Some(payable) = json.payable {
            if payable != resolved.payable {
                return Err(AbiError::InvalidPayable(format!(
                    "cannot have payable={} with stateMutability {}",
                    payable, raw
                )));
            }
        }
        return Ok(resolved);
    }

    if let Some(payable) = json.payable {
        if json.constant.is_none() && !payable && !is_constructor {
            return Err(AbiError::UndeterminedStateMutability(
                "non-payable entry without constant flag".to_string(),
            ));
        }
        let constant = json.constant.unwrap_or(false);
        if payable && constant {
            return Err(AbiError::InvalidPayable(
                "cannot have constant payable function".to_string(),
            ));
        }
        let state_mutability = if constant {
            StateMutability::View
        } else if payable {
            StateMutability::Payable
        } else {
            StateMutability::NonPayable
        };
        return Ok(MutabilityState {
            constant,
            payable,
            state_mutability,
        });
    }

    if let Some(constant) = json.constant {
        return Ok(MutabilityState {
            constant,
            payable: !constant,
            state_mutability: if constant {
                StateMutability::View
            } else {
                StateMutability::Payable
            },
        });
    }

    if !is_constructor {
        return Err(AbiError::UndeterminedStateMutability(format!(
            "{} has none of stateMutability, payable, constant",
            json.name.as_deref().unwrap_or("entry")
        )));
    }

    Ok(MutabilityState::from_mutability(StateMutability::Payable))
}

/// Kind-specific part of a [`Fragment`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentKind {
    /// `function`
    Function {
        /// Resolved mutability
        state: MutabilityState,
        /// Return values
        outputs: Vec<TypeDescriptor>,
    },
    /// `constructor`
    Constructor {
        /// Resolved mutability
        state: MutabilityState,
    },
    /// `event`
    Event {
        /// Anonymous events carry no signature topic
        anonymous: bool,
    },
    /// `error`
    Error,
}

/// One validated ABI entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Entry name, empty for constructors
    pub name: String,
    /// Input parameters
    pub inputs: Vec<TypeDescriptor>,
    /// Kind and kind-specific fields
    pub kind: FragmentKind,
}

impl Fragment {
    /// Build from any JSON ABI entry kind except `fallback`/`receive`
    pub fn from_json(json: &JsonFragment) -> Result<Self, AbiError> {
        match json.ty.as_deref() {
            Some("function") => Self::function_from_json(json),
            Some("event") => Self::event_from_json(json),
            Some("error") => Self::error_from_json(json),
            Some("constructor") => Self::constructor_from_json(json),
            other => Err(AbiError::TypeMismatch {
                expected: "function, event, error or constructor".to_string(),
                got: other.unwrap_or("nothing").to_string(),
            }),
        }
    }

    /// Build a function fragment
    pub fn function_from_json(json: &JsonFragment) -> Result<Self, AbiError> {
        expect_type(json, "function")?;
        let state = verified_state(json)?;
        Ok(Self {
            name: verified_name(json)?,
            inputs: params(json.inputs.as_deref())?,
            kind: FragmentKind::Function {
                state,
                outputs: params(json.outputs.as_deref())?,
            },
        })
    }

    /// Build an event fragment
    pub fn event_from_json(json: &JsonFragment) -> Result<Self, AbiError> {
        expect_type(json, "event")?;
        Ok(Self {
            name: verified_name(json)?,
            inputs: params(json.inputs.as_deref())?,
            kind: FragmentKind::Event {
                anonymous: json.anonymous.unwrap_or(false),
            },
        })
    }

    /// Build an error fragment
    pub fn error_from_json(json: &JsonFragment) -> Result<Self, AbiError> {
        expect_type(json, "error")?;
        Ok(Self {
            name: verified_name(json)?,
            inputs: params(json.inputs.as_deref())?,
            kind: FragmentKind::Error,
        })
    }

    /// Build a constructor fragment
    pub fn constructor_from_json(json: &JsonFragment) -> Result<Self, AbiError> {
        expect_type(json, "constructor")?;
        let state = verified_state(json)?;
        if state.constant {
            return Err(AbiError::InvalidMutability(
                "constructor cannot be constant".to_string(),
            ));
        }
        Ok(Self {
            name: String::new(),
            inputs: params(json.inputs.as_deref())?,
            kind: FragmentKind::Constructor { state },
        })
    }

    /// Non-payable `constructor()`, used when an ABI declares none
    pub fn default_constructor() -> Self {
        Self {
            name: String::new(),
            inputs: Vec::new(),
            kind: FragmentKind::Constructor {
                state: MutabilityState::from_mutability(StateMutability::NonPayable),
            },
        }
    }

    /// `function`, `event`, `error` or `constructor`
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            FragmentKind::Function { .. } => "function",
            FragmentKind::Constructor { .. } => "constructor",
            FragmentKind::Event { .. } => "event",
            FragmentKind::Error => "error",
        }
    }

    /// Return values; empty for anything but functions
    pub fn outputs(&self) -> &[TypeDescriptor] {
        match &self.kind {
            FragmentKind::Function { outputs, .. } => outputs,
            _ => &[],
        }
    }

    /// Resolved mutability of functions and constructors
    pub fn state(&self) -> Option<&MutabilityState> {
        match &self.kind {
            FragmentKind::Function { state, .. } | FragmentKind::Constructor { state } => Some(state),
            _ => None,
        }
    }

    /// Whether this is an anonymous event
    pub fn is_anonymous(&self) -> bool {
        matches!(self.kind, FragmentKind::Event { anonymous: true })
    }

    /// Canonical signature, `transfer(address,uint256)`
    pub fn signature(&self) -> String {
        self.format(FormatType::Sighash)
    }

    /// 4-byte selector of a function or error
    pub fn selector(&self) -> Option<[u8; 4]> {
        match self.kind {
            FragmentKind::Function { .. } | FragmentKind::Error => {
                Some(wabi_crypto::selector(&self.signature()))
            }
            _ => None,
        }
    }

    /// Signature topic of a non-anonymous event
    pub fn topic(&self) -> Option<H256> {
        match self.kind {
            FragmentKind::Event { anonymous: false } => {
                Some(wabi_crypto::keccak256(self.signature().as_bytes()))
            }
            _ => None,
        }
    }

    /// Render in the requested format
    pub fn format(&self, format: FormatType) -> String {
        if format == FormatType::Json {
            return serde_json::to_string(&self.to_json()).unwrap_or_default();
        }

        let name = match self.kind {
            FragmentKind::Constructor { .. } => "constructor",
            _ => self.name.as_str(),
        };
        if format == FormatType::Sighash {
            return format_signature(name, &self.inputs);
        }
        let params = format_params(&self.inputs, format);

        let mut out = match self.kind {
            FragmentKind::Constructor { .. } => format!("constructor({})", params),
            _ => format!("{} {}({})", self.kind_name(), name, params),
        };
        match &self.kind {
            FragmentKind::Function { state, outputs } => {
                if state.state_mutability != StateMutability::NonPayable {
                    out.push(' ');
                    out.push_str(state.state_mutability.as_str());
                }
                if !outputs.is_empty() {
                    out.push_str(&format!(" returns ({})", format_params(outputs, format)));
                }
            }
            FragmentKind::Constructor { state } => {
                if state.payable {
                    out.push_str(" payable");
                }
            }
            FragmentKind::Event { anonymous: true } => out.push_str(" anonymous"),
            FragmentKind::Event { anonymous: false } | FragmentKind::Error => {}
        }
        out
    }

    /// Convert back to the JSON ABI shape
    pub fn to_json(&self) -> JsonFragment {
        let inputs = Some(self.inputs.iter().map(TypeDescriptor::to_json).collect());
        let name = (!self.name.is_empty()).then(|| self.name.clone());
        match &self.kind {
            FragmentKind::Function { state, outputs } => JsonFragment {
                ty: Some("function".to_string()),
                name,
                inputs,
                outputs: Some(outputs.iter().map(TypeDescriptor::to_json).collect()),
                state_mutability: Some(state.state_mutability.as_str().to_string()),
                ..Default::default()
            },
            FragmentKind::Constructor { state } => JsonFragment {
                ty: Some("constructor".to_string()),
                inputs,
                state_mutability: Some(state.state_mutability.as_str().to_string()),
                ..Default::default()
            },
            FragmentKind::Event { anonymous } => JsonFragment {
                ty: Some("event".to_string()),
                name,
                inputs,
                anonymous: Some(*anonymous),
                ..Default::default()
            },
            FragmentKind::Error => JsonFragment {
                ty: Some("error".to_string()),
                name,
                inputs,
                ..Default::default()
            },
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(FormatType::Full))
    }
}

fn format_params(params: &[TypeDescriptor], format: FormatType) -> String {
    let separator = if format == FormatType::Full { ", " } else { "," };
    params
        .iter()
        .map(|p| p.format(format))
        .collect::<Vec<_>>()
        .join(separator)
}

fn expect_type(json: &JsonFragment, expected: &str) -> Result<(), AbiError> {
    match json.ty.as_deref() {
        Some(ty) if ty == expected => Ok(()),
        other => Err(AbiError::TypeMismatch {
            expected: expected.to_string(),
            got: other.unwrap_or("nothing").to_string(),
        }),
    }
}

fn verified_name(json: &JsonFragment) -> Result<String, AbiError> {
    let name = json.name.clone().unwrap_or_default();
    if !is_identifier(&name) {
        return Err(AbiError::InvalidIdentifier(name));
    }
    Ok(name)
}

fn params(params: Option<&[JsonParam]>) -> Result<Vec<TypeDescriptor>, AbiError> {
    params
        .unwrap_or_default()
        .iter()
        .map(TypeDescriptor::from_json)
        .collect()
}
