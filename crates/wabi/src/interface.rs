//! Contract interface
//!
//! An [`Interface`] indexes the fragments of one contract ABI and ties them
//! to the coder: call data, return data, deploy arguments, custom errors and
//! event logs.

use std::collections::{BTreeMap, HashMap};

use wabi_primitives::{hexutil, H256};

use crate::abi::{format_signature, parse_signature, AbiCoder, BaseKind, ScalarType, Token, TypeDescriptor};
use crate::fragment::{Fragment, FragmentKind};
use crate::json::{parse_abi, JsonFragment};
use crate::log::{DecodedLogEntry, Indexed, ParsedLog, RawLog};
use crate::revert::{RevertReason, ERROR_SELECTOR, PANIC_SELECTOR};
use crate::AbiError;

/// Call data matched against an ABI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTransaction<'a> {
    /// Matching function
    pub function: &'a Fragment,
    /// Selector found in the call data
    pub selector: [u8; 4],
    /// Decoded arguments
    pub args: Vec<Token>,
}

/// Revert data matched against the custom errors of an ABI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedError<'a> {
    /// Matching error
    pub error: &'a Fragment,
    /// Selector found in the revert data
    pub selector: [u8; 4],
    /// Decoded arguments
    pub args: Vec<Token>,
}

/// Indexed view of a contract ABI
#[derive(Debug, Clone)]
pub struct Interface {
    functions: BTreeMap<String, Fragment>,
    events: BTreeMap<String, Fragment>,
    errors: BTreeMap<String, Fragment>,
    constructor: Fragment,
    selectors: HashMap<[u8; 4], String>,
    error_selectors: HashMap<[u8; 4], String>,
    topics: HashMap<H256, String>,
    coder: AbiCoder,
}

impl Interface {
    /// Build from validated fragments
    ///
    /// Later duplicates of a signature (or a second constructor) are ignored.
    pub fn new(fragments: impl IntoIterator<Item = Fragment>) -> Self {
        let mut interface = Self {
            functions: BTreeMap::new(),
            events: BTreeMap::new(),
            errors: BTreeMap::new(),
            constructor: Fragment::default_constructor(),
            selectors: HashMap::new(),
            error_selectors: HashMap::new(),
            topics: HashMap::new(),
            coder: AbiCoder::default(),
        };

        let mut has_constructor = false;
        for fragment in fragments {
            let signature = fragment.signature();
            match fragment.kind {
                FragmentKind::Constructor { .. } => {
                    if has_constructor {
                        tracing::warn!("duplicate constructor definition ignored");
                        continue;
                    }
                    has_constructor = true;
                    interface.constructor = fragment;
                }
                FragmentKind::Function { .. } => {
                    if interface.functions.contains_key(&signature) {
                        tracing::warn!(%signature, "duplicate function definition ignored");
                        continue;
                    }
                    if let Some(selector) = fragment.selector() {
                        interface.selectors.insert(selector, signature.clone());
                    }
                    interface.functions.insert(signature, fragment);
                }
                FragmentKind::Event { .. } => {
                    if interface.events.contains_key(&signature) {
                        tracing::warn!(%signature, "duplicate event definition ignored");
                        continue;
                    }
                    if let Some(topic) = fragment.topic() {
                        interface.topics.insert(topic, signature.clone());
                    }
                    interface.events.insert(signature, fragment);
                }
                FragmentKind::Error => {
                    if interface.errors.contains_key(&signature) {
                        tracing::warn!(%signature, "duplicate error definition ignored");
                        continue;
                    }
                    if let Some(selector) = fragment.selector() {
                        interface.error_selectors.insert(selector, signature.clone());
                    }
                    interface.errors.insert(signature, fragment);
                }
            }
        }

        tracing::debug!(
            functions = interface.functions.len(),
            events = interface.events.len(),
            errors = interface.errors.len(),
            "interface built"
        );
        interface
    }

    /// Build from JSON ABI entries; `fallback` and `receive` are skipped
    pub fn from_json_fragments(entries: &[JsonFragment]) -> Result<Self, AbiError> {
        let mut fragments = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry.ty.as_deref() {
                Some(kind @ ("fallback" | "receive")) => {
                    tracing::debug!(kind, "skipping ABI entry without inputs");
                }
                _ => fragments.push(Fragment::from_json(entry)?),
            }
        }
        Ok(Self::new(fragments))
    }

    /// Parse a JSON ABI array or build artifact
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        Self::from_json_fragments(&parse_abi(json)?)
    }

    /// Replace the coder used for every encode/decode
    pub fn with_coder(mut self, coder: AbiCoder) -> Self {
        self.coder = coder;
        self
    }

    /// Coder in use
    pub fn coder(&self) -> &AbiCoder {
        &self.coder
    }

    /// Functions ordered by signature
    pub fn functions(&self) -> impl Iterator<Item = &Fragment> {
        self.functions.values()
    }

    /// Events ordered by signature
    pub fn events(&self) -> impl Iterator<Item = &Fragment> {
        self.events.values()
    }

    /// Custom errors ordered by signature
    pub fn errors(&self) -> impl Iterator<Item = &Fragment> {
        self.errors.values()
    }

    /// The declared constructor, or a non-payable `constructor()`
    pub fn constructor(&self) -> &Fragment {
        &self.constructor
    }

    // ==================== Lookup ====================

    /// Find a function by name, signature or `0x` selector
    pub fn function(&self, key: &str) -> Result<&Fragment, AbiError> {
        lookup(&self.functions, &self.selectors, "function", key)
    }

    /// Find a custom error by name, signature or `0x` selector
    pub fn error(&self, key: &str) -> Result<&Fragment, AbiError> {
        lookup(&self.errors, &self.error_selectors, "error", key)
    }

    /// Find an event by name, signature or `0x` topic
    pub fn event(&self, key: &str) -> Result<&Fragment, AbiError> {
        if key.starts_with("0x") {
            let topic = H256::from_hex(key).map_err(|e| AbiError::InvalidHex(e.to_string()))?;
            return self.event_by_topic(&topic);
        }
        lookup_by_name(&self.events, "event", key)
    }

    fn event_by_topic(&self, topic: &H256) -> Result<&Fragment, AbiError> {
        self.topics
            .get(topic)
            .and_then(|signature| self.events.get(signature))
            .ok_or_else(|| AbiError::UnknownFragment {
                kind: "event",
                key: topic.to_hex(),
            })
    }

    // ==================== Functions ====================

    /// Selector followed by the encoded arguments
    pub fn encode_function_data(&self, function: &Fragment, values: &[Token]) -> Result<Vec<u8>, AbiError> {
        let selector = expect_selector(function, "function")?;
        let mut data = selector.to_vec();
        data.extend(self.coder.encode(&function.inputs, values)?);
        Ok(data)
    }

    /// Check the selector and decode the arguments of call data
    pub fn decode_function_data(&self, function: &Fragment, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        let selector = expect_selector(function, "function")?;
        let args = strip_selector(function, &selector, data)?;
        self.coder.decode(&function.inputs, args)
    }

    /// Encode return values
    pub fn encode_function_result(&self, function: &Fragment, values: &[Token]) -> Result<Vec<u8>, AbiError> {
        expect_kind(function, "function")?;
        self.coder.encode(function.outputs(), values)
    }

    /// Decode return data
    ///
    /// Revert payloads (`Error(string)`, `Panic(uint256)` or a custom error)
    /// fail with [`AbiError::Revert`].
    pub fn decode_function_result(&self, function: &Fragment, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        expect_kind(function, "function")?;
        // Well-formed return data is always whole words
        if data.len() % 32 == 4 {
            return Err(AbiError::Revert(self.revert_reason(data)));
        }
        self.coder.decode(function.outputs(), data)
    }

    /// Constructor arguments, to be appended to the creation bytecode
    pub fn encode_deploy(&self, values: &[Token]) -> Result<Vec<u8>, AbiError> {
        self.coder.encode(&self.constructor.inputs, values)
    }

    // ==================== Errors ====================

    /// Selector followed by the encoded error arguments
    pub fn encode_error_result(&self, error: &Fragment, values: &[Token]) -> Result<Vec<u8>, AbiError> {
        let selector = expect_selector(error, "error")?;
        let mut data = selector.to_vec();
        data.extend(self.coder.encode(&error.inputs, values)?);
        Ok(data)
    }

    /// Check the selector and decode the arguments of revert data
    pub fn decode_error_result(&self, error: &Fragment, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        let selector = expect_selector(error, "error")?;
        let args = strip_selector(error, &selector, data)?;
        self.coder.decode(&error.inputs, args)
    }

    /// Interpret revert data: built-in `Error`/`Panic`, then custom errors
    pub fn revert_reason(&self, data: &[u8]) -> RevertReason {
        let Some((selector, args)) = split_selector(data) else {
            return RevertReason::Unknown(data.to_vec());
        };

        let builtin = match selector {
            ERROR_SELECTOR => self
                .coder
                .decode(&[TypeDescriptor::scalar(ScalarType::String)], args)
                .ok()
                .and_then(|mut tokens| match tokens.pop() {
                    Some(Token::String(message)) => Some(RevertReason::Message(message)),
                    _ => None,
                }),
            PANIC_SELECTOR => self
                .coder
                .decode(&[TypeDescriptor::scalar(ScalarType::Uint(256))], args)
                .ok()
                .and_then(|mut tokens| match tokens.pop() {
                    Some(Token::Uint(code)) => Some(RevertReason::Panic(code)),
                    _ => None,
                }),
            _ => None,
        };
        if let Some(reason) = builtin {
            return reason;
        }

        match self.parse_error(data) {
            Ok(parsed) => RevertReason::Custom {
                signature: parsed.error.signature(),
                args: parsed.args,
            },
            Err(_) => RevertReason::Unknown(data.to_vec()),
        }
    }

    // ==================== Events ====================

    /// Topics and data for an event emitted with `values`
    ///
    /// Static indexed values are stored as their word; `string` and `bytes`
    /// as `keccak256` of their contents; arrays and tuples as `keccak256` of
    /// their in-place encoding.
    pub fn encode_event_log(&self, event: &Fragment, values: &[Token]) -> Result<RawLog, AbiError> {
        expect_kind(event, "event")?;
        if values.len() != event.inputs.len() {
            return Err(AbiError::EncodeType {
                path: String::new(),
                expected: format!("{} values", event.inputs.len()),
                reason: format!("got {}", values.len()),
            });
        }

        let mut topics: Vec<H256> = event.topic().into_iter().collect();
        let mut data_types = Vec::new();
        let mut data_values = Vec::new();

        for (index, (param, value)) in event.inputs.iter().zip(values).enumerate() {
            if param.is_indexed() {
                topics.push(self.indexed_topic(param, value).map_err(|e| e.at_index(index))?);
            } else {
                data_types.push(param.clone());
                data_values.push(value.clone());
            }
        }

        let data = self.coder.encode(&data_types, &data_values)?;
        Ok(RawLog { topics, data })
    }

    fn indexed_topic(&self, param: &TypeDescriptor, value: &Token) -> Result<H256, AbiError> {
        match &param.kind {
            BaseKind::Scalar(ScalarType::String | ScalarType::Bytes) | BaseKind::Array { .. } | BaseKind::Tuple(_) => {
                let preimage = self.coder.encode_topic_preimage(param, value)?;
                Ok(wabi_crypto::keccak256(preimage))
            }
            BaseKind::Scalar(_) => {
                let word = self.coder.encode(std::slice::from_ref(param), std::slice::from_ref(value))?;
                H256::from_slice(&word).map_err(|e| AbiError::InvalidData(e.to_string()))
            }
        }
    }

    /// Decode an event log
    ///
    /// Without `topics`, every indexed parameter becomes
    /// `Indexed { hash: None }`. With them, static indexed values are decoded
    /// from their topic and hashed ones become `Indexed { hash: Some(topic) }`.
    /// Entries follow the declaration order of the event inputs.
    pub fn decode_event_log(
        &self,
        event: &Fragment,
        data: &[u8],
        topics: Option<&[H256]>,
    ) -> Result<Vec<DecodedLogEntry>, AbiError> {
        expect_kind(event, "event")?;

        let indexed_topics = match topics {
            Some(topics) => Some(self.indexed_topics(event, topics)?),
            None => None,
        };

        let data_types: Vec<TypeDescriptor> = event
            .inputs
            .iter()
            .filter(|p| !p.is_indexed())
            .cloned()
            .collect();
        let mut data_values = self.coder.decode(&data_types, data)?.into_iter();
        let mut topic_values = indexed_topics.unwrap_or_default().into_iter();

        let mut entries = Vec::with_capacity(event.inputs.len());
        for param in &event.inputs {
            let entry = if param.is_indexed() {
                match (topics.is_some(), topic_values.next()) {
                    (true, Some(topic)) => self.decode_topic(param, *topic)?,
                    _ => DecodedLogEntry::Indexed(Indexed { hash: None }),
                }
            } else {
                match data_values.next() {
                    Some(token) => DecodedLogEntry::Value(token),
                    None => {
                        return Err(AbiError::InvalidData(
                            "fewer decoded values than non-indexed inputs".to_string(),
                        ))
                    }
                }
            };
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Check the signature topic and return the topics of the indexed inputs
    fn indexed_topics<'t>(&self, event: &Fragment, topics: &'t [H256]) -> Result<&'t [H256], AbiError> {
        let indexed = event.inputs.iter().filter(|p| p.is_indexed()).count();
        let rest = match event.topic() {
            Some(expected) => {
                let first = topics.first().ok_or_else(|| AbiError::TopicCount {
                    signature: event.signature(),
                    expected: indexed + 1,
                    got: 0,
                })?;
                if *first != expected {
                    return Err(AbiError::TopicMismatch {
                        signature: event.signature(),
                        expected: expected.to_hex(),
                        got: first.to_hex(),
                    });
                }
                &topics[1..]
            }
            None => topics,
        };

        if rest.len() < indexed {
            return Err(AbiError::TopicCount {
                signature: event.signature(),
                expected: indexed + topics.len() - rest.len(),
                got: topics.len(),
            });
        }
        Ok(&rest[..indexed])
    }

    fn decode_topic(&self, param: &TypeDescriptor, topic: H256) -> Result<DecodedLogEntry, AbiError> {
        match &param.kind {
            BaseKind::Scalar(ScalarType::String | ScalarType::Bytes) | BaseKind::Array { .. } | BaseKind::Tuple(_) => {
                Ok(DecodedLogEntry::Indexed(Indexed { hash: Some(topic) }))
            }
            BaseKind::Scalar(_) => {
                let mut tokens = self.coder.decode(std::slice::from_ref(param), topic.as_bytes())?;
                tokens
                    .pop()
                    .map(DecodedLogEntry::Value)
                    .ok_or_else(|| AbiError::InvalidData("empty topic decode".to_string()))
            }
        }
    }

    // ==================== Parsing ====================

    /// Match call data to a function by selector and decode its arguments
    pub fn parse_transaction(&self, data: &[u8]) -> Result<ParsedTransaction<'_>, AbiError> {
        let (selector, args) = split_selector(data).ok_or_else(|| short_data(data))?;
        let function = self.function(&hexutil::encode(selector))?;
        Ok(ParsedTransaction {
            function,
            selector,
            args: self.coder.decode(&function.inputs, args)?,
        })
    }

    /// Match a log to an event by its first topic and decode it
    pub fn parse_log(&self, topics: &[H256], data: &[u8]) -> Result<ParsedLog<'_>, AbiError> {
        let topic = topics.first().ok_or_else(|| AbiError::UnknownFragment {
            kind: "event",
            key: "log without topics".to_string(),
        })?;
        let event = self.event_by_topic(topic)?;
        Ok(ParsedLog {
            event,
            topic: *topic,
            args: self.decode_event_log(event, data, Some(topics))?,
        })
    }

    /// Match revert data to a custom error by selector and decode it
    pub fn parse_error(&self, data: &[u8]) -> Result<ParsedError<'_>, AbiError> {
        let (selector, args) = split_selector(data).ok_or_else(|| short_data(data))?;
        let error = self.error(&hexutil::encode(selector))?;
        Ok(ParsedError {
            error,
            selector,
            args: self.coder.decode(&error.inputs, args)?,
        })
    }
}

fn lookup<'a>(
    fragments: &'a BTreeMap<String, Fragment>,
    selectors: &HashMap<[u8; 4], String>,
    kind: &'static str,
    key: &str,
) -> Result<&'a Fragment, AbiError> {
    if key.starts_with("0x") {
        let bytes = hexutil::decode(key)?;
        let selector: [u8; 4] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AbiError::InvalidHex(format!("{} is not a 4-byte selector", key)))?;
        return selectors
            .get(&selector)
            .and_then(|signature| fragments.get(signature))
            .ok_or_else(|| AbiError::UnknownFragment {
                kind,
                key: key.to_string(),
            });
    }
    lookup_by_name(fragments, kind, key)
}

fn lookup_by_name<'a>(
    fragments: &'a BTreeMap<String, Fragment>,
    kind: &'static str,
    key: &str,
) -> Result<&'a Fragment, AbiError> {
    let unknown = || AbiError::UnknownFragment {
        kind,
        key: key.to_string(),
    };

    if key.contains('(') {
        let (name, params) = parse_signature(key)?;
        return fragments
            .get(&format_signature(&name, &params))
            .ok_or_else(unknown);
    }

    let matches: Vec<&Fragment> = fragments.values().filter(|f| f.name == key).collect();
    match matches.as_slice() {
        [] => Err(unknown()),
        [fragment] => Ok(fragment),
        _ => Err(AbiError::AmbiguousFragment {
            kind,
            name: key.to_string(),
            candidates: matches
                .iter()
                .map(|f| f.signature())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

fn expect_kind(fragment: &Fragment, expected: &str) -> Result<(), AbiError> {
    if fragment.kind_name() != expected {
        return Err(AbiError::TypeMismatch {
            expected: expected.to_string(),
            got: fragment.kind_name().to_string(),
        });
    }
    Ok(())
}

fn expect_selector(fragment: &Fragment, expected: &str) -> Result<[u8; 4], AbiError> {
    expect_kind(fragment, expected)?;
    fragment.selector().ok_or_else(|| AbiError::TypeMismatch {
        expected: expected.to_string(),
        got: fragment.kind_name().to_string(),
    })
}

fn split_selector(data: &[u8]) -> Option<([u8; 4], &[u8])> {
    if data.len() < 4 {
        return None;
    }
    let (selector, rest) = data.split_at(4);
    let mut out = [0u8; 4];
    out.copy_from_slice(selector);
    Some((out, rest))
}

fn strip_selector<'d>(fragment: &Fragment, expected: &[u8; 4], data: &'d [u8]) -> Result<&'d [u8], AbiError> {
    let (selector, args) = split_selector(data).ok_or_else(|| short_data(data))?;
    if selector != *expected {
        return Err(AbiError::SelectorMismatch {
            signature: fragment.signature(),
            expected: hexutil::encode(expected),
            got: hexutil::encode(selector),
        });
    }
    Ok(args)
}

fn short_data(data: &[u8]) -> AbiError {
    AbiError::BufferOverrun {
        offset: 0,
        needed: 4,
        available: data.len(),
    }
}
