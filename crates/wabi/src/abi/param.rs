//! Type descriptors
//!
//! A [`TypeDescriptor`] is the parsed form of one Solidity type occurrence:
//! a scalar, a tuple of named components, or an array of an element type.
//! Descriptors come either from a JSON ABI parameter
//! ([`TypeDescriptor::from_json`]) or from a human-readable type string
//! ([`TypeDescriptor::parse`]), and render back with [`TypeDescriptor::format`].

use std::fmt;
use std::str::FromStr;

use crate::json::JsonParam;
use crate::AbiError;

/// Maximum nesting of arrays and tuples in one type
pub const MAX_TYPE_DEPTH: usize = 64;

/// Output formats for types and fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Canonical form hashed into selectors and topics: `(address,uint256)[]`
    Sighash,
    /// Human-readable form with names: `tuple(address owner, uint256 amount)[] items`
    Full,
    /// JSON ABI form
    Json,
}

/// Elementary (non-composite) Solidity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// `address`
    Address,
    /// `bool`
    Bool,
    /// `uintN`, bit width
    Uint(usize),
    /// `intN`, bit width
    Int(usize),
    /// `bytesN`, byte length
    FixedBytes(usize),
    /// `bytes`
    Bytes,
    /// `string`
    String,
}

impl ScalarType {
    /// Parse and canonicalize an elementary type name
    ///
    /// `uint`/`int` widen to 256 bits and the legacy `byte` alias becomes
    /// `bytes1`.
    pub fn parse(s: &str) -> Result<Self, AbiError> {
        match s {
            "address" => return Ok(ScalarType::Address),
            "bool" => return Ok(ScalarType::Bool),
            "string" => return Ok(ScalarType::String),
            "bytes" => return Ok(ScalarType::Bytes),
            "byte" => return Ok(ScalarType::FixedBytes(1)),
            "uint" => return Ok(ScalarType::Uint(256)),
            "int" => return Ok(ScalarType::Int(256)),
            _ => {}
        }

        if let Some(rest) = s.strip_prefix("uint") {
            return Ok(ScalarType::Uint(parse_int_width(s, rest)?));
        }
        if let Some(rest) = s.strip_prefix("int") {
            return Ok(ScalarType::Int(parse_int_width(s, rest)?));
        }
        if let Some(rest) = s.strip_prefix("bytes") {
            let size = parse_digits(s, rest)?;
            if !(1..=32).contains(&size) {
                return Err(AbiError::parse(s, "bytesN length must be between 1 and 32"));
            }
            return Ok(ScalarType::FixedBytes(size));
        }

        Err(AbiError::parse(s, "unknown type"))
    }

    /// Whether values of this type live in the tail region
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ScalarType::Bytes | ScalarType::String)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::Address => f.write_str("address"),
            ScalarType::Bool => f.write_str("bool"),
            ScalarType::Uint(bits) => write!(f, "uint{}", bits),
            ScalarType::Int(bits) => write!(f, "int{}", bits),
            ScalarType::FixedBytes(size) => write!(f, "bytes{}", size),
            ScalarType::Bytes => f.write_str("bytes"),
            ScalarType::String => f.write_str("string"),
        }
    }
}

fn parse_digits(input: &str, digits: &str) -> Result<usize, AbiError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || digits.starts_with('0') {
        return Err(AbiError::parse(input, "unknown type"));
    }
    digits
        .parse()
        .map_err(|_| AbiError::parse(input, "size out of range"))
}

fn parse_int_width(input: &str, digits: &str) -> Result<usize, AbiError> {
    let bits = parse_digits(input, digits)?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(AbiError::parse(input, "integer width must be a multiple of 8 between 8 and 256"));
    }
    Ok(bits)
}

/// Shape of a [`TypeDescriptor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseKind {
    /// Elementary type
    Scalar(ScalarType),
    /// Tuple with ordered components
    Tuple(Vec<TypeDescriptor>),
    /// Array; `length` is `None` for `T[]`
    Array {
        /// Element type
        element: Box<TypeDescriptor>,
        /// Fixed length, `None` when dynamic
        length: Option<usize>,
    },
}

/// One Solidity type occurrence
///
/// Immutable once built; the same tree is reused for every encode/decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Local parameter name, empty when unbound
    pub name: String,
    /// `Some(_)` for event parameters only
    pub indexed: Option<bool>,
    /// Structure of the type
    pub kind: BaseKind,
    /// Source-level type name carried through from the JSON ABI
    pub internal_type: Option<String>,
}

impl TypeDescriptor {
    /// Unnamed scalar
    pub fn scalar(scalar: ScalarType) -> Self {
        Self::from_kind(BaseKind::Scalar(scalar))
    }

    /// Unnamed tuple
    pub fn tuple(components: Vec<TypeDescriptor>) -> Self {
        Self::from_kind(BaseKind::Tuple(components))
    }

    /// Unnamed array, `length = None` for a dynamic array
    pub fn array(element: TypeDescriptor, length: Option<usize>) -> Self {
        Self::from_kind(BaseKind::Array {
            element: Box::new(element),
            length,
        })
    }

    fn from_kind(kind: BaseKind) -> Self {
        Self {
            name: String::new(),
            indexed: None,
            kind,
            internal_type: None,
        }
    }

    /// Set the parameter name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Mark as an (un)indexed event parameter
    pub fn with_indexed(mut self, indexed: bool) -> Self {
        self.indexed = Some(indexed);
        self
    }

    /// Build from a JSON ABI parameter
    pub fn from_json(json: &JsonParam) -> Result<Self, AbiError> {
        from_json_at(json, 0)
    }

    /// Parse a human-readable type string such as `uint`,
    /// `tuple(address,uint256)[]` or `(address to, uint256 amount)`
    pub fn parse(s: &str) -> Result<Self, AbiError> {
        parse_type_at(s, 0)
    }

    /// Whether this parameter is an indexed event parameter
    pub fn is_indexed(&self) -> bool {
        self.indexed == Some(true)
    }

    /// Canonical type string: `uint` becomes `uint256`, tuples drop names
    pub fn canonical_type(&self) -> String {
        self.format(FormatType::Sighash)
    }

    /// Tuple components, if this is a tuple
    pub fn components(&self) -> Option<&[TypeDescriptor]> {
        match &self.kind {
            BaseKind::Tuple(components) => Some(components),
            _ => None,
        }
    }

    /// Array element, if this is an array
    pub fn array_element(&self) -> Option<&TypeDescriptor> {
        match &self.kind {
            BaseKind::Array { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Whether the encoding goes through an offset into the tail region
    pub fn is_dynamic(&self) -> bool {
        match &self.kind {
            BaseKind::Scalar(scalar) => scalar.is_dynamic(),
            BaseKind::Array { length: None, .. } => true,
            BaseKind::Array {
                element,
                length: Some(_),
            } => element.is_dynamic(),
            BaseKind::Tuple(components) => components.iter().any(TypeDescriptor::is_dynamic),
        }
    }

    /// Bytes occupied in the enclosing head region
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            return 32;
        }
        match &self.kind {
            BaseKind::Array {
                element,
                length: Some(length),
            } => element.head_size().saturating_mul(*length),
            BaseKind::Tuple(components) => components
                .iter()
                .fold(0usize, |acc, c| acc.saturating_add(c.head_size())),
            _ => 32,
        }
    }

    /// Render in the requested format
    pub fn format(&self, format: FormatType) -> String {
        if format == FormatType::Json {
            return serde_json::to_string(&self.to_json()).unwrap_or_default();
        }

        let mut out = String::new();
        self.write_type(format, &mut out);
        if format != FormatType::Sighash {
            if self.is_indexed() {
                out.push_str(" indexed");
            }
            if format == FormatType::Full && !self.name.is_empty() {
                out.push(' ');
                out.push_str(&self.name);
            }
        }
        out
    }

    fn write_type(&self, format: FormatType, out: &mut String) {
        match &self.kind {
            BaseKind::Scalar(scalar) => out.push_str(&scalar.to_string()),
            BaseKind::Tuple(components) => {
                if format != FormatType::Sighash {
                    out.push_str("tuple");
                }
                out.push('(');
                let separator = if format == FormatType::Full { ", " } else { "," };
                let parts: Vec<String> = components.iter().map(|c| c.format(format)).collect();
                out.push_str(&parts.join(separator));
                out.push(')');
            }
            BaseKind::Array { element, length } => {
                element.write_type(format, out);
                match length {
                    Some(length) => out.push_str(&format!("[{}]", length)),
                    None => out.push_str("[]"),
                }
            }
        }
    }

    /// Convert back to the JSON ABI shape
    pub fn to_json(&self) -> JsonParam {
        JsonParam {
            name: Some(self.name.clone()),
            ty: self.json_type(),
            indexed: self.indexed,
            components: self
                .innermost_components()
                .map(|components| components.iter().map(TypeDescriptor::to_json).collect()),
            internal_type: self.internal_type.clone(),
        }
    }

    fn json_type(&self) -> String {
        match &self.kind {
            BaseKind::Scalar(scalar) => scalar.to_string(),
            BaseKind::Tuple(_) => "tuple".to_string(),
            BaseKind::Array { element, length } => match length {
                Some(length) => format!("{}[{}]", element.json_type(), length),
                None => format!("{}[]", element.json_type()),
            },
        }
    }

    fn innermost_components(&self) -> Option<&[TypeDescriptor]> {
        match &self.kind {
            BaseKind::Scalar(_) => None,
            BaseKind::Tuple(components) => Some(components),
            BaseKind::Array { element, .. } => element.innermost_components(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_type())
    }
}

impl FromStr for TypeDescriptor {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse `name(t1,t2,...)` into the name and its parameter types
pub fn parse_signature(signature: &str) -> Result<(String, Vec<TypeDescriptor>), AbiError> {
    let signature = signature.trim();
    let open = signature
        .find('(')
        .ok_or_else(|| AbiError::parse(signature, "missing parameter list"))?;
    if !signature.ends_with(')') {
        return Err(AbiError::parse(signature, "missing closing parenthesis"));
    }
    let name = signature[..open].trim();
    let params = parse_param_list(&signature[open + 1..signature.len() - 1], 0)?;
    Ok((name.to_string(), params))
}

/// Canonical `name(t1,t2)`, the preimage of selectors and event topics
pub fn format_signature(name: &str, params: &[TypeDescriptor]) -> String {
    let types: Vec<String> = params.iter().map(TypeDescriptor::canonical_type).collect();
    format!("{}({})", name, types.join(","))
}

/// Parse a comma-separated list of types, `uint256,(bool,string)[]`
pub fn parse_type_list(list: &str) -> Result<Vec<TypeDescriptor>, AbiError> {
    parse_param_list(list, 0)
}

fn check_depth(input: &str, depth: usize) -> Result<(), AbiError> {
    if depth > MAX_TYPE_DEPTH {
        tracing::debug!(input = %truncate(input), depth, "type nesting limit reached");
        return Err(AbiError::TypeDepthExceeded {
            limit: MAX_TYPE_DEPTH,
        });
    }
    Ok(())
}

fn truncate(s: &str) -> &str {
    match s.char_indices().nth(64) {
        Some((at, _)) => &s[..at],
        None => s,
    }
}

/// Split `T[N]` / `T[]` into `(T, Some(N) | None)`; `Ok(None)` when there is no suffix
fn split_array_suffix(s: &str) -> Result<Option<(&str, Option<usize>)>, AbiError> {
    if !s.ends_with(']') {
        return Ok(None);
    }
    let open = s
        .rfind('[')
        .ok_or_else(|| AbiError::parse(s, "unbalanced array brackets"))?;
    let prefix = &s[..open];
    let body = &s[open + 1..s.len() - 1];
    if prefix.is_empty() {
        return Err(AbiError::parse(s, "array without element type"));
    }
    if body.is_empty() {
        return Ok(Some((prefix, None)));
    }
    if !body.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AbiError::parse(s, "array length must be a decimal number"));
    }
    let length: usize = body
        .parse()
        .map_err(|_| AbiError::parse(s, "array length out of range"))?;
    if length == 0 {
        return Err(AbiError::parse(s, "fixed array length must be positive"));
    }
    Ok(Some((prefix, Some(length))))
}

fn from_json_at(json: &JsonParam, depth: usize) -> Result<TypeDescriptor, AbiError> {
    check_depth(&json.ty, depth)?;

    let name = json.name.clone().unwrap_or_default();
    if !name.is_empty() && !is_identifier(&name) {
        return Err(AbiError::InvalidIdentifier(name));
    }
    let components = json.components.as_deref().unwrap_or_default();

    let kind = if let Some((prefix, length)) = split_array_suffix(&json.ty)? {
        // the element keeps the components so `tuple[]` resolves
        let element = JsonParam {
            ty: prefix.to_string(),
            components: json.components.clone(),
            ..Default::default()
        };
        BaseKind::Array {
            element: Box::new(from_json_at(&element, depth + 1)?),
            length,
        }
    } else if json.ty == "tuple" {
        if components.is_empty() {
            return Err(AbiError::parse(&json.ty, "tuple without components"));
        }
        BaseKind::Tuple(
            components
                .iter()
                .map(|c| from_json_at(c, depth + 1))
                .collect::<Result<_, _>>()?,
        )
    } else if !components.is_empty() {
        return Err(AbiError::parse(&json.ty, "components given for a non-tuple type"));
    } else {
        parse_type_at(&json.ty, depth)?.kind
    };

    Ok(TypeDescriptor {
        name,
        indexed: json.indexed,
        kind,
        internal_type: json.internal_type.clone(),
    })
}

fn parse_type_at(s: &str, depth: usize) -> Result<TypeDescriptor, AbiError> {
    check_depth(s, depth)?;
    let s = s.trim();

    if let Some((prefix, length)) = split_array_suffix(s)? {
        let element = parse_type_at(prefix, depth + 1)?;
        return Ok(TypeDescriptor::array(element, length));
    }

    if s.ends_with(')') {
        let inner = s
            .strip_prefix("tuple(")
            .or_else(|| s.strip_prefix('('))
            .ok_or_else(|| AbiError::parse(s, "unknown type"))?;
        let inner = &inner[..inner.len() - 1];
        let components = parse_param_list(inner, depth + 1)?;
        if components.is_empty() {
            return Err(AbiError::parse(s, "tuple without components"));
        }
        return Ok(TypeDescriptor::tuple(components));
    }

    Ok(TypeDescriptor::scalar(ScalarType::parse(s)?))
}

fn parse_param_list(list: &str, depth: usize) -> Result<Vec<TypeDescriptor>, AbiError> {
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(list, ',')?
        .into_iter()
        .map(|part| parse_param(part, depth))
        .collect()
}

/// `type [indexed] [name]`
fn parse_param(part: &str, depth: usize) -> Result<TypeDescriptor, AbiError> {
    let part = part.trim();
    if part.is_empty() {
        return Err(AbiError::parse(part, "empty parameter"));
    }

    let mut nesting = 0i32;
    let mut type_end = part.len();
    for (i, c) in part.char_indices() {
        match c {
            '(' => nesting += 1,
            ')' => nesting -= 1,
            c if c.is_whitespace() && nesting == 0 => {
                type_end = i;
                break;
            }
            _ => {}
        }
    }

    let mut param = parse_type_at(&part[..type_end], depth)?;
    let mut words = part[type_end..].split_whitespace().peekable();
    if words.peek() == Some(&"indexed") {
        param.indexed = Some(true);
        words.next();
    }
    if let Some(name) = words.next() {
        if !is_identifier(name) {
            return Err(AbiError::InvalidIdentifier(name.to_string()));
        }
        param.name = name.to_string();
    }
    if words.next().is_some() {
        return Err(AbiError::parse(part, "unexpected trailing tokens"));
    }
    Ok(param)
}

fn split_top_level(s: &str, separator: char) -> Result<Vec<&str>, AbiError> {
    let mut parts = Vec::new();
    let mut nesting = 0i32;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => nesting += 1,
            ')' => {
                nesting -= 1;
                if nesting < 0 {
                    return Err(AbiError::parse(s, "unbalanced parentheses"));
                }
            }
            c if c == separator && nesting == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    if nesting != 0 {
        return Err(AbiError::parse(s, "unbalanced parentheses"));
    }
    parts.push(&s[start..]);
    Ok(parts)
}

/// `^[a-zA-Z$_][a-zA-Z0-9$_]*$`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '$' || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '$' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(ty: &str) -> JsonParam {
        JsonParam::new(ty)
    }

    // ==================== Scalars ====================

    #[test]
    fn test_parse_scalars() {
        assert_eq!(ScalarType::parse("address").unwrap(), ScalarType::Address);
        assert_eq!(ScalarType::parse("uint").unwrap(), ScalarType::Uint(256));
        assert_eq!(ScalarType::parse("int").unwrap(), ScalarType::Int(256));
        assert_eq!(ScalarType::parse("uint8").unwrap(), ScalarType::Uint(8));
        assert_eq!(ScalarType::parse("int128").unwrap(), ScalarType::Int(128));
        assert_eq!(ScalarType::parse("bytes32").unwrap(), ScalarType::FixedBytes(32));
        assert_eq!(ScalarType::parse("byte").unwrap(), ScalarType::FixedBytes(1));
        assert_eq!(ScalarType::parse("bytes").unwrap(), ScalarType::Bytes);
        assert_eq!(ScalarType::parse("string").unwrap(), ScalarType::String);
        assert_eq!(ScalarType::parse("bool").unwrap(), ScalarType::Bool);
    }

    #[test]
    fn test_parse_scalar_rejects_bad_widths() {
        for bad in ["uint7", "uint264", "uint0", "int08", "bytes0", "bytes33", "uintx", "fixed128x18", "addr"] {
            assert!(
                matches!(ScalarType::parse(bad), Err(AbiError::FromStringParse { .. })),
                "{bad} should not parse"
            );
        }
    }

    // ==================== Type strings ====================

    #[test]
    fn test_canonical_signature() {
        assert_eq!(TypeDescriptor::parse("uint").unwrap().format(FormatType::Sighash), "uint256");
        assert_eq!(
            TypeDescriptor::parse("tuple(address,uint256)").unwrap().format(FormatType::Sighash),
            "(address,uint256)"
        );
        assert_eq!(
            TypeDescriptor::parse("(address to, uint amount)[2][]").unwrap().canonical_type(),
            "(address,uint256)[2][]"
        );
    }

    #[test]
    fn test_parse_nested_tuple() {
        let ty = TypeDescriptor::parse("(uint256,(bool,string[])[],bytes4)").unwrap();
        let components = ty.components().unwrap();
        assert_eq!(components.len(), 3);
        let inner = components[1].array_element().unwrap();
        assert_eq!(inner.components().unwrap().len(), 2);
        assert!(ty.is_dynamic());
    }

    #[test]
    fn test_parse_array_lengths() {
        let ty = TypeDescriptor::parse("address[3]").unwrap();
        assert!(matches!(ty.kind, BaseKind::Array { length: Some(3), .. }));
        let ty = TypeDescriptor::parse("address[]").unwrap();
        assert!(matches!(ty.kind, BaseKind::Array { length: None, .. }));
    }

    #[test]
    fn test_parse_malformed_types_fail() {
        for bad in ["uint256[", "uint256]", "uint256[x]", "uint256[0]", "[]", "()", "(uint256", "uint256)", "tuple(uint256,)", "uint256[2]x"] {
            assert!(TypeDescriptor::parse(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_parse_depth_limit() {
        let deep = format!("uint256{}", "[]".repeat(MAX_TYPE_DEPTH + 1));
        assert!(matches!(
            TypeDescriptor::parse(&deep),
            Err(AbiError::TypeDepthExceeded { limit: MAX_TYPE_DEPTH })
        ));

        let ok = format!("uint256{}", "[]".repeat(MAX_TYPE_DEPTH));
        assert!(TypeDescriptor::parse(&ok).is_ok());

        let nested = format!("{}uint256{}", "(".repeat(1000), ")".repeat(1000));
        assert!(matches!(
            TypeDescriptor::parse(&nested),
            Err(AbiError::TypeDepthExceeded { .. })
        ));
    }

    #[test]
    fn test_parse_signature() {
        let (name, params) = parse_signature("transfer(address,uint)").unwrap();
        assert_eq!(name, "transfer");
        assert_eq!(params.len(), 2);
        assert_eq!(params[1].canonical_type(), "uint256");

        let (name, params) = parse_signature("ping()").unwrap();
        assert_eq!(name, "ping");
        assert!(params.is_empty());

        assert!(parse_signature("ping").is_err());
    }

    #[test]
    fn test_format_signature_normalizes() {
        let (name, params) = parse_signature("submit((address to, uint)[] orders, byte flag)").unwrap();
        assert_eq!(format_signature(&name, &params), "submit((address,uint256)[],bytes1)");
        assert_eq!(format_signature("", &[]), "()");
    }

    #[test]
    fn test_parse_indexed_and_names() {
        let params = parse_type_list("address indexed from, uint256 value").unwrap();
        assert!(params[0].is_indexed());
        assert_eq!(params[0].name, "from");
        assert!(!params[1].is_indexed());
        assert_eq!(params[1].name, "value");
        assert!(parse_type_list("uint256 9lives").is_err());
        assert!(parse_type_list("uint256 a b").is_err());
    }

    // ==================== JSON ====================

    #[test]
    fn test_from_json_scalar_normalizes() {
        let ty = TypeDescriptor::from_json(&json("uint").named("amount")).unwrap();
        assert_eq!(ty.canonical_type(), "uint256");
        assert_eq!(ty.name, "amount");
    }

    #[test]
    fn test_from_json_tuple_array() {
        let param = JsonParam {
            name: Some("orders".into()),
            ty: "tuple[3]".into(),
            components: Some(vec![json("address").named("maker"), json("uint").named("amount")]),
            ..Default::default()
        };
        let ty = TypeDescriptor::from_json(&param).unwrap();
        assert_eq!(ty.canonical_type(), "(address,uint256)[3]");
        let element = ty.array_element().unwrap();
        assert_eq!(element.components().unwrap()[0].name, "maker");
    }

    #[test]
    fn test_from_json_tuple_without_components_fails() {
        assert!(matches!(
            TypeDescriptor::from_json(&json("tuple")),
            Err(AbiError::FromStringParse { .. })
        ));
    }

    #[test]
    fn test_from_json_components_on_scalar_fails() {
        let param = JsonParam {
            ty: "uint256".into(),
            components: Some(vec![json("bool")]),
            ..Default::default()
        };
        assert!(TypeDescriptor::from_json(&param).is_err());
    }

    #[test]
    fn test_from_json_unknown_scalar_fails() {
        assert!(matches!(
            TypeDescriptor::from_json(&json("uint256[2")),
            Err(AbiError::FromStringParse { .. })
        ));
        assert!(TypeDescriptor::from_json(&json("function")).is_err());
    }

    #[test]
    fn test_from_json_invalid_name() {
        assert!(matches!(
            TypeDescriptor::from_json(&json("bool").named("1st")),
            Err(AbiError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_to_json_roundtrip() {
        let param = JsonParam {
            name: Some("items".into()),
            ty: "tuple[]".into(),
            components: Some(vec![json("address").named("to"), json("uint256").named("value")]),
            ..Default::default()
        };
        let ty = TypeDescriptor::from_json(&param).unwrap();
        let back = ty.to_json();
        assert_eq!(back.ty, "tuple[]");
        assert_eq!(TypeDescriptor::from_json(&back).unwrap(), ty);
    }

    // ==================== Formatting ====================

    #[test]
    fn test_format_full() {
        let ty = TypeDescriptor::parse("(address owner, uint amount)[]")
            .unwrap()
            .named("grants")
            .with_indexed(true);
        assert_eq!(
            ty.format(FormatType::Full),
            "tuple(address owner, uint256 amount)[] indexed grants"
        );
        assert_eq!(ty.format(FormatType::Sighash), "(address,uint256)[]");
    }

    #[test]
    fn test_format_json() {
        let ty = TypeDescriptor::parse("uint8").unwrap().named("decimals");
        assert_eq!(ty.format(FormatType::Json), r#"{"name":"decimals","type":"uint8"}"#);
    }

    // ==================== Layout ====================

    #[test]
    fn test_is_dynamic_and_head_size() {
        let cases = [
            ("uint256", false, 32),
            ("bytes", true, 32),
            ("string[2]", true, 32),
            ("uint256[3]", false, 96),
            ("(bool,uint256[2])", false, 96),
            ("(bool,string)", true, 32),
            ("uint256[]", true, 32),
        ];
        for (ty, dynamic, head) in cases {
            let parsed = TypeDescriptor::parse(ty).unwrap();
            assert_eq!(parsed.is_dynamic(), dynamic, "{ty}");
            assert_eq!(parsed.head_size(), head, "{ty}");
        }
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("transfer"));
        assert!(is_identifier("_x$1"));
        assert!(is_identifier("$"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("a-b"));
    }
}
