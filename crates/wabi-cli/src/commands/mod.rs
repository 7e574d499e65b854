//! Subcommand implementations

pub mod abi;
pub mod codec;

use std::path::Path;

use serde_json::Value;
use wabi::abi::{parse_signature, BaseKind, ScalarType, TypeDescriptor};
use wabi::{AbiCoder, Interface, Token};
use wabi_primitives::hexutil;

use crate::{config::Config, CliError};

/// Decode a `0x` hex argument
pub fn parse_hex(input: &str) -> Result<Vec<u8>, CliError> {
    hexutil::decode(input).map_err(|e| CliError::InvalidHex(format!("{}: {}", input, e)))
}

/// Split a signature such as `function transfer(address to, uint256)` into
/// its name and parameter types
///
/// A leading `function`, `event` or `error` keyword is ignored; the name may
/// be empty, as in `(uint256,string)`.
pub fn parse_sig(input: &str) -> Result<(String, Vec<TypeDescriptor>), CliError> {
    let trimmed = input.trim();
    let body = ["function ", "event ", "error "]
        .iter()
        .find_map(|keyword| trimmed.strip_prefix(keyword))
        .unwrap_or(trimmed);

    let (name, params) = parse_signature(body)?;
    if !name.is_empty() && !wabi::abi::is_identifier(&name) {
        return Err(CliError::InvalidInput(format!("invalid name {:?} in {}", name, input)));
    }
    Ok((name, params))
}

/// Build tokens from command-line arguments
///
/// Scalars other than `bool` are taken verbatim; `bool`, arrays and tuples
/// are read as JSON, e.g. `[1,2]` or `["0xab...",true]`.
pub fn parse_args(params: &[TypeDescriptor], args: &[String]) -> Result<Vec<Token>, CliError> {
    if params.len() != args.len() {
        return Err(CliError::InvalidInput(format!(
            "expected {} arguments, got {}",
            params.len(),
            args.len()
        )));
    }

    params
        .iter()
        .zip(args)
        .map(|(param, raw)| {
            let value = match &param.kind {
                BaseKind::Scalar(ScalarType::Bool) | BaseKind::Array { .. } | BaseKind::Tuple(_) => {
                    serde_json::from_str(raw)?
                }
                BaseKind::Scalar(_) => Value::String(raw.clone()),
            };
            Ok(Token::from_json_value(param, &value)?)
        })
        .collect()
}

/// Load a JSON ABI (plain array or compiler artifact) from a file
pub fn load_interface(path: &Path, config: &Config) -> Result<Interface, CliError> {
    let content = std::fs::read_to_string(path)?;
    let iface = Interface::from_json(&content)?;
    tracing::debug!(
        path = %path.display(),
        functions = iface.functions().count(),
        events = iface.events().count(),
        "loaded ABI"
    );
    Ok(iface.with_coder(AbiCoder::new(config.coder_config())))
}

/// One `type: value` line per token
pub fn describe(params: &[TypeDescriptor], tokens: &[Token]) -> String {
    params
        .iter()
        .zip(tokens)
        .map(|(param, token)| {
            let label = if param.name.is_empty() {
                param.canonical_type()
            } else {
                format!("{} {}", param.canonical_type(), param.name)
            };
            format!("{}: {}", label, token.to_json_value())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wabi::abi::format_signature;

    #[test]
    fn test_parse_sig_strips_keyword() {
        let (name, params) = parse_sig("function transfer(address to, uint amount)").unwrap();
        assert_eq!(name, "transfer");
        assert_eq!(format_signature(&name, &params), "transfer(address,uint256)");
    }

    #[test]
    fn test_parse_sig_anonymous_list() {
        let (name, params) = parse_sig("(uint256,string)").unwrap();
        assert!(name.is_empty());
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_parse_sig_rejects_bad_name() {
        assert!(parse_sig("1bad(uint256)").is_err());
    }

    #[test]
    fn test_parse_args() {
        let (_, params) = parse_sig("f(uint256,bool,string,uint8[])").unwrap();
        let args: Vec<String> = ["42", "true", "hello world", "[1,2]"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let tokens = parse_args(&params, &args).unwrap();
        assert_eq!(tokens[0], Token::uint(42));
        assert_eq!(tokens[1], Token::Bool(true));
        assert_eq!(tokens[2], Token::string("hello world"));
        assert_eq!(tokens[3], Token::Array(vec![Token::uint(1), Token::uint(2)]));
    }

    #[test]
    fn test_parse_args_arity() {
        let (_, params) = parse_sig("f(uint256)").unwrap();
        assert!(matches!(parse_args(&params, &[]), Err(CliError::InvalidInput(_))));
    }
}
