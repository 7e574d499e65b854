//! Signature hashing and standalone encode/decode

use wabi::abi::{format_signature, to_named_json};
use wabi::AbiCoder;
use wabi_primitives::hexutil;

use super::{describe, parse_args, parse_hex, parse_sig};
use crate::{config::Config, output::Output, CliError};

/// Print the 4-byte selector of a function or error signature
pub fn selector(signature: &str, json: bool) -> Result<(), CliError> {
    let (name, params) = parse_sig(signature)?;
    let canonical = format_signature(&name, &params);
    let selector = wabi_crypto::selector(&canonical);

    Output::new(json)
        .field("signature", &canonical)
        .field_hex("selector", selector)
        .message(&hexutil::encode(selector))
        .print();
    Ok(())
}

/// Print the topic hash of an event signature
pub fn topic(signature: &str, json: bool) -> Result<(), CliError> {
    let (name, params) = parse_sig(signature)?;
    let canonical = format_signature(&name, &params);
    let topic = wabi_crypto::keccak256(canonical.as_bytes()).to_hex();

    Output::new(json)
        .field("signature", &canonical)
        .field("topic", &topic)
        .message(&topic)
        .print();
    Ok(())
}

/// Encode arguments for a signature, prefixed with its selector unless
/// the signature has no name or `no_selector` is set
pub fn encode(
    signature: &str,
    args: &[String],
    no_selector: bool,
    config: &Config,
    json: bool,
) -> Result<(), CliError> {
    let (name, params) = parse_sig(signature)?;
    let values = parse_args(&params, args)?;
    let coder = AbiCoder::new(config.coder_config());

    let mut data = Vec::new();
    if !no_selector && !name.is_empty() {
        data.extend_from_slice(&wabi_crypto::selector(&format_signature(&name, &params)));
    }
    data.extend(coder.encode(&params, &values)?);
    tracing::debug!(signature = %signature, bytes = data.len(), "encoded arguments");

    Output::new(json)
        .message(&hexutil::encode(&data))
        .field_hex("data", data)
        .print();
    Ok(())
}

/// Decode data against a signature
///
/// Named signatures expect call data and check its selector; `(t1,t2)`
/// decodes the data as-is.
pub fn decode(signature: &str, data: &str, config: &Config, json: bool) -> Result<(), CliError> {
    let (name, params) = parse_sig(signature)?;
    let bytes = parse_hex(data)?;
    let coder = AbiCoder::new(config.coder_config());

    let payload = if name.is_empty() {
        &bytes[..]
    } else {
        let canonical = format_signature(&name, &params);
        let expected = wabi_crypto::selector(&canonical);
        if bytes.len() < 4 {
            return Err(CliError::InvalidInput(format!(
                "call data for {} must start with a 4-byte selector",
                canonical
            )));
        }
        let (selector, rest) = bytes.split_at(4);
        if selector != expected {
            return Err(CliError::InvalidInput(format!(
                "selector {} does not match {} ({})",
                hexutil::encode(selector),
                canonical,
                hexutil::encode(expected)
            )));
        }
        rest
    };

    let tokens = coder.decode(&params, payload)?;
    Output::new(json)
        .field_value("values", to_named_json(&params, &tokens))
        .message(&describe(&params, &tokens))
        .print();
    Ok(())
}
