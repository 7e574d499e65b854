//! Commands backed by a JSON ABI file

use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde_json::{json, Value};
use wabi::abi::to_named_json;
use wabi::{DecodedLogEntry, FormatType, Fragment, H256};
use wabi_primitives::hexutil;

use super::{describe, load_interface, parse_args, parse_hex};
use crate::{config::Config, output::Output, CliError};

/// ABI file subcommands
#[derive(Debug, Subcommand)]
pub enum AbiCommand {
    /// List the fragments of an ABI with their selectors and topics
    List {
        /// JSON ABI or compiler artifact
        file: PathBuf,
    },
    /// Encode call data for a function
    Calldata {
        /// JSON ABI or compiler artifact
        file: PathBuf,
        /// Function name, signature or selector
        function: String,
        /// Arguments; arrays and tuples as JSON
        args: Vec<String>,
    },
    /// Decode call data by its selector
    ParseTx {
        /// JSON ABI or compiler artifact
        file: PathBuf,
        /// Call data
        data: String,
    },
    /// Decode an event log
    Log {
        /// JSON ABI or compiler artifact
        file: PathBuf,
        /// Log data
        #[arg(long, default_value = "0x")]
        data: String,
        /// Log topics, in order
        #[arg(long = "topic")]
        topics: Vec<String>,
        /// Event name, signature or topic; required for anonymous events
        #[arg(long)]
        event: Option<String>,
    },
    /// Explain revert data
    Revert {
        /// JSON ABI or compiler artifact
        file: PathBuf,
        /// Revert data
        data: String,
    },
}

impl AbiCommand {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            AbiCommand::List { file } => list(&file, config, json),
            AbiCommand::Calldata {
                file,
                function,
                args,
            } => calldata(&file, &function, &args, config, json),
            AbiCommand::ParseTx { file, data } => parse_tx(&file, &data, config, json),
            AbiCommand::Log {
                file,
                data,
                topics,
                event,
            } => log(&file, &data, &topics, event.as_deref(), config, json),
            AbiCommand::Revert { file, data } => revert(&file, &data, config, json),
        }
    }
}

fn list(file: &Path, config: &Config, json: bool) -> Result<(), CliError> {
    let iface = load_interface(file, config)?;

    let mut entries = Vec::new();
    let mut lines = vec![iface.constructor().format(FormatType::Full)];
    for fragment in iface.functions().chain(iface.errors()) {
        let selector = fragment.selector().map(hexutil::encode).unwrap_or_default();
        lines.push(format!("{}  {}", selector, fragment.format(FormatType::Full)));
        entries.push(entry(fragment, "selector", &selector));
    }
    for event in iface.events() {
        let topic = event.topic().map(|t| t.to_hex()).unwrap_or_default();
        lines.push(format!("{}  {}", topic, event.format(FormatType::Full)));
        entries.push(entry(event, "topic", &topic));
    }

    Output::new(json)
        .field("constructor", &iface.constructor().format(FormatType::Full))
        .field_value("fragments", Value::Array(entries))
        .message(&lines.join("\n"))
        .print();
    Ok(())
}

fn entry(fragment: &Fragment, key: &str, hash: &str) -> Value {
    let mut value = json!({
        "type": fragment.kind_name(),
        "signature": fragment.signature(),
        "format": fragment.format(FormatType::Full),
    });
    if !hash.is_empty() {
        value[key] = Value::String(hash.to_string());
    }
    value
}

fn calldata(
    file: &Path,
    function: &str,
    args: &[String],
    config: &Config,
    json: bool,
) -> Result<(), CliError> {
    let iface = load_interface(file, config)?;
    let function = iface.function(function)?;
    let values = parse_args(&function.inputs, args)?;
    let data = iface.encode_function_data(function, &values)?;

    Output::new(json)
        .field("function", &function.signature())
        .message(&hexutil::encode(&data))
        .field_hex("data", data)
        .print();
    Ok(())
}

fn parse_tx(file: &Path, data: &str, config: &Config, json: bool) -> Result<(), CliError> {
    let iface = load_interface(file, config)?;
    let bytes = parse_hex(data)?;
    let parsed = iface.parse_transaction(&bytes)?;
    let signature = parsed.function.signature();

    Output::new(json)
        .field("function", &signature)
        .field_hex("selector", parsed.selector)
        .field_value("args", to_named_json(&parsed.function.inputs, &parsed.args))
        .message(&format!(
            "{}\n{}",
            signature,
            describe(&parsed.function.inputs, &parsed.args)
        ))
        .print();
    Ok(())
}

fn log(
    file: &Path,
    data: &str,
    topics: &[String],
    event: Option<&str>,
    config: &Config,
    json: bool,
) -> Result<(), CliError> {
    let iface = load_interface(file, config)?;
    let data = parse_hex(data)?;
    let topics = topics
        .iter()
        .map(|t| H256::from_hex(t).map_err(|e| CliError::InvalidHex(format!("{}: {}", t, e))))
        .collect::<Result<Vec<_>, _>>()?;

    let (event, entries) = match event {
        Some(key) => {
            let event = iface.event(key)?;
            let topics = if topics.is_empty() {
                None
            } else {
                Some(&topics[..])
            };
            (event, iface.decode_event_log(event, &data, topics)?)
        }
        None => {
            let parsed = iface.parse_log(&topics, &data)?;
            (parsed.event, parsed.args)
        }
    };

    let mut args = serde_json::Map::new();
    let mut lines = vec![event.signature()];
    for (i, (param, entry)) in event.inputs.iter().zip(&entries).enumerate() {
        let key = if param.name.is_empty() {
            i.to_string()
        } else {
            param.name.clone()
        };
        let shown = match entry {
            DecodedLogEntry::Value(token) => token.to_json_value().to_string(),
            DecodedLogEntry::Indexed(indexed) => match indexed.hash {
                Some(hash) => format!("indexed {}", hash.to_hex()),
                None => "indexed (no topic)".to_string(),
            },
        };
        lines.push(format!("{}: {}", key, shown));
        args.insert(key, entry.to_json_value());
    }

    Output::new(json)
        .field("event", &event.signature())
        .field_value("args", Value::Object(args))
        .message(&lines.join("\n"))
        .print();
    Ok(())
}

fn revert(file: &Path, data: &str, config: &Config, json: bool) -> Result<(), CliError> {
    let iface = load_interface(file, config)?;
    let bytes = parse_hex(data)?;
    let reason = iface.revert_reason(&bytes);

    Output::new(json)
        .field("reason", &reason.to_string())
        .message(&format!("execution reverted: {}", reason))
        .print();
    Ok(())
}
