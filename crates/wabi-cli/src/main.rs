//! # wabi-cli
//!
//! Command-line front end for the wabi Solidity ABI coder.
//!
//! ## Usage
//!
//! ```bash
//! # Signature hashes
//! wabi selector "transfer(address,uint256)"
//! wabi topic "Transfer(address,address,uint256)"
//!
//! # Standalone coding
//! wabi encode "transfer(address,uint256)" 0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d 1000
//! wabi decode "(uint256,string)" 0x...
//!
//! # Against an ABI file
//! wabi abi list Token.json
//! wabi abi calldata Token.json transfer 0x... 1000
//! wabi abi log Token.json --topic 0xddf2... --topic 0x... --data 0x...
//! wabi abi revert Token.json 0x08c379a0...
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// Solidity ABI toolkit
#[derive(Parser, Debug)]
#[command(name = "wabi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Log filter, overrides the configured level (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Config file path (default: ~/.wabi/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Mask dirty words instead of rejecting them when decoding
    #[arg(long, global = true)]
    loose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the 4-byte selector of a function or error signature
    Selector {
        /// Signature, e.g. "transfer(address,uint256)"
        signature: String,
    },
    /// Print the topic hash of an event signature
    Topic {
        /// Signature, e.g. "Transfer(address,address,uint256)"
        signature: String,
    },
    /// ABI-encode arguments for a signature
    Encode {
        /// Signature; "(t1,t2)" encodes without a selector
        signature: String,
        /// Arguments; arrays and tuples as JSON
        args: Vec<String>,
        /// Omit the 4-byte selector
        #[arg(long)]
        no_selector: bool,
    },
    /// ABI-decode data against a signature
    Decode {
        /// Signature; a named one expects call data with a selector
        signature: String,
        /// Hex data
        data: String,
    },
    /// Work with a JSON ABI file
    #[command(subcommand)]
    Abi(commands::abi::AbiCommand),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set strict decoding
        #[arg(long)]
        set_strict: Option<bool>,
        /// Set the maximum decoding depth
        #[arg(long)]
        set_max_depth: Option<usize>,
        /// Set the default log level
        #[arg(long)]
        set_log_level: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let loaded = Config::try_load(cli.config.as_deref());

    let level = cli.log_level.clone().unwrap_or_else(|| match &loaded {
        Ok(config) => config.log_level.clone(),
        Err(_) => Config::default().log_level,
    });
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring config file, using defaults");
        Config::default()
    });

    let mut effective = config.clone();
    if cli.loose {
        effective.strict = false;
    }
    tracing::debug!(strict = effective.strict, max_depth = effective.max_depth, "configuration loaded");

    let result = match cli.command {
        Commands::Selector { signature } => commands::codec::selector(&signature, cli.json),
        Commands::Topic { signature } => commands::codec::topic(&signature, cli.json),
        Commands::Encode {
            signature,
            args,
            no_selector,
        } => commands::codec::encode(&signature, &args, no_selector, &effective, cli.json),
        Commands::Decode { signature, data } => {
            commands::codec::decode(&signature, &data, &effective, cli.json)
        }
        Commands::Abi(cmd) => cmd.execute(&effective, cli.json),
        Commands::Config {
            show,
            set_strict,
            set_max_depth,
            set_log_level,
        } => handle_config(
            &mut config,
            cli.config.as_deref(),
            show,
            set_strict,
            set_max_depth,
            set_log_level,
            cli.json,
        ),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn handle_config(
    config: &mut Config,
    path: Option<&std::path::Path>,
    show: bool,
    set_strict: Option<bool>,
    set_max_depth: Option<usize>,
    set_log_level: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(strict) = set_strict {
        config.strict = strict;
        modified = true;
    }

    if let Some(max_depth) = set_max_depth {
        if max_depth == 0 {
            return Err(CliError::InvalidInput("max depth must be at least 1".to_string()));
        }
        config.max_depth = max_depth;
        modified = true;
    }

    if let Some(level) = set_log_level {
        EnvFilter::try_new(&level)
            .map_err(|e| CliError::InvalidInput(format!("log level {:?}: {}", level, e)))?;
        config.log_level = level;
        modified = true;
    }

    if modified {
        let saved = config.save(path)?;
        tracing::info!(path = %saved.display(), "configuration saved");
        Output::new(json)
            .field("status", "saved")
            .field("path", &saved.display().to_string())
            .message("Configuration saved")
            .print();
    } else if show {
        Output::new(json)
            .field_value("strict", serde_json::Value::Bool(config.strict))
            .field_u64("max_depth", config.max_depth as u64)
            .field("log_level", &config.log_level)
            .message(&format!(
                "Strict: {}\nMax depth: {}\nLog level: {}",
                config.strict, config.max_depth, config.log_level
            ))
            .print();
    } else {
        Output::new(json)
            .message("Use --show to display config, or --set-strict/--set-max-depth/--set-log-level to modify")
            .print();
    }

    Ok(())
}
