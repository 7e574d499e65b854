//! # wabi
//!
//! Solidity ABI coder.
//!
//! ## Features
//!
//! - **TypeDescriptor**: parsed Solidity types, from JSON ABI or type strings
//! - **Fragment**: validated functions, events, errors and constructors
//! - **AbiCoder**: head/tail encoding and bounds-checked decoding
//! - **Interface**: selectors, topics, call/return data and event logs
//!
//! ## Quick Start
//!
//! ```rust
//! use wabi::{Address, Interface, Token};
//!
//! let abi = r#"[{"type":"function","name":"transfer","inputs":[
//!     {"name":"to","type":"address"},{"name":"amount","type":"uint256"}],
//!     "outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"}]"#;
//! let iface = Interface::from_json(abi).unwrap();
//!
//! let transfer = iface.function("transfer").unwrap();
//! let data = iface
//!     .encode_function_data(transfer, &[Token::Address(Address::ZERO), Token::uint(1000)])
//!     .unwrap();
//! assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
//! ```
//!
//! ## Event Logs
//!
//! ```rust
//! use wabi::{DecodedLogEntry, Interface, Token};
//!
//! let abi = r#"[{"type":"event","name":"testEvent","anonymous":false,"inputs":[
//!     {"name":"a","type":"uint256","indexed":true},
//!     {"name":"b","type":"string","indexed":false}]}]"#;
//! let iface = Interface::from_json(abi).unwrap();
//! let event = iface.event("testEvent").unwrap();
//!
//! let log = iface.encode_event_log(event, &[Token::uint(1), Token::string("hi")]).unwrap();
//!
//! // Without topics the indexed value is unknown
//! let entries = iface.decode_event_log(event, &log.data, None).unwrap();
//! assert!(entries[0].indexed().is_some());
//! assert_eq!(entries[1], DecodedLogEntry::Value(Token::string("hi")));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
mod error;
pub mod fragment;
mod interface;
pub mod json;
mod log;
mod revert;

pub use abi::{AbiCoder, CoderConfig, FormatType, Token, TypeDescriptor, I256};
pub use error::AbiError;
pub use fragment::{verified_state, Fragment, FragmentKind, MutabilityState, StateMutability};
pub use interface::{Interface, ParsedError, ParsedTransaction};
pub use log::{DecodedLogEntry, Indexed, ParsedLog, RawLog};
pub use revert::{RevertReason, ERROR_SELECTOR, PANIC_SELECTOR};

// Re-export primitives for convenience
pub use wabi_primitives::{Address, H256, U256};
