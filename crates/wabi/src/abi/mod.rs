//! Solidity ABI v2 head/tail coder
//!
//! This module provides:
//! - Type descriptors parsed from JSON ABI parameters or type strings
//! - Encoding of values against those descriptors
//! - Bounds-checked decoding with strict or loose word validation
//!
//! # Example
//!
//! ```rust
//! use wabi::abi::{decode, encode, Token, TypeDescriptor};
//!
//! let types = vec![
//!     TypeDescriptor::parse("uint256").unwrap(),
//!     TypeDescriptor::parse("string").unwrap(),
//! ];
//! let values = vec![Token::uint(1000), Token::string("hello")];
//!
//! let encoded = encode(&types, &values).unwrap();
//! assert_eq!(decode(&types, &encoded).unwrap(), values);
//! ```

mod coder;
mod decode;
mod encode;
mod param;
mod types;
mod value;

pub use coder::{decode, encode, AbiCoder, CoderConfig};
pub use param::{
    format_signature, is_identifier, parse_signature, parse_type_list, BaseKind, FormatType,
    ScalarType, TypeDescriptor, MAX_TYPE_DEPTH,
};
pub use types::{Token, I256};
pub use value::to_named_json;
