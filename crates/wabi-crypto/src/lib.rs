//! # wabi-crypto
//!
//! Keccak-256, the one cryptographic primitive the ABI codec needs: function
//! and error selectors, event topics, and hashes of indexed dynamic values.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod hash;

pub use hash::{keccak256, selector};
