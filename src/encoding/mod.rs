//! Checksummed text encodings: Base58Check, segwit bech32 and CashAddr.
//!
//! These are pure byte/string transforms with no knowledge of keys.

pub mod base58;
pub mod bech32;
pub mod cashaddr;
mod error;
pub mod polymod;

pub use error::EncodingError;
