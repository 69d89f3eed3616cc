//! Utilities Module
//!
//! Hex boundary helpers and structured logging.

pub mod encoding;
pub mod logging;

pub use encoding::{decode_hex, encode_hex, strip_hex_prefix};
