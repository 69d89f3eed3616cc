//! Hex Boundary Helpers
//!
//! Digests, signatures and addresses cross the API boundary as
//! `0x`-prefixed lowercase hex strings.

/// Strip an optional `0x`/`0X` prefix
pub fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// Decode hex with or without a `0x` prefix
pub fn decode_hex(value: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(strip_hex_prefix(value.trim()))
}

/// Encode bytes as `0x`-prefixed lowercase hex
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Encode a big-endian integer with its leading zero bytes removed.
///
/// Zero encodes as `"0x"`.
pub fn encode_hex_minimal(bytes: &[u8]) -> String {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    encode_hex(&bytes[start..])
}

/// Decode hex into a fixed-width big-endian array, left-padding short input.
///
/// Returns `None` when the value is wider than `N` bytes.
pub fn decode_hex_left_padded<const N: usize>(
    value: &str,
) -> Result<Option<[u8; N]>, hex::FromHexError> {
    let mut digits = strip_hex_prefix(value.trim()).to_string();
    if digits.len() % 2 == 1 {
        digits.insert(0, '0');
    }
    let bytes = hex::decode(&digits)?;
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let significant = &bytes[start..];
    if significant.len() > N {
        return Ok(None);
    }
    let mut out = [0u8; N];
    out[N - significant.len()..].copy_from_slice(significant);
    Ok(Some(out))
}
