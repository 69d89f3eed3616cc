//! Recursive Length Prefix encoding
//!
//! Only the subset needed for authorization preimages: unsigned integers,
//! byte strings and flat lists of already-encoded items.

/// Encode an unsigned integer as its minimal big-endian byte string.
///
/// Zero encodes as the empty string (`0x80`).
pub(crate) fn encode_u64(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    encode_bytes(&bytes[start..])
}

/// Encode a byte string
pub(crate) fn encode_bytes(data: &[u8]) -> Vec<u8> {
    if data.len() == 1 && data[0] < 0x80 {
        return data.to_vec();
    }

    let mut encoded = encode_header(0x80, 0xb7, data.len());
    encoded.extend_from_slice(data);
    encoded
}

/// Wrap already-encoded items in a list
pub(crate) fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let content_len = items.iter().map(Vec::len).sum();

    let mut encoded = encode_header(0xc0, 0xf7, content_len);
    encoded.reserve(content_len);
    for item in items {
        encoded.extend_from_slice(item);
    }
    encoded
}

fn encode_header(short_base: u8, long_base: u8, len: usize) -> Vec<u8> {
    if len < 56 {
        vec![short_base + len as u8]
    } else {
        let len_bytes = encode_length(len);
        let mut header = vec![long_base + len_bytes.len() as u8];
        header.extend_from_slice(&len_bytes);
        header
    }
}

fn encode_length(len: usize) -> Vec<u8> {
    let bytes = (len as u64).to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len() - 1);
    bytes[start..].to_vec()
}
