//! Recoverable ECDSA signature
//!
//! Only the recovery parity (0/1) is stored. The legacy `v` byte (27/28)
//! used on the wire is derived from it when serializing.

use super::{SignerError, SignerResult, SIGNATURE_LENGTH};
use crate::utils::encoding::{decode_hex, encode_hex};

/// Offset between `v` and `y_parity`
pub const LEGACY_V_OFFSET: u8 = 27;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
    y_parity: u8,
}

impl Signature {
    /// Build from components; `y_parity` must be 0 or 1
    pub fn new(r: [u8; 32], s: [u8; 32], y_parity: u8) -> SignerResult<Self> {
        if y_parity > 1 {
            return Err(SignerError::InvalidRecoveryId(y_parity));
        }
        Ok(Self { r, s, y_parity })
    }

    /// Parse a 65-byte `r || s || v` signature.
    ///
    /// The trailing byte may be in legacy (27/28) or canonical (0/1) form.
    pub fn from_bytes(bytes: &[u8]) -> SignerResult<Self> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(SignerError::InvalidSignatureLength(bytes.len()));
        }

        let v = bytes[64];
        let y_parity = if v >= LEGACY_V_OFFSET { v - LEGACY_V_OFFSET } else { v };

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);

        Self::new(r, s, y_parity).map_err(|_| SignerError::InvalidRecoveryId(v))
    }

    /// Parse a hex-encoded 65-byte signature
    pub fn from_hex(value: &str) -> SignerResult<Self> {
        let bytes = decode_hex(value).map_err(|e| SignerError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Recovery parity (0 or 1)
    pub fn y_parity(&self) -> u8 {
        self.y_parity
    }

    /// Legacy `v` value (27 or 28), derived from the parity
    pub fn v(&self) -> u8 {
        self.y_parity + LEGACY_V_OFFSET
    }

    /// `r || s` without the recovery byte
    pub fn to_compact(&self) -> [u8; 64] {
        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(&self.r);
        compact[32..].copy_from_slice(&self.s);
        compact
    }

    /// Wire form: `r || s || v` with `v` in {27, 28}
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut sig = [0u8; SIGNATURE_LENGTH];
        sig[..64].copy_from_slice(&self.to_compact());
        sig[64] = self.v();
        sig
    }

    pub fn to_hex(&self) -> String {
        encode_hex(&self.to_bytes())
    }
}
