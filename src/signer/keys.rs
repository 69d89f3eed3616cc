//! Private keys and address derivation
//!
//! `PrivateKey` owns its 32 bytes and wipes them on drop. Signing calls
//! borrow it for the duration of the call only.

use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::SecretKey;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::curve::{EcdsaCurve, Secp256k1Curve};
use super::{keccak256, SignerError, SignerResult};
use crate::utils::encoding::{decode_hex, strip_hex_prefix};

/// A secp256k1 private key, zeroized on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    bytes: [u8; 32],
}

impl PrivateKey {
    /// Create from raw bytes, rejecting zero and out-of-range scalars
    pub fn from_bytes(mut bytes: [u8; 32]) -> SignerResult<Self> {
        let valid = SecretKey::from_slice(&bytes).map(|mut sk| sk.non_secure_erase());
        if let Err(e) = valid {
            bytes.zeroize();
            return Err(SignerError::InvalidPrivateKey(e.to_string()));
        }
        Ok(Self { bytes })
    }

    /// Create from a byte slice, which must be exactly 32 bytes
    pub fn from_slice(slice: &[u8]) -> SignerResult<Self> {
        let bytes = <[u8; 32]>::try_from(slice).map_err(|_| {
            SignerError::InvalidPrivateKey(format!("Expected 32 bytes, got {}", slice.len()))
        })?;
        Self::from_bytes(bytes)
    }

    /// Parse a hex-encoded key (with or without `0x`)
    pub fn from_hex(value: &str) -> SignerResult<Self> {
        let mut decoded = decode_hex(value)
            .map_err(|e| SignerError::InvalidPrivateKey(format!("Invalid hex: {}", e)))?;
        let key = Self::from_slice(&decoded);
        decoded.zeroize();
        key
    }

    /// Generate a fresh key from the operating system RNG
    pub fn generate() -> Self {
        let mut rng = OsRng;
        loop {
            let mut candidate = [0u8; 32];
            rng.fill_bytes(&mut candidate);
            if let Ok(key) = Self::from_bytes(candidate) {
                candidate.zeroize();
                return key;
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Hex export, for key generation output only
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }

    /// Ethereum address controlled by this key
    pub fn address(&self) -> SignerResult<[u8; 20]> {
        self.address_with(&Secp256k1Curve::new())
    }

    /// Address derivation through an explicit curve backend
    pub fn address_with<C: EcdsaCurve + ?Sized>(&self, curve: &C) -> SignerResult<[u8; 20]> {
        let public_key = curve.public_key(self)?;
        Ok(public_key_to_address(&public_key))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// Derive an address from an uncompressed public key: the low 20 bytes of
/// keccak256 over the 64-byte key body (0x04 prefix excluded).
pub fn public_key_to_address(public_key: &[u8; 65]) -> [u8; 20] {
    let hash = keccak256(&public_key[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Parse a 20-byte hex address (with or without `0x`, any case)
pub fn parse_address(value: &str) -> SignerResult<[u8; 20]> {
    let bytes = decode_hex(value)
        .map_err(|e| SignerError::InvalidAddress(format!("{}: {}", value, e)))?;
    <[u8; 20]>::try_from(bytes.as_slice()).map_err(|_| {
        SignerError::InvalidAddress(format!("Expected 20 bytes, got {}", bytes.len()))
    })
}

/// Case-insensitive comparison of two hex addresses
pub(crate) fn addresses_match(expected: &str, actual: &[u8; 20]) -> bool {
    strip_hex_prefix(expected.trim()).eq_ignore_ascii_case(&hex::encode(actual))
}

/// EIP-55 checksummed representation
pub fn to_checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut result = String::with_capacity(42);
    result.push_str("0x");
    for (i, ch) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

        if ch.is_ascii_digit() || nibble < 8 {
            result.push(ch);
        } else {
            result.push(ch.to_ascii_uppercase());
        }
    }
    result
}
