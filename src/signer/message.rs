//! Personal Message Signing (EIP-191)
//!
//! User operation hashes are signed as a 32-byte personal message:
//! `keccak256("\x19Ethereum Signed Message:\n32" || digest)`.
//! Reference: https://eips.ethereum.org/EIPS/eip-191

use super::curve::{EcdsaCurve, Secp256k1Curve};
use super::keys::PrivateKey;
use super::signature::Signature;
use super::{digest_from_slice, keccak256, SignerError, SignerResult};
use crate::utils::encoding::decode_hex;

/// Personal message prefix for a 32-byte payload
pub const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Hash a 32-byte digest under the personal message convention
pub fn personal_message_hash(digest: &[u8; 32]) -> [u8; 32] {
    let mut data = Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + digest.len());
    data.extend_from_slice(PERSONAL_MESSAGE_PREFIX);
    data.extend_from_slice(digest);
    keccak256(&data)
}

/// Signs 32-byte digests as personal messages
pub struct MessageSigner<C: EcdsaCurve = Secp256k1Curve> {
    curve: C,
}

impl MessageSigner<Secp256k1Curve> {
    pub fn new() -> Self {
        Self::with_curve(Secp256k1Curve::new())
    }
}

impl Default for MessageSigner<Secp256k1Curve> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: EcdsaCurve> MessageSigner<C> {
    pub fn with_curve(curve: C) -> Self {
        Self { curve }
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    /// Sign a 32-byte digest.
    ///
    /// Fails with `InvalidDigestLength` unless `digest` is exactly 32 bytes.
    pub fn sign_digest(&self, digest: &[u8], key: &PrivateKey) -> SignerResult<Signature> {
        let digest = digest_from_slice(digest)?;
        let hash = personal_message_hash(&digest);
        self.curve.sign_prehash(&hash, key)
    }
}

/// Sign a 32-byte digest with the default secp256k1 backend
pub fn sign_digest(digest: &[u8], key: &PrivateKey) -> SignerResult<Signature> {
    MessageSigner::new().sign_digest(digest, key)
}

/// Sign a hex-encoded user operation hash.
///
/// Returns the `0x`-prefixed 65-byte `r || s || v` signature.
pub fn sign_user_op_hash(user_op_hash: &str, key: &PrivateKey) -> SignerResult<String> {
    let digest = decode_hex(user_op_hash).map_err(|e| SignerError::InvalidHex(e.to_string()))?;
    Ok(sign_digest(&digest, key)?.to_hex())
}
