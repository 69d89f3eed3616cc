//! Personal message signature verification
//!
//! Recovers the signer of a personal-message signature and compares it
//! against an expected address.

use super::curve::{EcdsaCurve, Secp256k1Curve};
use super::keys::{addresses_match, public_key_to_address};
use super::message::personal_message_hash;
use super::signature::Signature;
use super::{digest_from_slice, SignerError, SignerResult};
use crate::utils::encoding::decode_hex;

/// Checks personal-message signatures over 32-byte digests
pub struct SignatureVerifier<C: EcdsaCurve = Secp256k1Curve> {
    curve: C,
}

impl SignatureVerifier<Secp256k1Curve> {
    pub fn new() -> Self {
        Self::with_curve(Secp256k1Curve::new())
    }
}

impl Default for SignatureVerifier<Secp256k1Curve> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: EcdsaCurve> SignatureVerifier<C> {
    pub fn with_curve(curve: C) -> Self {
        Self { curve }
    }

    /// Recover the address that signed `digest`
    pub fn recover(&self, digest: &[u8], signature: &[u8]) -> SignerResult<[u8; 20]> {
        let digest = digest_from_slice(digest)?;
        let signature = Signature::from_bytes(signature)?;

        let hash = personal_message_hash(&digest);
        let public_key = self.curve.recover_prehash(&hash, &signature)?;
        Ok(public_key_to_address(&public_key))
    }

    /// Whether `signature` over `digest` was produced by `expected_address`.
    ///
    /// The address comparison ignores hex case and an optional `0x` prefix.
    pub fn verify(
        &self,
        digest: &[u8],
        signature: &[u8],
        expected_address: &str,
    ) -> SignerResult<bool> {
        let recovered = self.recover(digest, signature)?;
        Ok(addresses_match(expected_address, &recovered))
    }
}

/// Recover the signer of a personal-message signature
pub fn recover_signer(digest: &[u8], signature: &[u8]) -> SignerResult<[u8; 20]> {
    SignatureVerifier::new().recover(digest, signature)
}

/// Verify a personal-message signature with the default secp256k1 backend
pub fn verify_signature(
    digest: &[u8],
    signature: &[u8],
    expected_address: &str,
) -> SignerResult<bool> {
    SignatureVerifier::new().verify(digest, signature, expected_address)
}

/// Verify a hex-encoded user operation signature
pub fn verify_user_op_signature(
    user_op_hash: &str,
    signature: &str,
    expected_address: &str,
) -> SignerResult<bool> {
    let digest = decode_hex(user_op_hash).map_err(|e| SignerError::InvalidHex(e.to_string()))?;
    let signature = decode_hex(signature).map_err(|e| SignerError::InvalidHex(e.to_string()))?;
    verify_signature(&digest, &signature, expected_address)
}
