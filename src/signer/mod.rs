//! Signing Primitives
//!
//! Digest signing and verification for ERC-4337 user operations and
//! EIP-7702 delegation authorizations.
//!
//! The two signing paths differ on purpose:
//! - user operation hashes are signed under the EIP-191 personal message
//!   prefix (`"\x19Ethereum Signed Message:\n32" || digest`)
//! - authorizations are signed directly over `keccak256(0x05 || rlp(tuple))`
//!
//! All curve operations go through the [`EcdsaCurve`] capability; the
//! free functions use the default [`Secp256k1Curve`].

pub mod curve;
pub mod keys;
pub mod signature;
pub mod message;
pub mod verify;
pub mod authorization;
pub(crate) mod rlp;

#[cfg(test)]
mod tests;

pub use curve::{EcdsaCurve, Secp256k1Curve};
pub use keys::{parse_address, public_key_to_address, to_checksum_address, PrivateKey};
pub use signature::Signature;
pub use message::{personal_message_hash, sign_digest, sign_user_op_hash, MessageSigner};
pub use verify::{recover_signer, verify_signature, verify_user_op_signature, SignatureVerifier};
pub use authorization::{
    authorization_signing_hash, encode_authorization_tuple, recover_authorization_signer,
    sign_authorization, verify_authorization, AuthorizationSigner, AuthorizationTuple,
    SignedAuthorization,
};

use crate::error::ErrorCategory;
use tiny_keccak::{Hasher, Keccak};

/// Length of a digest accepted by the signers
pub const DIGEST_LENGTH: usize = 32;

/// Length of a wire signature (`r || s || v`)
pub const SIGNATURE_LENGTH: usize = 65;

/// Error types for signing and verification
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("Invalid digest length: expected 32 bytes, got {0}")]
    InvalidDigestLength(usize),

    #[error("Invalid signature length: expected 65 bytes, got {0}")]
    InvalidSignatureLength(usize),

    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Public key recovery failed: {0}")]
    Recovery(String),
}

impl SignerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDigestLength(_)
            | Self::InvalidSignatureLength(_)
            | Self::InvalidPrivateKey(_)
            | Self::InvalidAddress(_)
            | Self::InvalidHex(_) => ErrorCategory::InputValidation,
            Self::InvalidRecoveryId(_)
            | Self::Encoding(_)
            | Self::Signing(_)
            | Self::Recovery(_) => ErrorCategory::Crypto,
        }
    }
}

pub type SignerResult<T> = Result<T, SignerError>;

/// Compute keccak256
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// Check a caller-supplied digest and copy it into a fixed array
pub(crate) fn digest_from_slice(digest: &[u8]) -> SignerResult<[u8; 32]> {
    <[u8; 32]>::try_from(digest).map_err(|_| SignerError::InvalidDigestLength(digest.len()))
}
