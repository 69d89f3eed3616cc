//! Elliptic Curve Capability
//!
//! The signers never touch the curve library directly; they go through
//! [`EcdsaCurve`] so the backend can be swapped or faked.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};

use super::keys::PrivateKey;
use super::signature::Signature;
use super::{SignerError, SignerResult};

/// Key generation, recoverable ECDSA signing and public key recovery
/// over 32-byte prehashed messages.
pub trait EcdsaCurve: Send + Sync {
    /// Generate a fresh private key
    fn generate_key(&self) -> PrivateKey;

    /// Uncompressed public key (65 bytes, `0x04 || x || y`)
    fn public_key(&self, key: &PrivateKey) -> SignerResult<[u8; 65]>;

    /// Sign a 32-byte hash as-is, without any additional hashing
    fn sign_prehash(&self, hash: &[u8; 32], key: &PrivateKey) -> SignerResult<Signature>;

    /// Recover the uncompressed public key that produced `signature` over `hash`
    fn recover_prehash(&self, hash: &[u8; 32], signature: &Signature) -> SignerResult<[u8; 65]>;
}

/// secp256k1 backend (RFC6979 nonces, low-s signatures)
pub struct Secp256k1Curve {
    secp: Secp256k1<All>,
}

impl Secp256k1Curve {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }
}

impl Default for Secp256k1Curve {
    fn default() -> Self {
        Self::new()
    }
}

impl EcdsaCurve for Secp256k1Curve {
    fn generate_key(&self) -> PrivateKey {
        PrivateKey::generate()
    }

    fn public_key(&self, key: &PrivateKey) -> SignerResult<[u8; 65]> {
        let mut secret_key = SecretKey::from_slice(key.as_bytes())
            .map_err(|e| SignerError::InvalidPrivateKey(e.to_string()))?;
        let public_key = PublicKey::from_secret_key(&self.secp, &secret_key);
        secret_key.non_secure_erase();
        Ok(public_key.serialize_uncompressed())
    }

    fn sign_prehash(&self, hash: &[u8; 32], key: &PrivateKey) -> SignerResult<Signature> {
        let mut secret_key = SecretKey::from_slice(key.as_bytes())
            .map_err(|e| SignerError::Signing(e.to_string()))?;

        let msg = Message::from_digest(*hash);
        let sig = self.secp.sign_ecdsa_recoverable(&msg, &secret_key);
        secret_key.non_secure_erase();

        let (recovery_id, sig_bytes) = sig.serialize_compact();
        let y_parity = u8::try_from(recovery_id.to_i32())
            .map_err(|e| SignerError::Signing(e.to_string()))?;

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&sig_bytes[..32]);
        s.copy_from_slice(&sig_bytes[32..]);

        Signature::new(r, s, y_parity)
    }

    fn recover_prehash(&self, hash: &[u8; 32], signature: &Signature) -> SignerResult<[u8; 65]> {
        let msg = Message::from_digest(*hash);

        let rec_id = RecoveryId::from_i32(signature.y_parity() as i32)
            .map_err(|e| SignerError::Recovery(e.to_string()))?;

        let recoverable_sig = RecoverableSignature::from_compact(&signature.to_compact(), rec_id)
            .map_err(|e| SignerError::Recovery(e.to_string()))?;

        let public_key = self
            .secp
            .recover_ecdsa(&msg, &recoverable_sig)
            .map_err(|e| SignerError::Recovery(e.to_string()))?;

        Ok(public_key.serialize_uncompressed())
    }
}
