//! EIP-7702 Authorization Signing
//!
//! An authorization lets an EOA execute as a delegate contract's code.
//! The signed preimage is `keccak256(0x05 || rlp([chain_id, address, nonce]))`
//! and is signed directly: no personal message prefix is applied.
//! Reference: https://eips.ethereum.org/EIPS/eip-7702

use serde::{Deserialize, Serialize};

use super::curve::{EcdsaCurve, Secp256k1Curve};
use super::keys::{addresses_match, parse_address, public_key_to_address, PrivateKey};
use super::signature::Signature;
use super::{keccak256, rlp, SignerError, SignerResult};
use crate::log_debug;
use crate::utils::encoding::{decode_hex_left_padded, encode_hex, encode_hex_minimal};

/// Magic byte prefixed to the encoded tuple before hashing
pub const AUTHORIZATION_MAGIC: u8 = 0x05;

/// An unsigned delegation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthorizationTuple {
    /// Chain ID for replay protection
    pub chain_id: u64,

    /// Contract address to delegate to
    pub address: [u8; 20],

    /// Nonce of the authorizing account
    pub nonce: u64,
}

impl AuthorizationTuple {
    pub fn new(chain_id: u64, address: [u8; 20], nonce: u64) -> Self {
        Self {
            chain_id,
            address,
            nonce,
        }
    }

    /// Build from a hex delegate address
    pub fn from_hex_address(chain_id: u64, address: &str, nonce: u64) -> SignerResult<Self> {
        Ok(Self::new(chain_id, parse_address(address)?, nonce))
    }

    /// `rlp([chain_id, address, nonce])`
    pub fn encode(&self) -> Vec<u8> {
        encode_authorization_tuple(self.chain_id, &self.address, self.nonce)
    }

    /// `keccak256(0x05 || rlp([chain_id, address, nonce]))`
    pub fn signing_hash(&self) -> [u8; 32] {
        authorization_signing_hash(self.chain_id, &self.address, self.nonce)
    }

    pub fn address_hex(&self) -> String {
        encode_hex(&self.address)
    }
}

/// RLP encode an authorization tuple for signing
pub fn encode_authorization_tuple(chain_id: u64, address: &[u8; 20], nonce: u64) -> Vec<u8> {
    rlp::encode_list(&[
        rlp::encode_u64(chain_id),
        rlp::encode_bytes(address),
        rlp::encode_u64(nonce),
    ])
}

/// Get the hash to sign for an authorization
pub fn authorization_signing_hash(chain_id: u64, address: &[u8; 20], nonce: u64) -> [u8; 32] {
    let encoded = encode_authorization_tuple(chain_id, address, nonce);

    let mut data = Vec::with_capacity(1 + encoded.len());
    data.push(AUTHORIZATION_MAGIC);
    data.extend_from_slice(&encoded);

    keccak256(&data)
}

/// A signed authorization. Immutable once created.
///
/// Serializes as `{chainId, address, nonce, v, r, s, yParity}` where `r`
/// and `s` are big-endian hex with leading zero bytes stripped and `v` is
/// the decimal legacy value derived from `yParity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "AuthorizationWire", try_from = "AuthorizationWire")]
pub struct SignedAuthorization {
    tuple: AuthorizationTuple,
    signature: Signature,
}

impl SignedAuthorization {
    pub fn new(tuple: AuthorizationTuple, signature: Signature) -> Self {
        Self { tuple, signature }
    }

    pub fn tuple(&self) -> &AuthorizationTuple {
        &self.tuple
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn chain_id(&self) -> u64 {
        self.tuple.chain_id
    }

    pub fn address(&self) -> &[u8; 20] {
        &self.tuple.address
    }

    pub fn nonce(&self) -> u64 {
        self.tuple.nonce
    }

    pub fn y_parity(&self) -> u8 {
        self.signature.y_parity()
    }

    /// Legacy `v` (27/28), derived from `y_parity`
    pub fn v(&self) -> u8 {
        self.signature.v()
    }

    /// `r` as minimal-width hex
    pub fn r_hex(&self) -> String {
        encode_hex_minimal(self.signature.r())
    }

    /// `s` as minimal-width hex
    pub fn s_hex(&self) -> String {
        encode_hex_minimal(self.signature.s())
    }
}

/// JSON shape exchanged with the builder service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorizationWire {
    chain_id: u64,
    address: String,
    nonce: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    v: Option<String>,
    r: String,
    s: String,
    y_parity: u8,
}

impl From<SignedAuthorization> for AuthorizationWire {
    fn from(auth: SignedAuthorization) -> Self {
        Self {
            chain_id: auth.chain_id(),
            address: auth.tuple.address_hex(),
            nonce: auth.nonce(),
            v: Some(auth.v().to_string()),
            r: auth.r_hex(),
            s: auth.s_hex(),
            y_parity: auth.y_parity(),
        }
    }
}

impl TryFrom<AuthorizationWire> for SignedAuthorization {
    type Error = SignerError;

    // yParity is authoritative; an incoming `v` is not consulted.
    fn try_from(wire: AuthorizationWire) -> Result<Self, Self::Error> {
        let tuple = AuthorizationTuple::from_hex_address(wire.chain_id, &wire.address, wire.nonce)?;
        let r = decode_scalar("r", &wire.r)?;
        let s = decode_scalar("s", &wire.s)?;
        let signature = Signature::new(r, s, wire.y_parity)?;
        Ok(Self::new(tuple, signature))
    }
}

fn decode_scalar(name: &str, value: &str) -> SignerResult<[u8; 32]> {
    decode_hex_left_padded::<32>(value)
        .map_err(|e| SignerError::InvalidHex(format!("{}: {}", name, e)))?
        .ok_or_else(|| SignerError::Encoding(format!("{} exceeds 32 bytes", name)))
}

/// Signs EIP-7702 authorization tuples
pub struct AuthorizationSigner<C: EcdsaCurve = Secp256k1Curve> {
    curve: C,
}

impl AuthorizationSigner<Secp256k1Curve> {
    pub fn new() -> Self {
        Self::with_curve(Secp256k1Curve::new())
    }
}

impl Default for AuthorizationSigner<Secp256k1Curve> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: EcdsaCurve> AuthorizationSigner<C> {
    pub fn with_curve(curve: C) -> Self {
        Self { curve }
    }

    /// Sign the tuple's hash directly with `key`
    pub fn sign(
        &self,
        tuple: AuthorizationTuple,
        key: &PrivateKey,
    ) -> SignerResult<SignedAuthorization> {
        let hash = tuple.signing_hash();
        let signature = self.curve.sign_prehash(&hash, key)?;
        log_debug!(
            "signer",
            "Authorization signed",
            chain_id = tuple.chain_id,
            nonce = tuple.nonce,
            delegate_address = tuple.address_hex()
        );
        Ok(SignedAuthorization::new(tuple, signature))
    }

    /// Recover the address that signed `auth`
    pub fn recover(&self, auth: &SignedAuthorization) -> SignerResult<[u8; 20]> {
        let hash = auth.tuple.signing_hash();
        let public_key = self.curve.recover_prehash(&hash, &auth.signature)?;
        Ok(public_key_to_address(&public_key))
    }
}

/// Sign an authorization delegating to `delegate_address`
///
/// # Arguments
/// * `chain_id` - Chain ID for the authorization
/// * `delegate_address` - Hex address of the contract to delegate to
/// * `nonce` - Nonce of the authorizing account
/// * `key` - Private key of the authorizing account
pub fn sign_authorization(
    chain_id: u64,
    delegate_address: &str,
    nonce: u64,
    key: &PrivateKey,
) -> SignerResult<SignedAuthorization> {
    let tuple = AuthorizationTuple::from_hex_address(chain_id, delegate_address, nonce)?;
    AuthorizationSigner::new().sign(tuple, key)
}

/// Recover the signer address from a signed authorization
pub fn recover_authorization_signer(auth: &SignedAuthorization) -> SignerResult<[u8; 20]> {
    AuthorizationSigner::new().recover(auth)
}

/// Verify an authorization was signed by `expected_signer`
pub fn verify_authorization(
    auth: &SignedAuthorization,
    expected_signer: &str,
) -> SignerResult<bool> {
    let recovered = recover_authorization_signer(auth)?;
    Ok(addresses_match(expected_signer, &recovered))
}
