//! UserOp SDK
//!
//! Client-side signing and confirmation polling for ERC-4337 user
//! operations and EIP-7702 delegation authorizations.
//!
//! # Architecture
//!
//! This crate provides:
//! - **signer**: personal-message signing of user operation hashes,
//!   signature verification, and EIP-7702 authorization signing
//! - **poller**: bounded, cancellable polling of an injected query
//! - **builder**: async client for the UserOp Builder API
//! - **types** / **constants**: wire types and Kernel deployment addresses
//!
//! # Security
//!
//! Private keys are held in [`PrivateKey`], which is zeroized on drop and
//! never rendered by `Debug` or the logger.
//!
//! # Example
//!
//! ```rust,ignore
//! use userop_sdk::{sign_authorization, KernelVersion, PrivateKey};
//!
//! let key = PrivateKey::from_hex(&std::env::var("PRIVATE_KEY")?)?;
//! let delegate = KernelVersion::V0_3_3.addresses().account_implementation_address;
//! let authorization = sign_authorization(11155111, delegate, 0, &key)?;
//! println!("{}", serde_json::to_string_pretty(&authorization)?);
//! ```

pub mod error;
pub mod signer;
pub mod poller;
pub mod builder;
pub mod config;
pub mod constants;
pub mod types;
pub mod utils;

pub use error::{ErrorCategory, ErrorCode, SdkError, SdkResult};

pub use signer::{
    authorization_signing_hash, encode_authorization_tuple, keccak256, personal_message_hash,
    recover_authorization_signer, recover_signer, sign_authorization, sign_digest,
    sign_user_op_hash, to_checksum_address, verify_authorization, verify_signature,
    verify_user_op_signature, AuthorizationSigner, AuthorizationTuple, EcdsaCurve,
    MessageSigner, PrivateKey, Secp256k1Curve, Signature, SignatureVerifier, SignedAuthorization,
    SignerError, SignerResult,
};

pub use poller::{
    cancellation, poll_until_ready, CancelHandle, CancelSignal, PollConfig, PollError,
    PollOutcome, PollState, ReceiptPoller,
};

pub use builder::UserOpBuilderClient;
pub use config::ClientConfig;
pub use constants::{account_implementation_address, kernel_addresses, KernelAddresses, KernelVersion};
pub use types::{
    BuildUserOpRequest, BuildUserOpResponse, Call, GetUserOpReceiptRequest, Log,
    TransactionReceipt, UserOpReceipt,
};
