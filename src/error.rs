//! Unified error types for the UserOp SDK
//!
//! Core modules (`signer`, `poller`) carry their own `thiserror` enums.
//! Everything crossing the client, config or CLI boundary is folded into
//! [`SdkError`] so callers see one serializable shape.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::poller::PollError;
use crate::signer::SignerError;

/// Main error type for client-facing operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl SdkError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, msg)
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }

    pub fn receipt_pending(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ReceiptPending, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }

    /// Category of this error, per the SDK error taxonomy
    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }
}

impl fmt::Display for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for SdkError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    InvalidInput,
    InvalidDigest,
    InvalidSignature,
    InvalidAddress,
    InvalidPrivateKey,

    // Crypto errors
    SigningFailed,
    RecoveryFailed,
    EncodingError,

    // Polling
    ReceiptPending,
    Timeout,
    Cancelled,

    // Network errors
    NetworkError,

    // Parse errors
    ParseError,
    JsonError,
    HexError,

    // Configuration
    ConfigError,

    // Internal
    Internal,
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput
            | Self::InvalidDigest
            | Self::InvalidSignature
            | Self::InvalidAddress
            | Self::InvalidPrivateKey
            | Self::HexError => ErrorCategory::InputValidation,
            Self::SigningFailed | Self::RecoveryFailed | Self::EncodingError => {
                ErrorCategory::Crypto
            }
            Self::ReceiptPending => ErrorCategory::TransientQuery,
            Self::Timeout => ErrorCategory::TimedOut,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::NetworkError | Self::ParseError | Self::JsonError => ErrorCategory::Transport,
            Self::ConfigError => ErrorCategory::Configuration,
            Self::Internal => ErrorCategory::Internal,
        }
    }
}

/// Broad error classes. Input and crypto errors fail fast; transient query
/// errors are retried by the poller; timeouts and cancellation are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    InputValidation,
    Crypto,
    TransientQuery,
    TimedOut,
    Cancelled,
    Transport,
    Configuration,
    Internal,
}

impl ErrorCategory {
    /// Whether an operation failing with this category may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientQuery | Self::Transport)
    }
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

// Conversions from module and library error types

impl From<SignerError> for SdkError {
    fn from(e: SignerError) -> Self {
        let code = match &e {
            SignerError::InvalidDigestLength(_) => ErrorCode::InvalidDigest,
            SignerError::InvalidSignatureLength(_) | SignerError::InvalidRecoveryId(_) => {
                ErrorCode::InvalidSignature
            }
            SignerError::InvalidAddress(_) => ErrorCode::InvalidAddress,
            SignerError::InvalidPrivateKey(_) => ErrorCode::InvalidPrivateKey,
            SignerError::InvalidHex(_) => ErrorCode::HexError,
            SignerError::Encoding(_) => ErrorCode::EncodingError,
            SignerError::Signing(_) => ErrorCode::SigningFailed,
            SignerError::Recovery(_) => ErrorCode::RecoveryFailed,
        };
        SdkError::new(code, e.to_string())
    }
}

impl From<PollError> for SdkError {
    fn from(e: PollError) -> Self {
        let (code, attempts, elapsed) = match &e {
            PollError::TimedOut { attempts, elapsed } => (ErrorCode::Timeout, *attempts, *elapsed),
            PollError::Cancelled { attempts, elapsed } => {
                (ErrorCode::Cancelled, *attempts, *elapsed)
            }
        };
        SdkError::new(code, e.to_string()).with_details(format!(
            "attempts={} elapsed_ms={}",
            attempts,
            elapsed.as_millis()
        ))
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for SdkError {
    fn from(e: hex::FromHexError) -> Self {
        SdkError::new(ErrorCode::HexError, e.to_string())
    }
}

impl From<url::ParseError> for SdkError {
    fn from(e: url::ParseError) -> Self {
        SdkError::new(ErrorCode::ConfigError, format!("Invalid URL: {}", e))
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SdkError::new(ErrorCode::NetworkError, "Request timed out")
        } else if e.is_connect() {
            SdkError::new(ErrorCode::NetworkError, "Connection failed")
        } else if e.is_decode() {
            SdkError::new(ErrorCode::ParseError, e.to_string())
        } else {
            SdkError::new(ErrorCode::NetworkError, e.to_string())
        }
    }
}
