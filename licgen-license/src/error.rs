//! Error types for license issuance and verification.

use chrono::{DateTime, Utc};
use licgen_crypto::CryptoError;
use thiserror::Error;

use crate::engine::Verdict;

/// Licensing errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Reading or writing a license or key file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Key material could not be decoded.
    #[error("invalid key: {0}")]
    KeyDecode(String),

    /// License record or its embedded signature is structurally invalid.
    #[error("malformed license: {0}")]
    MalformedLicense(String),

    /// Signature does not match the claims under the supplied public key.
    #[error("license signature invalid")]
    SignatureMismatch,

    /// License expiration is in the past.
    #[error("license expired on {expiration}")]
    Expired {
        /// When the license stopped being valid.
        expiration: DateTime<Utc>,
    },

    /// Current platform is not among the licensed platforms.
    #[error("license does not support platform {platform:?}")]
    UnsupportedPlatform {
        /// The rejected platform identifier.
        platform: String,
    },

    /// Issuance failed.
    #[error("signing failed: {0}")]
    Signing(String),
}

impl LicenseError {
    /// Returns the verification verdict this error represents, if any.
    ///
    /// Filesystem, key and issuance failures happen outside a verification
    /// attempt and have no verdict.
    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            Self::MalformedLicense(_) => Some(Verdict::Malformed),
            Self::SignatureMismatch => Some(Verdict::SignatureMismatch),
            Self::Expired { .. } => Some(Verdict::Expired),
            Self::UnsupportedPlatform { .. } => Some(Verdict::UnsupportedPlatform),
            Self::Io(_) | Self::KeyDecode(_) | Self::Signing(_) => None,
        }
    }
}

impl From<CryptoError> for LicenseError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Io(e) => Self::Io(e),
            CryptoError::KeyDecode(msg) => Self::KeyDecode(msg),
            CryptoError::SignatureMismatch => Self::SignatureMismatch,
            CryptoError::InvalidEncoding(msg) => {
                Self::MalformedLicense(format!("invalid signature encoding: {msg}"))
            }
            CryptoError::Signing(msg)
            | CryptoError::KeyGeneration(msg)
            | CryptoError::KeyEncode(msg) => Self::Signing(msg),
        }
    }
}

impl From<serde_json::Error> for LicenseError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedLicense(err.to_string())
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
