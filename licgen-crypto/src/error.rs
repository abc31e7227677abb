//! Error types for key handling and signatures.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while loading keys, signing or verifying.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Reading or writing key material failed at the filesystem level.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// PEM block missing, of the wrong kind, or its DER body is invalid.
    #[error("key decode failed: {0}")]
    KeyDecode(String),

    /// Producing a signature failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Signature does not match the message under the given public key.
    ///
    /// Wrong key, tampered message and corrupted signature all map here.
    #[error("signature mismatch")]
    SignatureMismatch,

    /// Signature text is not valid base64.
    #[error("invalid signature encoding: {0}")]
    InvalidEncoding(String),

    /// RSA key generation failed or was asked for an unsupported size.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Exporting a key to PEM failed.
    #[error("key encode failed: {0}")]
    KeyEncode(String),
}
