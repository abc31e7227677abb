//! RSA-PKCS#1 v1.5 signatures over SHA-256 digests.
//!
//! PKCS#1 v1.5 signing is deterministic: the same key and message always
//! produce the same signature bytes.

use crate::error::{CryptoError, CryptoResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Message signed by [`check_key_pair`].
const KEY_PAIR_PROBE: &[u8] = b"licgen key pair probe";

/// Signs the SHA-256 digest of `message` with `private_key`.
pub fn sign(private_key: &RsaPrivateKey, message: &[u8]) -> CryptoResult<Vec<u8>> {
    let hashed = Sha256::digest(message);
    let signature = private_key
        .sign(Pkcs1v15Sign::new::<Sha256>(), &hashed)
        .map_err(|e| CryptoError::Signing(e.to_string()))?;
    debug!(message_len = message.len(), "signed message");
    Ok(signature)
}

/// Verifies `signature` over the SHA-256 digest of `message`.
///
/// Every failure is reported as [`CryptoError::SignatureMismatch`], whether
/// the key is wrong, the message was altered or the signature is corrupt.
pub fn verify(public_key: &RsaPublicKey, message: &[u8], signature: &[u8]) -> CryptoResult<()> {
    let hashed = Sha256::digest(message);
    public_key
        .verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, signature)
        .map_err(|_| CryptoError::SignatureMismatch)
}

/// Encodes signature bytes as standard padded base64.
#[must_use]
pub fn encode_signature(signature: &[u8]) -> String {
    BASE64.encode(signature)
}

/// Decodes a base64 signature string.
pub fn decode_signature(encoded: &str) -> CryptoResult<Vec<u8>> {
    BASE64
        .decode(encoded)
        .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))
}

/// Confirms that `public_key` verifies what `private_key` signs.
pub fn check_key_pair(private_key: &RsaPrivateKey, public_key: &RsaPublicKey) -> CryptoResult<()> {
    let signature = sign(private_key, KEY_PAIR_PROBE)?;
    verify(public_key, KEY_PAIR_PROBE, &signature)
}
