//! RSA key material and signatures for licgen.
//!
//! - PEM key loading (PKCS#1 / PKCS#8 private, PKIX / PKCS#1 public)
//! - RSA key-pair generation and PEM export
//! - RSA-PKCS#1 v1.5 signing and verification over SHA-256 digests
//! - Base64 transport encoding for signatures

mod error;
mod keys;
mod signature;

pub use error::{CryptoError, CryptoResult};
pub use keys::{
    read_private_key, read_private_key_from_file, read_public_key, read_public_key_from_file,
    KeyMaterial, KeyPair, DEFAULT_RSA_BITS, MAX_RSA_BITS, MIN_RSA_BITS, PKCS1_PRIVATE_KEY_LABEL,
    PKCS1_PUBLIC_KEY_LABEL, PKCS8_PRIVATE_KEY_LABEL, PKIX_PUBLIC_KEY_LABEL,
};
pub use signature::{check_key_pair, decode_signature, encode_signature, sign, verify};

pub use rsa::{RsaPrivateKey, RsaPublicKey};
