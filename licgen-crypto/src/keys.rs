//! RSA key loading from PEM and key-pair generation.
//!
//! Four PEM block types are recognised:
//!
//! | Label             | Encoding | Kind    |
//! |-------------------|----------|---------|
//! | `RSA PRIVATE KEY` | PKCS#1   | private |
//! | `PRIVATE KEY`     | PKCS#8   | private |
//! | `PUBLIC KEY`      | PKIX     | public  |
//! | `RSA PUBLIC KEY`  | PKCS#1   | public  |
//!
//! Generated key pairs are always exported as PKCS#1 private / PKIX public.

use crate::error::{CryptoError, CryptoResult};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;
use zeroize::Zeroizing;

/// PEM label of a PKCS#1 RSA private key.
pub const PKCS1_PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";

/// PEM label of a PKCS#8 private key.
pub const PKCS8_PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";

/// PEM label of a PKIX (SubjectPublicKeyInfo) public key.
pub const PKIX_PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";

/// PEM label of a PKCS#1 RSA public key.
pub const PKCS1_PUBLIC_KEY_LABEL: &str = "RSA PUBLIC KEY";

/// Default modulus size for generated keys.
pub const DEFAULT_RSA_BITS: usize = 2048;

/// Smallest modulus size accepted by [`KeyPair::generate`].
pub const MIN_RSA_BITS: usize = 1024;

/// Largest modulus size accepted by [`KeyPair::generate`].
pub const MAX_RSA_BITS: usize = 4096;

/// Decoded key material, tagged by kind.
pub enum KeyMaterial {
    /// An RSA private key.
    Private(RsaPrivateKey),
    /// An RSA public key.
    Public(RsaPublicKey),
}

impl KeyMaterial {
    /// Decodes the first PEM block found in `pem`.
    ///
    /// Text before the `-----BEGIN` line is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyDecode`] if there is no PEM block, the label
    /// is not one of the supported key types, or the DER body fails to parse.
    pub fn from_pem(pem: &[u8]) -> CryptoResult<Self> {
        let text = std::str::from_utf8(pem)
            .map_err(|_| CryptoError::KeyDecode("key material is not PEM text".to_string()))?;
        let (label, block) = pem_block(text)?;

        match label {
            PKCS1_PRIVATE_KEY_LABEL => RsaPrivateKey::from_pkcs1_pem(block)
                .map(Self::Private)
                .map_err(decode_error),
            PKCS8_PRIVATE_KEY_LABEL => RsaPrivateKey::from_pkcs8_pem(block)
                .map(Self::Private)
                .map_err(decode_error),
            PKIX_PUBLIC_KEY_LABEL => RsaPublicKey::from_public_key_pem(block)
                .map(Self::Public)
                .map_err(decode_error),
            PKCS1_PUBLIC_KEY_LABEL => RsaPublicKey::from_pkcs1_pem(block)
                .map(Self::Public)
                .map_err(decode_error),
            other => Err(CryptoError::KeyDecode(format!(
                "unsupported PEM block type {other:?}"
            ))),
        }
    }

    /// Returns `"private"` or `"public"`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Private(_) => "private",
            Self::Public(_) => "public",
        }
    }

    /// Unwraps a private key, failing if this is public key material.
    pub fn into_private(self) -> CryptoResult<RsaPrivateKey> {
        match self {
            Self::Private(key) => Ok(key),
            Self::Public(_) => Err(CryptoError::KeyDecode(
                "expected a private key, found a public key".to_string(),
            )),
        }
    }

    /// Unwraps a public key, failing if this is private key material.
    pub fn into_public(self) -> CryptoResult<RsaPublicKey> {
        match self {
            Self::Public(key) => Ok(key),
            Self::Private(_) => Err(CryptoError::KeyDecode(
                "expected a public key, found a private key".to_string(),
            )),
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeyMaterial").field(&self.kind()).finish()
    }
}

/// Reads a PEM-encoded RSA private key from `reader`.
pub fn read_private_key<R: Read>(mut reader: R) -> CryptoResult<RsaPrivateKey> {
    let mut pem = Zeroizing::new(Vec::new());
    reader.read_to_end(&mut pem)?;
    KeyMaterial::from_pem(&pem)?.into_private()
}

/// Reads a PEM-encoded RSA public key from `reader`.
pub fn read_public_key<R: Read>(mut reader: R) -> CryptoResult<RsaPublicKey> {
    let mut pem = Vec::new();
    reader.read_to_end(&mut pem)?;
    KeyMaterial::from_pem(&pem)?.into_public()
}

/// Reads a PEM-encoded RSA private key from the file at `path`.
///
/// Filesystem failures surface as [`CryptoError::Io`], malformed content as
/// [`CryptoError::KeyDecode`].
pub fn read_private_key_from_file(path: impl AsRef<Path>) -> CryptoResult<RsaPrivateKey> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading private key");
    read_private_key(File::open(path)?)
}

/// Reads a PEM-encoded RSA public key from the file at `path`.
pub fn read_public_key_from_file(path: impl AsRef<Path>) -> CryptoResult<RsaPublicKey> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading public key");
    read_public_key(File::open(path)?)
}

/// An RSA private key together with its public half.
///
/// Only key generation and self-check flows hold both at once.
#[derive(Clone)]
pub struct KeyPair {
    private: RsaPrivateKey,
    public: RsaPublicKey,
}

impl KeyPair {
    /// Generates a fresh key pair with a modulus of `bits` bits.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyGeneration`] if `bits` is outside
    /// [`MIN_RSA_BITS`]..=[`MAX_RSA_BITS`] or generation fails.
    pub fn generate(bits: usize) -> CryptoResult<Self> {
        if !(MIN_RSA_BITS..=MAX_RSA_BITS).contains(&bits) {
            return Err(CryptoError::KeyGeneration(format!(
                "unsupported key size {bits}, expected {MIN_RSA_BITS}..={MAX_RSA_BITS} bits"
            )));
        }

        debug!(bits, "generating RSA key pair");
        let private = RsaPrivateKey::new(&mut rand::rngs::OsRng, bits)
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
        Ok(Self::from_private(private))
    }

    /// Builds a key pair from an existing private key.
    #[must_use]
    pub fn from_private(private: RsaPrivateKey) -> Self {
        let public = private.to_public_key();
        Self { private, public }
    }

    /// Returns the private key.
    #[must_use]
    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private
    }

    /// Returns the public key.
    #[must_use]
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Exports the private key as a PKCS#1 `RSA PRIVATE KEY` PEM block.
    pub fn private_key_pem(&self) -> CryptoResult<Zeroizing<String>> {
        self.private
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| CryptoError::KeyEncode(e.to_string()))
    }

    /// Exports the public key as a PKIX `PUBLIC KEY` PEM block.
    pub fn public_key_pem(&self) -> CryptoResult<String> {
        self.public
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CryptoError::KeyEncode(e.to_string()))
    }

    /// Writes the public key to `public_path` and the private key to
    /// `private_path`. The private key file is created owner-only on Unix.
    pub fn write_pem_files(
        &self,
        public_path: impl AsRef<Path>,
        private_path: impl AsRef<Path>,
    ) -> CryptoResult<()> {
        let public_path = public_path.as_ref();
        let private_path = private_path.as_ref();

        let private_pem = self.private_key_pem()?;
        let public_pem = self.public_key_pem()?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(private_path)?;
        file.write_all(private_pem.as_bytes())?;
        debug!(path = %private_path.display(), "wrote private key");

        fs::write(public_path, public_pem)?;
        debug!(path = %public_path.display(), "wrote public key");

        Ok(())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private", &"[REDACTED]")
            .field("public", &self.public)
            .finish()
    }
}

fn decode_error(e: impl fmt::Display) -> CryptoError {
    CryptoError::KeyDecode(e.to_string())
}

/// Locates the first PEM block in `text`, returning its label and the block
/// text from the `BEGIN` line through the matching `END` line.
fn pem_block(text: &str) -> CryptoResult<(&str, &str)> {
    const BEGIN: &str = "-----BEGIN ";
    const DASHES: &str = "-----";

    let start = text
        .find(BEGIN)
        .ok_or_else(|| CryptoError::KeyDecode("no PEM block found".to_string()))?;
    let block = &text[start..];

    let label_len = block[BEGIN.len()..]
        .find(DASHES)
        .ok_or_else(|| CryptoError::KeyDecode("unterminated PEM header".to_string()))?;
    let label = &block[BEGIN.len()..BEGIN.len() + label_len];

    let end_line = format!("-----END {label}-----");
    let end = block
        .find(&end_line)
        .ok_or_else(|| CryptoError::KeyDecode(format!("missing END line for {label:?}")))?;

    Ok((label, &block[..end + end_line.len()]))
}
