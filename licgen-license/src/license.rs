//! License records and the claims they carry.

use crate::engine::{self, CheckContext, Verdict};
use crate::error::LicenseResult;
use chrono::{DateTime, Utc};
use licgen_crypto::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The signed claims of a license.
///
/// Any change to these fields after signing invalidates the signature; call
/// [`License::sign`] again after editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    /// Licensee name.
    pub name: String,
    /// Platform identifiers the license may run on (`linux`, `darwin`, ...).
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Last instant at which the license is valid.
    pub expiration: DateTime<Utc>,
}

impl LicenseInfo {
    /// Creates claims for `name`, valid until `expiration` on `platforms`.
    pub fn new<I, S>(name: impl Into<String>, expiration: DateTime<Utc>, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            platforms: platforms.into_iter().map(Into::into).collect(),
            expiration,
        }
    }

    /// Sorts and de-duplicates the platform list in place.
    pub fn canonicalize(&mut self) {
        self.platforms.sort();
        self.platforms.dedup();
    }

    /// Returns a copy with a canonical platform list.
    #[must_use]
    pub fn canonicalized(&self) -> Self {
        let mut info = self.clone();
        info.canonicalize();
        info
    }

    /// Returns true if `platform` is one of the licensed platforms.
    #[must_use]
    pub fn supports(&self, platform: &str) -> bool {
        self.platforms.iter().any(|p| p == platform)
    }

    /// Returns true if the license is expired at `now`.
    ///
    /// The expiration instant itself is still valid.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expiration
    }
}

/// A license record as persisted: the claims plus their base64 signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// Signed claims.
    pub info: LicenseInfo,
    /// Base64 RSA-SHA256 signature over the canonical claims.
    pub key: String,
}

impl License {
    /// Issues a license for `info` signed with `private_key`.
    pub fn issue(info: LicenseInfo, private_key: &RsaPrivateKey) -> LicenseResult<Self> {
        engine::issue(info, private_key)
    }

    /// Re-signs the current claims, replacing `key`.
    pub fn sign(&mut self, private_key: &RsaPrivateKey) -> LicenseResult<()> {
        *self = engine::issue(self.info.clone(), private_key)?;
        Ok(())
    }

    /// Re-signs the current claims with the private key stored at `path`.
    pub fn sign_with_key_file(&mut self, path: impl AsRef<Path>) -> LicenseResult<()> {
        let private_key = licgen_crypto::read_private_key_from_file(path)?;
        self.sign(&private_key)
    }

    /// Checks that `key` is a valid signature of the claims.
    pub fn validate_signature(&self, public_key: &RsaPublicKey) -> LicenseResult<()> {
        engine::validate_signature(self, public_key)
    }

    /// Checks the signature against the public key stored at `path`.
    pub fn validate_signature_with_key_file(&self, path: impl AsRef<Path>) -> LicenseResult<()> {
        let public_key = licgen_crypto::read_public_key_from_file(path)?;
        self.validate_signature(&public_key)
    }

    /// Checks expiration and platform without looking at the signature.
    pub fn check_business_rules(&self, ctx: &CheckContext) -> LicenseResult<()> {
        engine::check_business_rules(self, ctx)
    }

    /// Runs the full verification and returns its verdict.
    #[must_use]
    pub fn check(&self, public_key: &RsaPublicKey, ctx: &CheckContext) -> Verdict {
        engine::check_license(self, public_key, ctx)
    }
}
