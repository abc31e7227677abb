//! Issuance and verification.
//!
//! Verification always runs in this order and stops at the first failure:
//!
//! 1. signature (`Malformed` / `SignatureMismatch`)
//! 2. expiration (`Expired`)
//! 3. platform (`UnsupportedPlatform`)
//!
//! Business rules are only evaluated for authentic claims, so a tampered
//! record never reveals whether it would have been expired or unsupported.

use crate::codec;
use crate::error::{LicenseError, LicenseResult};
use crate::license::{License, LicenseInfo};
use crate::store;
use chrono::{DateTime, Utc};
use licgen_crypto::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use tracing::{debug, warn};

/// Outcome of a verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Signature authentic, not expired, platform supported.
    Valid,
    /// Record or embedded signature could not be parsed.
    Malformed,
    /// Signature does not match the claims.
    SignatureMismatch,
    /// License expired.
    Expired,
    /// Current platform not licensed.
    UnsupportedPlatform,
}

impl Verdict {
    /// Returns true for [`Verdict::Valid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Valid => "valid",
            Self::Malformed => "malformed",
            Self::SignatureMismatch => "signature mismatch",
            Self::Expired => "expired",
            Self::UnsupportedPlatform => "unsupported platform",
        };
        f.write_str(s)
    }
}

/// Time and platform a license is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckContext {
    /// Instant to evaluate expiration at.
    pub now: DateTime<Utc>,
    /// Platform identifier of the running system.
    pub platform: String,
}

impl CheckContext {
    /// Creates a context for an explicit time and platform.
    pub fn new(now: DateTime<Utc>, platform: impl Into<String>) -> Self {
        Self {
            now,
            platform: platform.into(),
        }
    }

    /// Creates a context for the wall clock and the running platform.
    #[must_use]
    pub fn current() -> Self {
        Self::new(Utc::now(), current_platform())
    }

    /// Replaces the platform.
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }
}

/// Returns the platform identifier of the running system.
///
/// macOS reports as `darwin`; other systems use [`std::env::consts::OS`].
#[must_use]
pub fn current_platform() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        os => os,
    }
}

/// Signs `info` with `private_key`.
///
/// The returned license carries the canonical platform list, so its
/// persisted form shows exactly what was signed.
pub fn issue(mut info: LicenseInfo, private_key: &RsaPrivateKey) -> LicenseResult<License> {
    info.canonicalize();
    let claims = codec::canonical_claims(&info)?;
    let signature = licgen_crypto::sign(private_key, &claims)?;

    debug!(name = %info.name, platforms = ?info.platforms, "issued license");
    Ok(License {
        info,
        key: licgen_crypto::encode_signature(&signature),
    })
}

/// Checks that `license.key` is a signature of `license.info` under
/// `public_key`.
///
/// # Errors
///
/// - [`LicenseError::MalformedLicense`] if `key` is not valid base64
/// - [`LicenseError::SignatureMismatch`] for any cryptographic failure
pub fn validate_signature(license: &License, public_key: &RsaPublicKey) -> LicenseResult<()> {
    let signature = licgen_crypto::decode_signature(&license.key)?;
    let claims = codec::canonical_claims(&license.info)?;
    licgen_crypto::verify(public_key, &claims, &signature)?;
    debug!(name = %license.info.name, "license signature valid");
    Ok(())
}

/// Checks expiration, then platform.
///
/// Does not look at the signature; use [`check_license`] for untrusted input.
pub fn check_business_rules(license: &License, ctx: &CheckContext) -> LicenseResult<()> {
    let info = &license.info;

    if info.is_expired_at(ctx.now) {
        return Err(LicenseError::Expired {
            expiration: info.expiration,
        });
    }

    if !info.supports(&ctx.platform) {
        return Err(LicenseError::UnsupportedPlatform {
            platform: ctx.platform.clone(),
        });
    }

    Ok(())
}

/// Signature check followed by business rules, returning the first failure.
pub fn verify_license(
    license: &License,
    public_key: &RsaPublicKey,
    ctx: &CheckContext,
) -> LicenseResult<()> {
    validate_signature(license, public_key)?;
    check_business_rules(license, ctx)
}

/// Runs the full verification and returns its verdict.
#[must_use]
pub fn check_license(license: &License, public_key: &RsaPublicKey, ctx: &CheckContext) -> Verdict {
    match verify_license(license, public_key, ctx) {
        Ok(()) => Verdict::Valid,
        Err(err) => {
            // verify_license only fails with errors that carry a verdict.
            let verdict = err.verdict().unwrap_or(Verdict::SignatureMismatch);
            warn!(%verdict, "license rejected");
            verdict
        }
    }
}

/// Reads a license and a PEM public key, then verifies the license.
pub fn check_license_streams<L: Read, K: Read>(
    license_reader: L,
    public_key_reader: K,
    ctx: &CheckContext,
) -> LicenseResult<()> {
    let license = store::read_license(license_reader)?;
    let public_key = licgen_crypto::read_public_key(public_key_reader)?;
    verify_license(&license, &public_key, ctx)
}
