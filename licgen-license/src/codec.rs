//! JSON encoding of license records and their claims.
//!
//! Two encodings exist:
//!
//! - **Record**: the whole [`License`] as indented JSON, for files and display.
//! - **Claims**: the [`LicenseInfo`] alone as compact JSON with a sorted,
//!   de-duplicated platform list. This is the signing input; it never
//!   includes the `key` field.

use crate::error::LicenseResult;
use crate::license::{License, LicenseInfo};

/// Returns the canonical signing bytes for `info`.
///
/// Field order is `name`, `platforms`, `expiration`. Equal claims produce
/// equal bytes regardless of the order platforms were supplied in.
pub fn canonical_claims(info: &LicenseInfo) -> LicenseResult<Vec<u8>> {
    Ok(serde_json::to_vec(&info.canonicalized())?)
}

/// Encodes a license record as two-space indented JSON.
pub fn encode(license: &License) -> LicenseResult<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(license)?)
}

/// Decodes a license record.
///
/// # Errors
///
/// Returns [`LicenseError::MalformedLicense`](crate::LicenseError::MalformedLicense)
/// for invalid, truncated or incomplete JSON.
pub fn decode(bytes: &[u8]) -> LicenseResult<License> {
    Ok(serde_json::from_slice(bytes)?)
}
