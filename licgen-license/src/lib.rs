//! Signed software licenses for licgen.
//!
//! This module handles:
//! - License records binding a licensee, an expiration and a platform set
//! - Canonical JSON encoding of the signed claims
//! - Issuance with an RSA private key
//! - Offline verification with the matching public key
//!
//! # License File Format
//!
//! ```text
//! {
//!   "info": {
//!     "name": "Acme Corp",
//!     "platforms": ["darwin", "linux"],
//!     "expiration": "2030-01-01T00:00:00Z"
//!   },
//!   "key": "<base64 RSA-SHA256 signature>"
//! }
//! ```
//!
//! The signature covers the compact JSON of `info` with its platform list
//! sorted, never the record as displayed.
//!
//! # Verification Order
//!
//! Signature, then expiration, then platform. A record that fails the
//! signature check is rejected as such whatever its claims say.

mod codec;
mod engine;
mod error;
mod license;
mod store;

pub use codec::{canonical_claims, decode, encode};
pub use engine::{
    check_business_rules, check_license, check_license_streams, current_platform, issue,
    validate_signature, verify_license, CheckContext, Verdict,
};
pub use error::{LicenseError, LicenseResult};
pub use license::{License, LicenseInfo};
pub use store::{read_license, read_license_from_file, save_license_to_file, write_license};
