//! Reading and writing license records.

use crate::codec;
use crate::error::LicenseResult;
use crate::license::License;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Reads a license record from `reader`.
pub fn read_license<R: Read>(mut reader: R) -> LicenseResult<License> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    codec::decode(&bytes)
}

/// Reads a license record from the file at `path`.
pub fn read_license_from_file(path: impl AsRef<Path>) -> LicenseResult<License> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading license");
    read_license(File::open(path)?)
}

/// Writes `license` to `writer` in its persisted form.
pub fn write_license<W: Write>(license: &License, mut writer: W) -> LicenseResult<()> {
    writer.write_all(&codec::encode(license)?)?;
    Ok(())
}

/// Writes `license` to the file at `path`, replacing any existing file.
pub fn save_license_to_file(license: &License, path: impl AsRef<Path>) -> LicenseResult<()> {
    let path = path.as_ref();
    fs::write(path, codec::encode(license)?)?;
    debug!(path = %path.display(), "saved license");
    Ok(())
}
