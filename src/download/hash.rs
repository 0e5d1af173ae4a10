//! Content digests and the output file naming scheme.
//!
//! Files are named after their repository, their file name and the first
//! eight hex characters of the SHA-256 digest of their content:
//!
//! ```rust
//! use azdo_harvest::download::hash::{digest, output_filename};
//!
//! let d = digest(b"FROM nginx:alpine\n");
//! let name = output_filename("docker-test", "Dockerfile", &d);
//! assert_eq!(name, format!("docker-test__Dockerfile__{}", &d[..8]));
//!
//! let name = output_filename("docker-test", "config.json", &d);
//! assert_eq!(name, format!("docker-test__config__{}.json", &d[..8]));
//! ```

use crate::error::{Error, Result};

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

/// Number of digest characters embedded in output file names.
pub const PREFIX_LEN: usize = 8;

/// Lowercase hex SHA-256 digest of `bytes`.
pub fn digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Lowercase hex SHA-256 digest of the file at `path`.
pub fn file_digest(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Output name `{repository}__{stem}__{digest prefix}{.ext}`.
///
/// The extension is whatever follows the last `.` of `filename`; a name
/// without a `.` has no extension.
pub fn output_filename(repository: &str, filename: &str, digest: &str) -> String {
    output_filename_with_len(repository, filename, digest, PREFIX_LEN)
}

/// Same as [`output_filename`] with `len` digest characters.
pub fn output_filename_with_len(repository: &str, filename: &str, digest: &str, len: usize) -> String {
    let prefix = digest.get(..len).unwrap_or(digest);
    match filename.rsplit_once('.') {
        Some((stem, ext)) => format!("{}__{}__{}.{}", repository, stem, prefix, ext),
        None => format!("{}__{}__{}", repository, filename, prefix),
    }
}

/// Whether `value` looks like a hex SHA-256 digest.
pub fn is_sha256_hex(value: &str) -> bool {
    value.len() == 64 && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Check `actual` against an optional `expected` digest.
///
/// Passes when no digest is expected. The comparison ignores case.
pub fn verify_digest(actual: &str, expected: Option<&str>) -> Result<()> {
    let Some(expected) = expected else {
        return Ok(());
    };

    if is_sha256_hex(expected) && expected.eq_ignore_ascii_case(actual) {
        Ok(())
    } else {
        Err(Error::Integrity {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}
