//! A file to harvest, with an optional expected digest.

use crate::model::FileResult;

/// Represents a file to be downloaded.
///
/// ```rust
/// use azdo_harvest::{DownloadRequest, FileResult, ProjectRef, RepositoryRef};
///
/// # fn main() -> Result<(), azdo_harvest::Error> {
/// let file = FileResult::new(
///     "org",
///     ProjectRef::new("p", "proj"),
///     RepositoryRef::new("r", "repo"),
///     "/Dockerfile",
///     "main",
///     None,
/// )?;
/// let request = DownloadRequest::new(file.clone());
/// assert!(request.expected_digest.is_none());
///
/// let pinned = DownloadRequest::with_digest(
///     file,
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// );
/// assert!(pinned.expected_digest.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// File to fetch.
    pub file: FileResult,
    /// SHA-256 digest the content must have, in hex.
    pub expected_digest: Option<String>,
}

impl DownloadRequest {
    /// Creates a new [`DownloadRequest`] without digest verification.
    pub fn new(file: FileResult) -> Self {
        Self {
            file,
            expected_digest: None,
        }
    }

    /// Creates a new [`DownloadRequest`] that verifies the content digest.
    pub fn with_digest(file: FileResult, digest: impl Into<String>) -> Self {
        Self {
            file,
            expected_digest: Some(digest.into()),
        }
    }
}

impl From<FileResult> for DownloadRequest {
    fn from(file: FileResult) -> Self {
        Self::new(file)
    }
}

impl From<&FileResult> for DownloadRequest {
    fn from(file: &FileResult) -> Self {
        Self::new(file.clone())
    }
}
