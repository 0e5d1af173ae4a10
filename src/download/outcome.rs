//! Per-file download results.
//!
//! ```rust
//! use azdo_harvest::{DownloadOutcome, FileResult, ProjectRef, RepositoryRef, Status};
//!
//! # fn main() -> Result<(), azdo_harvest::Error> {
//! let file = FileResult::new(
//!     "org",
//!     ProjectRef::new("p", "proj"),
//!     RepositoryRef::new("r", "repo"),
//!     "/Dockerfile",
//!     "main",
//!     None,
//! )?;
//! let outcome = DownloadOutcome::failed(file, "404 Not Found");
//!
//! match outcome.status() {
//!     Status::Success => println!("saved to {:?}", outcome.path()),
//!     Status::Fail(msg) => println!("failed: {}", msg),
//!     Status::HashMismatch(details) => println!("integrity check failed: {}", details),
//! }
//! # Ok(())
//! # }
//! ```

use crate::model::FileResult;

use std::path::{Path, PathBuf};

/// Download status enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// The file was written to disk.
    Success,
    /// Fetching or writing failed, with the reason.
    Fail(String),
    /// The content did not have the expected digest; nothing was written.
    HashMismatch(String),
}

/// The result of harvesting one [`FileResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    file: FileResult,
    status: Status,
    path: Option<PathBuf>,
    digest: Option<String>,
}

impl DownloadOutcome {
    /// A file stored at `path` with content digest `digest`.
    pub fn succeeded(file: FileResult, path: PathBuf, digest: String) -> Self {
        Self {
            file,
            status: Status::Success,
            path: Some(path),
            digest: Some(digest),
        }
    }

    /// A file that could not be harvested.
    pub fn failed(file: FileResult, msg: impl std::fmt::Display) -> Self {
        Self {
            file,
            status: Status::Fail(msg.to_string()),
            path: None,
            digest: None,
        }
    }

    /// A file whose fetched content had digest `digest` instead of the expected one.
    pub fn hash_mismatch(file: FileResult, digest: String, msg: impl std::fmt::Display) -> Self {
        Self {
            file,
            status: Status::HashMismatch(msg.to_string()),
            path: None,
            digest: Some(digest),
        }
    }

    /// The file this outcome is about.
    pub fn file(&self) -> &FileResult {
        &self.file
    }

    /// Get a reference to the outcome's status.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Where the file was written, on success.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Hex SHA-256 digest of the fetched content, when it was fetched.
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Whether the file was written.
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Description of what went wrong, unless the download succeeded.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            Status::Success => None,
            Status::Fail(msg) | Status::HashMismatch(msg) => Some(msg),
        }
    }
}
