//! Error handling for the harvester.
//!
//! Search-level errors abort the whole search call, while download-level
//! errors are recorded per file in a [`DownloadOutcome`](crate::DownloadOutcome)
//! and never escape [`Downloader::download_all`](crate::Downloader::download_all).

use reqwest::StatusCode;
use std::io;
use thiserror::Error;

/// Errors that can happen when searching or harvesting files.
#[derive(Error, Debug)]
pub enum Error {
    /// The credential was rejected by the platform (HTTP 401 or 403).
    ///
    /// This is fatal and never retried.
    #[error("Authentication failed ({status}): {message}")]
    Authentication {
        /// The status code returned by the platform.
        status: StatusCode,
        /// Context about the rejected request.
        message: String,
    },

    /// A network failure or an unexpected status during a search call.
    #[error("Search request failed: {0}")]
    SearchTransport(String),

    /// The requested combination of scope filters cannot be served.
    #[error("Unsupported search scope: {0}")]
    UnsupportedScope(String),

    /// A response from the platform did not have the expected shape.
    #[error("Cannot parse {context}: {reason}")]
    Parse {
        /// What was being parsed.
        context: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Retrieving or storing a single file failed.
    #[error("Download failed: {0}")]
    Download(String),

    /// The content digest did not match the expected digest.
    #[error("Digest mismatch: expected {expected}, got {actual}")]
    Integrity {
        /// Digest supplied by the caller.
        expected: String,
        /// Digest computed over the fetched bytes.
        actual: String,
    },

    /// The caller passed an argument the operation cannot work with.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error from an underlying system.
    #[error("Internal error: {0}")]
    Internal(String),

    /// I/O Error.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error from the HTTP middleware stack.
    #[error("HTTP middleware error")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },
}

impl Error {
    /// Build a [`Error::Parse`] from any displayable reason.
    pub(crate) fn parse(context: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::Parse {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the platform rejected the credential.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }
}

/// Result type alias for operations that can fail with an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_display() {
        let e = Error::Authentication {
            status: StatusCode::UNAUTHORIZED,
            message: "listing repositories".into(),
        };
        assert!(e.is_authentication());
        assert_eq!(
            e.to_string(),
            "Authentication failed (401 Unauthorized): listing repositories"
        );
    }

    #[test]
    fn test_integrity_display() {
        let e = Error::Integrity {
            expected: "aa".into(),
            actual: "bb".into(),
        };
        assert!(!e.is_authentication());
        assert_eq!(e.to_string(), "Digest mismatch: expected aa, got bb");
    }

    #[test]
    fn test_parse_helper() {
        let e = Error::parse("code search result", "missing field `path`");
        assert_eq!(
            e.to_string(),
            "Cannot parse code search result: missing field `path`"
        );
    }
}
