//! Download module containing per-file functionality.
//!
//! - [`request`] - [`DownloadRequest`], a file plus an optional expected digest
//! - [`outcome`] - [`DownloadOutcome`] and [`Status`], the per-file results
//! - [`hash`] - SHA-256 digests, verification and output file naming

pub mod hash;
pub mod outcome;
pub mod request;

pub use hash::{digest, output_filename, verify_digest};
pub use outcome::{DownloadOutcome, Status};
pub use request::DownloadRequest;
