//! Configuration structures and defaults for the downloader.
//!
//! ```rust
//! use azdo_harvest::downloader::OutcomeCallback;
//! use azdo_harvest::Status;
//!
//! let callback: OutcomeCallback = Box::new(|outcome| match outcome.status() {
//!     Status::Success => println!("✓ {}", outcome.file()),
//!     Status::Fail(msg) => println!("✗ {} - {}", outcome.file(), msg),
//!     Status::HashMismatch(details) => println!("⚠ {} - {}", outcome.file(), details),
//! });
//! ```

use crate::download::DownloadOutcome;
use crate::StyleOptions;

use std::env::current_dir;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Number of workers used when none is configured.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Callback type for download completion events
pub type OutcomeCallback = Box<dyn Fn(&DownloadOutcome) + Send + Sync>;

/// Configuration structure for the downloader
#[derive(Clone)]
pub struct DownloaderConfig {
    /// Directory where to store the downloaded files.
    pub directory: PathBuf,
    /// Number of workers fetching files at the same time.
    pub concurrency: usize,
    /// Downloader style options.
    pub style_options: StyleOptions,
    /// Rewrite files that are already present with the same content.
    pub overwrite: bool,
    /// Callback for when each download completes.
    pub on_complete: Option<Arc<OutcomeCallback>>,
    /// Stops workers from claiming new files once cancelled.
    pub cancel: Option<CancellationToken>,
}

impl std::fmt::Debug for DownloaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloaderConfig")
            .field("directory", &self.directory)
            .field("concurrency", &self.concurrency)
            .field("style_options", &self.style_options)
            .field("overwrite", &self.overwrite)
            .field("on_complete", &self.on_complete.is_some())
            .field("cancel", &self.cancel.is_some())
            .finish()
    }
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            directory: current_dir().unwrap_or_default(),
            concurrency: DEFAULT_CONCURRENCY,
            style_options: StyleOptions::default(),
            overwrite: false,
            on_complete: None,
            cancel: None,
        }
    }
}
