//! Builder pattern implementation for creating Downloader instances.
//!
//! ```rust
//! use azdo_harvest::{AzureDevOpsClient, DownloaderBuilder};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), azdo_harvest::Error> {
//! let client = Arc::new(AzureDevOpsClient::builder("myorg", "my-pat").build()?);
//! let downloader = DownloaderBuilder::new(client)
//!     .directory(PathBuf::from("./downloads"))
//!     .concurrency(8)
//!     .on_complete(|outcome| println!("{}: {:?}", outcome.file(), outcome.status()))
//!     .build();
//! # Ok(())
//! # }
//! ```

use super::{config::DownloaderConfig, downloader::Downloader};
use crate::api::ItemRetrieval;
use crate::download::DownloadOutcome;
use crate::StyleOptions;

use std::{path::PathBuf, sync::Arc};
use tokio_util::sync::CancellationToken;

/// A builder used to create a [`Downloader`].
pub struct DownloaderBuilder {
    fetcher: Arc<dyn ItemRetrieval>,
    config: DownloaderConfig,
}

impl std::fmt::Debug for DownloaderBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloaderBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DownloaderBuilder {
    /// Creates a builder with the default options, fetching through `fetcher`.
    pub fn new(fetcher: Arc<dyn ItemRetrieval>) -> Self {
        Self {
            fetcher,
            config: DownloaderConfig::default(),
        }
    }

    /// Convenience function to hide the progress bars.
    pub fn hidden(fetcher: Arc<dyn ItemRetrieval>) -> Self {
        Self::new(fetcher).style_options(StyleOptions::hidden())
    }

    /// Sets the directory where to store the downloads.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.config.directory = directory;
        self
    }

    /// Set the number of concurrent workers.
    ///
    /// Zero is accepted here and rejected when a download starts.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// Set the downloader style options.
    pub fn style_options(mut self, style_options: StyleOptions) -> Self {
        self.config.style_options = style_options;
        self
    }

    /// Rewrite files already present with identical content.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.config.overwrite = overwrite;
        self
    }

    /// Stop claiming new files once `token` is cancelled.
    ///
    /// Files already being fetched are finished; the rest are reported as failed.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.config.cancel = Some(token);
        self
    }

    /// Set callback for when each download completes.
    ///
    /// The callback is called from the worker that finished the file, while
    /// other downloads may still be in progress.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&DownloadOutcome) + Send + Sync + 'static,
    {
        self.config.on_complete = Some(Arc::new(Box::new(callback)));
        self
    }

    /// Create the [`Downloader`] with the specified options.
    pub fn build(self) -> Downloader {
        Downloader::new(self.config, self.fetcher)
    }
}
