//! Downloader module containing the worker pool, builder pattern, and configuration.
//!
//! - `downloader` - [`Downloader`], which fetches, verifies and stores files
//! - `builder` - [`DownloaderBuilder`] for configuring a downloader
//! - `config` - Configuration structures and callback types
//!
//! ```rust
//! use azdo_harvest::{AzureDevOpsClient, DownloaderBuilder};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), azdo_harvest::Error> {
//! let client = Arc::new(AzureDevOpsClient::builder("myorg", "my-pat").build()?);
//!
//! // A downloader with no visible progress bars
//! let downloader = DownloaderBuilder::hidden(client).concurrency(1).build();
//! assert_eq!(downloader.concurrency(), 1);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod downloader;

pub use builder::DownloaderBuilder;
pub use config::{DownloaderConfig, OutcomeCallback, DEFAULT_CONCURRENCY};
pub use downloader::Downloader;
