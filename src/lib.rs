//! azdo-harvest searches an Azure DevOps organization for repositories and
//! files matching a term, then downloads the matched files concurrently under
//! collision-free, content-addressed names.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use azdo_harvest::{Harvester, SearchQuery, Status};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), azdo_harvest::Error> {
//! let harvester = Harvester::new("myorg", std::env::var("AZDO_PAT").unwrap_or_default())?;
//! let results = harvester
//!     .search(&SearchQuery::new("file:Dockerfile").project("myproject").max_results(10))
//!     .await?;
//!
//! for outcome in harvester.download_all(&results.files, "downloads", 5).await? {
//!     if let Status::Fail(msg) = outcome.status() {
//!         eprintln!("{}: {}", outcome.file(), msg);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`model`] - Result model: matched repositories, matched files, result sets
//! - [`api`] - Capability traits and the Azure DevOps REST implementation
//! - [`search`] - The [`Searcher`] aggregating repository and code search
//! - [`download`] - Per-file requests, outcomes, digests and naming
//! - [`downloader`] - The [`Downloader`] worker pool and its builder
//! - [`harvester`] - The [`Harvester`] facade
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`http`] - HTTP client functionality
//! - [`progress`] - Progress bar styling and display management

pub mod api;
pub mod download;
pub mod downloader;
pub mod error;
pub mod harvester;
pub mod http;
pub mod model;
pub mod progress;
pub mod search;

pub use api::{AzureDevOpsClient, CodeSearch, CodeSearchPage, ItemRetrieval, RepositoryCatalog};
pub use download::{DownloadOutcome, DownloadRequest, Status};
pub use downloader::{Downloader, DownloaderBuilder};
pub use error::{Error, Result};
pub use harvester::Harvester;
pub use http::{create_http_client, HttpClientConfig};
pub use model::{FileResult, ProjectRef, RepositoryRef, RepositoryResult, SearchResultSet};
pub use progress::{ProgressBarOpts, StyleOptions};
pub use search::{SearchQuery, Searcher};
