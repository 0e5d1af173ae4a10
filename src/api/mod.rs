//! Capabilities the searcher and downloader consume.
//!
//! The platform is reached only through these traits, so both sides can run
//! against [`AzureDevOpsClient`] or any other implementation (in-memory stubs
//! in tests, for instance).
//!
//! - [`azure`] - the Azure DevOps REST implementation
//! - [`wire`] - JSON shapes returned by the REST API and their validation

pub mod azure;
pub mod wire;

pub use azure::{AzureDevOpsClient, AzureDevOpsClientBuilder};

use crate::error::Result;
use crate::model::{FileResult, RepositoryResult};

use async_trait::async_trait;

/// One page of content search results.
#[derive(Debug, Clone, Default)]
pub struct CodeSearchPage {
    /// Matches on this page, in relevance order.
    pub matches: Vec<FileResult>,
    /// Opaque cursor for the next page; `None` once the results are exhausted.
    pub continuation: Option<String>,
}

/// Lists the repositories of an organization or project.
#[async_trait]
pub trait RepositoryCatalog: Send + Sync {
    /// Organization this catalog is bound to.
    fn organization(&self) -> &str;

    /// Whether repositories can be listed without a project.
    fn supports_organization_scope(&self) -> bool {
        false
    }

    /// List repositories in `project`, or in the whole organization when `None`.
    async fn list_repositories(&self, project: Option<&str>) -> Result<Vec<RepositoryResult>>;
}

/// Searches file contents.
#[async_trait]
pub trait CodeSearch: Send + Sync {
    /// Organization this index is bound to.
    fn organization(&self) -> &str;

    /// Whether content can be searched without a project.
    fn supports_organization_scope(&self) -> bool {
        false
    }

    /// Fetch the page of matches for `term` that starts at `continuation`.
    async fn search_code(
        &self,
        project: Option<&str>,
        term: &str,
        continuation: Option<&str>,
    ) -> Result<CodeSearchPage>;
}

/// Retrieves the raw bytes of a matched file.
#[async_trait]
pub trait ItemRetrieval: Send + Sync {
    /// Fetch the content of `file` at the version it describes.
    async fn get_item(&self, file: &FileResult) -> Result<Vec<u8>>;
}
