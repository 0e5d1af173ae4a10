//! Single entry point wiring the searcher and the downloader together.

use crate::api::AzureDevOpsClient;
use crate::downloader::{Downloader, DownloaderBuilder};
use crate::download::DownloadOutcome;
use crate::error::Result;
use crate::model::{FileResult, SearchResultSet};
use crate::search::{SearchQuery, Searcher};

use std::path::PathBuf;
use std::sync::Arc;

/// Searches an Azure DevOps organization and harvests the matching files.
///
/// ```rust,no_run
/// use azdo_harvest::{Harvester, SearchQuery};
///
/// # async fn example() -> Result<(), azdo_harvest::Error> {
/// let harvester = Harvester::new("myorg", "my-pat")?;
/// let results = harvester
///     .search(&SearchQuery::new("file:Dockerfile").project("myproject").repositories(false))
///     .await?;
/// let outcomes = harvester.download_all(&results.files, "./downloads", 5).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Harvester {
    client: Arc<AzureDevOpsClient>,
    searcher: Searcher,
}

impl Harvester {
    /// Create a harvester for `organization` with the default endpoints.
    pub fn new(organization: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Ok(Self::with_client(
            AzureDevOpsClient::builder(organization, token).build()?,
        ))
    }

    /// Create a harvester around an already configured client.
    pub fn with_client(client: AzureDevOpsClient) -> Self {
        let client = Arc::new(client);
        Self {
            searcher: Searcher::new(client.clone()),
            client,
        }
    }

    /// Organization being searched.
    pub fn organization(&self) -> &str {
        self.client.organization()
    }

    /// Run a search.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResultSet> {
        self.searcher.search(query).await
    }

    /// A downloader builder fetching through this harvester's client.
    pub fn downloader(&self) -> DownloaderBuilder {
        DownloaderBuilder::new(self.client.clone())
    }

    /// Download `files` into `output_dir` with `concurrency` workers.
    pub async fn download_all(
        &self,
        files: &[FileResult],
        output_dir: impl Into<PathBuf>,
        concurrency: usize,
    ) -> Result<Vec<DownloadOutcome>> {
        let downloader: Downloader = self
            .downloader()
            .directory(output_dir.into())
            .concurrency(concurrency)
            .build();
        downloader.download_all(files).await
    }

    /// Fetch the content of `file` without writing it to disk.
    pub async fn get_file_content(&self, file: &FileResult) -> Result<Vec<u8>> {
        self.downloader().build().get_file_content(file).await
    }
}
