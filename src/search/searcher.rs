//! Search aggregation over the repository and code search capabilities.
//!
//! ```rust,no_run
//! use azdo_harvest::{AzureDevOpsClient, SearchQuery, Searcher};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), azdo_harvest::Error> {
//! let client = Arc::new(AzureDevOpsClient::builder("myorg", "my-pat").build()?);
//! let searcher = Searcher::new(client);
//! let results = searcher
//!     .search(&SearchQuery::new("file:Dockerfile").project("myproject"))
//!     .await?;
//! println!("{} files", results.files.len());
//! # Ok(())
//! # }
//! ```

use super::query::SearchQuery;
use crate::api::{CodeSearch, RepositoryCatalog};
use crate::error::{Error, Result};
use crate::model::results::FileCollector;
use crate::model::{FileResult, RepositoryResult, SearchResultSet};

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Runs repository-name and file-content searches and merges them into a
/// [`SearchResultSet`].
///
/// A searcher keeps no state between calls and can be reused freely.
#[derive(Clone)]
pub struct Searcher {
    repositories: Arc<dyn RepositoryCatalog>,
    code: Arc<dyn CodeSearch>,
}

impl fmt::Debug for Searcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Searcher")
            .field("organization", &self.code.organization())
            .finish_non_exhaustive()
    }
}

impl Searcher {
    /// Create a searcher backed by a single API implementation.
    pub fn new<A>(api: Arc<A>) -> Self
    where
        A: RepositoryCatalog + CodeSearch + 'static,
    {
        Self {
            repositories: api.clone(),
            code: api,
        }
    }

    /// Create a searcher from separate capability implementations.
    pub fn from_parts(repositories: Arc<dyn RepositoryCatalog>, code: Arc<dyn CodeSearch>) -> Self {
        Self { repositories, code }
    }

    /// Run `query` and return both result streams.
    ///
    /// Any failure aborts the whole call; no partial result set is returned.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResultSet> {
        query.validate()?;
        let project = query.project.as_deref();

        let repositories = async {
            if query.search_repos {
                self.search_repositories(&query.term, project, query.max_results)
                    .await
            } else {
                Ok(Vec::new())
            }
        };
        let files = async {
            if query.search_files {
                self.search_files(&query.term, project, query.max_results)
                    .await
            } else {
                Ok(Vec::new())
            }
        };

        let (repositories, files) = tokio::try_join!(repositories, files)?;

        info!(
            "Search for '{}' found {} repositories and {} files",
            query.term,
            repositories.len(),
            files.len()
        );
        Ok(SearchResultSet {
            repositories,
            files,
        })
    }

    /// Repositories whose name contains `term`, case-insensitively.
    async fn search_repositories(
        &self,
        term: &str,
        project: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<RepositoryResult>> {
        if project.is_none() && !self.repositories.supports_organization_scope() {
            return Err(Error::UnsupportedScope(format!(
                "repository search in '{}' requires a project",
                self.repositories.organization()
            )));
        }

        let listed = self.repositories.list_repositories(project).await?;
        debug!("Listed {} repositories", listed.len());

        let needle = term.to_lowercase();
        let mut seen = HashSet::new();
        Ok(listed
            .into_iter()
            .filter(|repo| repo.name().to_lowercase().contains(&needle))
            .filter(|repo| seen.insert(repo.id().to_string()))
            .take(max_results)
            .collect())
    }

    /// Distinct files matching `term`, one page at a time.
    async fn search_files(
        &self,
        term: &str,
        project: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<FileResult>> {
        if project.is_none() && !self.code.supports_organization_scope() {
            return Err(Error::UnsupportedScope(format!(
                "code search in '{}' requires a project",
                self.code.organization()
            )));
        }

        let mut collector = FileCollector::new(max_results);
        let mut continuation: Option<String> = None;
        let mut page_number: u32 = 1;

        loop {
            let page = self
                .code
                .search_code(project, term, continuation.as_deref())
                .await?;

            let received = page.matches.len();
            let mut kept = 0;
            for file in page.matches {
                if collector.push(file) {
                    kept += 1;
                }
            }
            debug!(
                "Page {} for '{}': {} matches, {} new, {} collected",
                page_number,
                term,
                received,
                kept,
                collector.len()
            );

            if collector.is_full() || received == 0 {
                break;
            }

            match page.continuation {
                Some(next) if continuation.as_deref() == Some(next.as_str()) => {
                    warn!("Continuation token repeated for '{}', stopping", term);
                    break;
                }
                Some(next) => continuation = Some(next),
                None => break,
            }
            page_number += 1;
        }

        Ok(collector.into_files())
    }
}
