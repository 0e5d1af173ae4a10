//! Parameters of a search.

use crate::error::{Error, Result};

/// Default cap on each result stream.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// What to search for and where.
///
/// ```rust
/// use azdo_harvest::SearchQuery;
///
/// let query = SearchQuery::new("file:Dockerfile")
///     .project("myproject")
///     .repositories(false)
///     .max_results(10);
/// assert!(query.search_files);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Search term, passed to the platform verbatim.
    pub term: String,
    /// Project to scope the search to; organization-wide when `None`.
    pub project: Option<String>,
    /// Search file contents.
    pub search_files: bool,
    /// Search repository names.
    pub search_repos: bool,
    /// Cap applied to each result stream independently.
    pub max_results: usize,
}

impl SearchQuery {
    /// A query for `term` over both streams, organization-wide.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            project: None,
            search_files: true,
            search_repos: true,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Scope the query to `project`.
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Enable or disable the file-content stream.
    pub fn files(mut self, enabled: bool) -> Self {
        self.search_files = enabled;
        self
    }

    /// Enable or disable the repository-name stream.
    pub fn repositories(mut self, enabled: bool) -> Self {
        self.search_repos = enabled;
        self
    }

    /// Cap each result stream at `max_results`.
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Check the query before any request is sent.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.term.trim().is_empty() {
            return Err(Error::InvalidInput("search term must not be empty".into()));
        }
        if self.max_results == 0 {
            return Err(Error::InvalidInput("max_results must be at least 1".into()));
        }
        if !self.search_files && !self.search_repos {
            return Err(Error::UnsupportedScope(
                "at least one of file search or repository search must be enabled".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let q = SearchQuery::new("TODO");
        assert!(q.search_files);
        assert!(q.search_repos);
        assert_eq!(q.max_results, DEFAULT_MAX_RESULTS);
        assert!(q.project.is_none());
        assert!(q.validate().is_ok());
    }

    #[test]
    fn test_rejects_blank_term() {
        assert!(matches!(
            SearchQuery::new("   ").validate(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_zero_cap() {
        assert!(matches!(
            SearchQuery::new("x").max_results(0).validate(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_no_stream() {
        let q = SearchQuery::new("x").files(false).repositories(false);
        assert!(matches!(q.validate(), Err(Error::UnsupportedScope(_))));
    }
}
