//! Result model shared by the search and download sides.
//!
//! - [`file`] - [`FileResult`] and its retrieval URL/parameters
//! - [`repository`] - [`RepositoryResult`] and the project/repository references
//! - [`results`] - [`SearchResultSet`], the unified output of a search

pub mod file;
pub mod repository;
pub mod results;

pub use file::{FileResult, API_VERSION, DEFAULT_BASE_URL};
pub use repository::{ProjectRef, RepositoryRef, RepositoryResult};
pub use results::SearchResultSet;
