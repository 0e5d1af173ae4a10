//! Search aggregation.
//!
//! - [`query`] - [`SearchQuery`], the parameters of a search
//! - [`searcher`] - [`Searcher`], which runs both result streams and merges them

pub mod query;
pub mod searcher;

pub use query::{SearchQuery, DEFAULT_MAX_RESULTS};
pub use searcher::Searcher;
