//! Error types for the search executor.

use catalog::{DecodeError, StoreError};
use thiserror::Error;

/// A search failed; the variant names the phase that failed.
///
/// The wrapped cause is kept for logging. Callers of the HTTP surface never
/// see it.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The store could not open the scan
    #[error("error creating paginator: {0}")]
    PaginatorCreation(#[source] StoreError),

    /// A page fetch failed, timed out, or was abandoned
    #[error("error executing paginator: {0}")]
    PaginatorExecution(#[source] StoreError),

    /// A page came back with a record that is not a movie
    #[error("error unmarshaling the scan output items: {0}")]
    Decode(#[source] DecodeError),
}

impl SearchError {
    /// Short name of the failing phase (for structured logs)
    pub fn phase(&self) -> &'static str {
        match self {
            SearchError::PaginatorCreation(_) => "paginator creation",
            SearchError::PaginatorExecution(_) => "paginator execution",
            SearchError::Decode(_) => "decode",
        }
    }
}

/// Convenience type alias for search results
pub type Result<T> = std::result::Result<T, SearchError>;
