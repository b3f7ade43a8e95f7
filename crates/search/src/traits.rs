//! Core trait for title search.
//!
//! The service depends on `Searcher` rather than on a concrete executor so
//! tests can substitute a stub without standing up a store.

use async_trait::async_trait;
use catalog::Movie;

use crate::error::Result;

/// Finds every movie whose title contains a fragment.
///
/// ## Design Note
/// - `Send + Sync` so a single searcher can serve concurrent requests
/// - Implementations return all matches or an error, never a partial list
#[async_trait]
pub trait Searcher: Send + Sync {
    /// Search for `title` (case-insensitive substring match)
    ///
    /// # Returns
    /// * `Ok(Vec<Movie>)` - every match, in the order the store delivered them
    /// * `Err(SearchError)` - the first failure, tagged with its phase
    async fn execute(&self, title: &str) -> Result<Vec<Movie>>;
}
