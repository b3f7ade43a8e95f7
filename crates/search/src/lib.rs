//! Title search over a paginated document store.
//!
//! This crate provides:
//! - The `Searcher` trait the service depends on
//! - `StoreSearcher`, which walks every page of a filtered scan
//! - `SearchError`, tagged with the phase that failed
//!
//! ## Example Usage
//! ```ignore
//! use search::{Searcher, StoreSearcher};
//!
//! let searcher = StoreSearcher::new(Arc::new(store))
//!     .with_page_timeout(Duration::from_secs(5));
//!
//! let movies = searcher.execute("Alien").await?;
//! ```

pub mod error;
pub mod executor;
pub mod traits;

// Re-export main types
pub use error::SearchError;
pub use executor::StoreSearcher;
pub use traits::Searcher;
