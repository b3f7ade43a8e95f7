//! # Catalog Crate
//!
//! The movie record model and the document store capability the search
//! pipeline consumes.
//!
//! ## Main Components
//!
//! - **types**: `Movie`, `SearchQuery`, `RawRecord` and attribute names
//! - **store**: `DocumentStore` / `Paginator` traits, `ScanRequest`, `Page`
//! - **memory**: paged in-memory store, loaded from a catalog file
//! - **dynamodb**: store backed by a DynamoDB table
//! - **scripted**: replayable store for tests
//! - **loader**: catalog file parsing
//! - **error**: error types for stores, decoding and loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{DocumentStore, InMemoryStore, ScanRequest, SearchQuery};
//!
//! let store = InMemoryStore::load_from_file(Path::new("data/movies.json"))?;
//! let mut paginator = store
//!     .open_scan(ScanRequest::movies_by_title(&SearchQuery::new("Alien")))
//!     .await?;
//!
//! while paginator.has_more_pages() {
//!     let movies = paginator.next_page().await?.decode()?;
//!     println!("{} matches on this page", movies.len());
//! }
//! ```

pub mod dynamodb;
pub mod error;
pub mod loader;
pub mod memory;
pub mod scripted;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use dynamodb::{DynamoDbSettings, DynamoDbStore};
pub use error::{CatalogError, DecodeError, StoreError, StoreResult};
pub use memory::{DEFAULT_PAGE_SIZE, InMemoryStore};
pub use scripted::ScriptedStore;
pub use store::{DocumentStore, Page, Paginator, ScanFilter, ScanRequest};
pub use types::{MOVIES_COLLECTION, Movie, RawRecord, SearchQuery};
