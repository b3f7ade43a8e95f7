//! Document store client traits.
//!
//! The search pipeline only needs two capabilities from a store:
//! - open a filtered scan over a collection (`DocumentStore::open_scan`)
//! - walk that scan one page at a time (`Paginator`)
//!
//! Everything else about the store (indexing, storage engine, transport) is
//! the backend's business. `InMemoryStore`, `DynamoDbStore` and
//! `ScriptedStore` implement these traits.

use async_trait::async_trait;

use crate::error::{DecodeError, StoreResult};
use crate::types::{MOVIES_COLLECTION, Movie, RawRecord, SearchQuery, TITLE_TO_SEARCH_ATTRIBUTE};

// =============================================================================
// Scan request
// =============================================================================

/// Server-side filter applied to every scanned record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanFilter {
    /// Keep records whose string `attribute` contains `value` (case-sensitive)
    Contains { attribute: String, value: String },
}

impl ScanFilter {
    /// `contains(TitleToSearch, <query>)`
    pub fn title_contains(query: &SearchQuery) -> Self {
        ScanFilter::Contains {
            attribute: TITLE_TO_SEARCH_ATTRIBUTE.to_string(),
            value: query.as_str().to_string(),
        }
    }

    /// Evaluate the filter against a stored record.
    ///
    /// Missing or non-string attributes never match.
    pub fn matches(&self, record: &RawRecord) -> bool {
        match self {
            ScanFilter::Contains { attribute, value } => record
                .get(attribute)
                .and_then(|v| v.as_str())
                .is_some_and(|stored| stored.contains(value.as_str())),
        }
    }
}

/// Everything a store needs to open a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub collection: String,
    pub filter: ScanFilter,
}

impl ScanRequest {
    /// Scan of the `Movies` collection for titles containing `query`
    pub fn movies_by_title(query: &SearchQuery) -> Self {
        Self {
            collection: MOVIES_COLLECTION.to_string(),
            filter: ScanFilter::title_contains(query),
        }
    }
}

// =============================================================================
// Page
// =============================================================================

/// One round-trip's worth of raw records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<RawRecord>,
}

impl Page {
    pub fn new(items: Vec<RawRecord>) -> Self {
        Self { items }
    }

    /// Decode every record into a `Movie`.
    ///
    /// The first record that fails to decode fails the whole page.
    pub fn decode(self) -> Result<Vec<Movie>, DecodeError> {
        self.items
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                serde_json::from_value(serde_json::Value::Object(record))
                    .map_err(|source| DecodeError { index, source })
            })
            .collect()
    }
}

// =============================================================================
// Traits
// =============================================================================

/// A store that can run filtered, paginated scans.
///
/// `Send + Sync` so one store can back many concurrent invocations.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the name of this backend (for logging)
    fn name(&self) -> &str;

    /// Start a scan. No page is fetched until `Paginator::next_page`.
    async fn open_scan(&self, request: ScanRequest) -> StoreResult<Box<dyn Paginator>>;
}

/// Cursor over the pages of one scan.
///
/// Pages must be requested strictly one after another; `next_page` takes
/// `&mut self` so the borrow checker enforces it.
#[async_trait]
pub trait Paginator: Send {
    /// Whether another `next_page` call will return a page
    fn has_more_pages(&self) -> bool;

    /// Fetch the next page and advance the cursor
    async fn next_page(&mut self) -> StoreResult<Page>;
}
