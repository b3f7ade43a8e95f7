//! In-memory paged document store.
//!
//! Holds raw records in insertion order and serves scans the way a remote
//! table does: each page covers a fixed number of *scanned* records, and the
//! filter is applied afterwards, so a page may come back empty while more
//! pages remain.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{CatalogError, StoreError, StoreResult};
use crate::loader::load_records;
use crate::store::{DocumentStore, Page, Paginator, ScanFilter, ScanRequest};
use crate::types::{MOVIES_COLLECTION, Movie, RawRecord};

/// Records scanned per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// A single collection of raw records, shared cheaply between scans.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    collection: String,
    records: Arc<Vec<RawRecord>>,
    page_size: usize,
}

impl InMemoryStore {
    /// Create a `Movies` store over already-stored records
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            collection: MOVIES_COLLECTION.to_string(),
            records: Arc::new(records),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn from_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        Self::new(movies.into_iter().map(|m| m.to_record()).collect())
    }

    /// Load a JSON catalog file (see `loader::load_records`)
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let records = load_records(path)?;
        debug!("Loaded {} records from {}", records.len(), path.display());
        Ok(Self::new(records))
    }

    /// Number of records scanned per page (builder pattern, minimum 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Scan one page worth of records starting at `start`.
    ///
    /// Returns the matching records and the start of the next page, or
    /// `None` when this page reached the end of the collection.
    pub fn scan_segment(&self, filter: &ScanFilter, start: usize) -> (Vec<RawRecord>, Option<usize>) {
        scan_segment(&self.records, filter, start, self.page_size)
    }
}

fn scan_segment(
    records: &[RawRecord],
    filter: &ScanFilter,
    start: usize,
    page_size: usize,
) -> (Vec<RawRecord>, Option<usize>) {
    let start = start.min(records.len());
    let end = start.saturating_add(page_size).min(records.len());

    let items = records[start..end]
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect();

    let next = (end < records.len()).then_some(end);
    (items, next)
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn open_scan(&self, request: ScanRequest) -> StoreResult<Box<dyn Paginator>> {
        if request.collection != self.collection {
            return Err(StoreError::UnknownCollection(request.collection));
        }

        Ok(Box::new(MemoryPaginator {
            records: self.records.clone(),
            filter: request.filter,
            page_size: self.page_size,
            cursor: Some(0),
        }))
    }
}

/// Cursor over an `InMemoryStore` scan.
///
/// Like a remote scan, the first page is always available, even for an
/// empty collection.
struct MemoryPaginator {
    records: Arc<Vec<RawRecord>>,
    filter: ScanFilter,
    page_size: usize,
    cursor: Option<usize>,
}

#[async_trait]
impl Paginator for MemoryPaginator {
    fn has_more_pages(&self) -> bool {
        self.cursor.is_some()
    }

    async fn next_page(&mut self) -> StoreResult<Page> {
        let start = self.cursor.take().ok_or(StoreError::Exhausted)?;
        let (items, next) = scan_segment(&self.records, &self.filter, start, self.page_size);

        debug!(
            "Scanned records {}..{} ({} matched)",
            start,
            next.unwrap_or(self.records.len()),
            items.len()
        );

        self.cursor = next;
        Ok(Page::new(items))
    }
}
