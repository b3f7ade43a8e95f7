//! The StoreSearcher drives a paginated scan to completion.
//!
//! ## Algorithm
//! 1. Lowercase the title and build `contains(TitleToSearch, <title>)` on `Movies`
//! 2. Open a scan on the document store
//! 3. While the paginator has more pages:
//!    a. Fetch the next page (optionally under a deadline)
//!    b. Decode every record into a `Movie`
//!    c. Append to the result in page order
//! 4. Return the accumulated movies
//!
//! Any failure aborts the whole search and the movies collected so far are
//! dropped. There are no retries at this layer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use catalog::{DocumentStore, Movie, Page, Paginator, ScanRequest, SearchQuery, StoreError, StoreResult};
use tracing::debug;

use crate::error::{Result, SearchError};
use crate::traits::Searcher;

/// `Searcher` backed by any `DocumentStore`
#[derive(Clone)]
pub struct StoreSearcher {
    store: Arc<dyn DocumentStore>,
    page_timeout: Option<Duration>,
}

impl StoreSearcher {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            page_timeout: None,
        }
    }

    /// Abandon any page fetch that takes longer than `timeout` (builder pattern)
    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = Some(timeout);
        self
    }

    /// The scan request sent to the store for `title`
    pub fn scan_request(title: &str) -> ScanRequest {
        ScanRequest::movies_by_title(&SearchQuery::new(title))
    }

    async fn fetch_page(&self, paginator: &mut dyn Paginator) -> StoreResult<Page> {
        match self.page_timeout {
            Some(timeout) => tokio::time::timeout(timeout, paginator.next_page())
                .await
                .map_err(|_| StoreError::Timeout(timeout))?,
            None => paginator.next_page().await,
        }
    }
}

#[async_trait]
impl Searcher for StoreSearcher {
    async fn execute(&self, title: &str) -> Result<Vec<Movie>> {
        let start_time = Instant::now();
        let request = Self::scan_request(title);

        let mut paginator = self
            .store
            .open_scan(request)
            .await
            .map_err(SearchError::PaginatorCreation)?;

        let mut result = Vec::new();
        let mut pages = 0usize;

        while paginator.has_more_pages() {
            let page = self
                .fetch_page(paginator.as_mut())
                .await
                .map_err(SearchError::PaginatorExecution)?;
            pages += 1;

            let movies = page.decode().map_err(SearchError::Decode)?;
            debug!("Page {} decoded {} movies", pages, movies.len());

            result.extend(movies);
        }

        debug!(
            "Search on {} finished: {} movies across {} pages in {:.2?}",
            self.store.name(),
            result.len(),
            pages,
            start_time.elapsed()
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{InMemoryStore, RawRecord, ScanFilter, ScriptedStore};
    use serde_json::json;

    fn searcher_for(store: &ScriptedStore) -> StoreSearcher {
        StoreSearcher::new(Arc::new(store.clone()))
    }

    // ============================================================================
    // Scan request
    // ============================================================================

    #[tokio::test]
    async fn test_execute_uses_the_expected_scan_request() {
        let store = ScriptedStore::new();
        let searcher = searcher_for(&store);

        let result = searcher.execute("TitleToSearch").await.unwrap();

        assert!(result.is_empty());
        assert_eq!(
            store.requests(),
            vec![ScanRequest {
                collection: "Movies".to_string(),
                filter: ScanFilter::Contains {
                    attribute: "TitleToSearch".to_string(),
                    value: "titletosearch".to_string(),
                },
            }]
        );
        assert_eq!(store.page_fetches(), 0, "No pages means no fetches");
    }

    // ============================================================================
    // Failures
    // ============================================================================

    #[tokio::test]
    async fn test_execute_fails_when_the_paginator_cannot_be_created() {
        let store = ScriptedStore::failing_open("some error");
        let searcher = searcher_for(&store);

        let err = searcher.execute("TitleToSearch").await.unwrap_err();

        assert_eq!(err.to_string(), "error creating paginator: some error");
        assert_eq!(err.phase(), "paginator creation");
        assert_eq!(store.page_fetches(), 0, "No page fetch after a failed open");
    }

    #[tokio::test]
    async fn test_execute_fails_when_next_page_fails() {
        let store = ScriptedStore::new().with_page_error("some error");
        let searcher = searcher_for(&store);

        let err = searcher.execute("TitleToSearch").await.unwrap_err();

        assert_eq!(err.to_string(), "error executing paginator: some error");
        assert_eq!(err.phase(), "paginator execution");
    }

    #[tokio::test]
    async fn test_execute_discards_partial_results_on_a_later_page_failure() {
        let store = ScriptedStore::new()
            .with_movies(vec![Movie::new("Alien", "LA", "movie")])
            .with_page_error("throttled")
            .with_movies(vec![Movie::new("Aliens", "NY", "movie")]);
        let searcher = searcher_for(&store);

        let result = searcher.execute("alien").await;

        assert!(matches!(result, Err(SearchError::PaginatorExecution(_))));
        assert_eq!(store.page_fetches(), 2, "Stops at the first failing page");
    }

    #[tokio::test]
    async fn test_execute_fails_on_undecodable_record() {
        let broken: RawRecord = json!({"Title": "Alien", "Location": 7})
            .as_object()
            .cloned()
            .unwrap();
        let store = ScriptedStore::new().with_page(Page::new(vec![broken]));
        let searcher = searcher_for(&store);

        let err = searcher.execute("alien").await.unwrap_err();

        assert_eq!(err.phase(), "decode");
        assert!(err.to_string().starts_with("error unmarshaling the scan output items: record 0:"));
    }

    #[tokio::test]
    async fn test_execute_keeps_records_with_missing_attributes() {
        let incomplete: RawRecord = json!({"Title": "Alien", "TitleToSearch": "alien"})
            .as_object()
            .cloned()
            .unwrap();
        let store = ScriptedStore::new().with_page(Page::new(vec![incomplete]));
        let searcher = searcher_for(&store);

        let movies = searcher.execute("alien").await.unwrap();

        assert_eq!(movies, vec![Movie::new("Alien", "", "")]);
    }

    #[tokio::test]
    async fn test_execute_times_out_a_stalled_page() {
        let store = ScriptedStore::new()
            .with_movies(vec![Movie::new("Alien", "LA", "movie")])
            .with_stalled_page();
        let searcher = searcher_for(&store).with_page_timeout(Duration::from_millis(20));

        let err = searcher.execute("alien").await.unwrap_err();

        assert!(matches!(
            err,
            SearchError::PaginatorExecution(StoreError::Timeout(_))
        ));
    }

    // ============================================================================
    // Aggregation
    // ============================================================================

    #[tokio::test]
    async fn test_execute_returns_the_expected_results_from_the_paginator() {
        let item: RawRecord = json!({"Title": "Title 1", "Location": "loc 1", "Type": "kind"})
            .as_object()
            .cloned()
            .unwrap();
        let store = ScriptedStore::new().with_page(Page::new(vec![item]));
        let searcher = searcher_for(&store);

        let result = searcher.execute("TitleToSearch").await.unwrap();

        assert_eq!(result, vec![Movie::new("Title 1", "loc 1", "kind")]);
    }

    #[tokio::test]
    async fn test_execute_concatenates_pages_in_order() {
        let store = ScriptedStore::new()
            .with_movies(vec![Movie::new("Alien", "LA", "movie")])
            .with_movies(vec![])
            .with_movies(vec![
                Movie::new("Aliens", "NY", "movie"),
                Movie::new("Alien 3", "UK", "movie"),
            ]);
        let searcher = searcher_for(&store);

        let result = searcher.execute("alien").await.unwrap();

        let titles: Vec<_> = result.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Alien", "Aliens", "Alien 3"]);
        assert_eq!(store.page_fetches(), 3);
    }

    #[tokio::test]
    async fn test_execute_is_repeatable() {
        let store = InMemoryStore::from_movies(vec![
            Movie::new("Alien", "LA", "movie"),
            Movie::new("Heat", "LA", "movie"),
            Movie::new("Aliens", "NY", "movie"),
        ])
        .with_page_size(1);
        let searcher = StoreSearcher::new(Arc::new(store));

        let first = searcher.execute("ALIEN").await.unwrap();
        let second = searcher.execute("ALIEN").await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }
}
