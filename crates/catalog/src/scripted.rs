//! Scripted document store for tests.
//!
//! `ScriptedStore` replays a fixed sequence of pages (or failures) on every
//! scan it opens and records every scan request it receives, so callers can assert both on
//! what was asked of the store and on how they react to each outcome.
//!
//! ```ignore
//! let store = ScriptedStore::new()
//!     .with_movies(vec![Movie::new("Alien", "LA", "movie")])
//!     .with_page_error("throttled");
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, Page, Paginator, ScanRequest};
use crate::types::Movie;

#[derive(Clone)]
enum Step {
    Page(Page),
    Fail(String),
    /// Never resolves; only a deadline or cancellation gets past it
    Stall,
}

#[derive(Default)]
struct Script {
    open_error: Option<String>,
    steps: VecDeque<Step>,
    requests: Vec<ScanRequest>,
    page_fetches: usize,
}

/// Controllable `DocumentStore` test double.
///
/// Each `open_scan` gets its own copy of the queued steps, so repeated
/// searches against an unchanged store see the same pages. Clones share
/// the same script, so a test can keep one handle for
/// assertions while the code under test owns another.
#[derive(Clone, Default)]
pub struct ScriptedStore {
    script: Arc<Mutex<Script>>,
}

impl ScriptedStore {
    /// A store whose scans return no pages at all
    pub fn new() -> Self {
        Self::default()
    }

    /// Opening a scan fails with `message`
    pub fn failing_open(message: impl Into<String>) -> Self {
        let store = Self::new();
        store.lock().open_error = Some(message.into());
        store
    }

    /// Queue a page of raw records
    pub fn with_page(self, page: Page) -> Self {
        self.lock().steps.push_back(Step::Page(page));
        self
    }

    /// Queue a page holding the stored form of `movies`
    pub fn with_movies(self, movies: Vec<Movie>) -> Self {
        self.with_page(Page::new(movies.iter().map(Movie::to_record).collect()))
    }

    /// Queue a page fetch that fails with `message`
    pub fn with_page_error(self, message: impl Into<String>) -> Self {
        self.lock().steps.push_back(Step::Fail(message.into()));
        self
    }

    /// Queue a page fetch that never completes
    pub fn with_stalled_page(self) -> Self {
        self.lock().steps.push_back(Step::Stall);
        self
    }

    /// Every scan request received so far, in order
    pub fn requests(&self) -> Vec<ScanRequest> {
        self.lock().requests.clone()
    }

    /// Number of `next_page` calls made across all scans
    pub fn page_fetches(&self) -> usize {
        self.lock().page_fetches
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DocumentStore for ScriptedStore {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn open_scan(&self, request: ScanRequest) -> StoreResult<Box<dyn Paginator>> {
        let mut script = self.lock();
        script.requests.push(request);

        if let Some(message) = &script.open_error {
            return Err(StoreError::Request(message.clone()));
        }

        Ok(Box::new(ScriptedPaginator {
            store: self.clone(),
            steps: script.steps.clone(),
        }))
    }
}

struct ScriptedPaginator {
    store: ScriptedStore,
    steps: VecDeque<Step>,
}

#[async_trait]
impl Paginator for ScriptedPaginator {
    fn has_more_pages(&self) -> bool {
        !self.steps.is_empty()
    }

    async fn next_page(&mut self) -> StoreResult<Page> {
        self.store.lock().page_fetches += 1;
        let step = self.steps.pop_front();

        match step {
            Some(Step::Page(page)) => Ok(page),
            Some(Step::Fail(message)) => Err(StoreError::Request(message)),
            Some(Step::Stall) => std::future::pending().await,
            None => Err(StoreError::Exhausted),
        }
    }
}
