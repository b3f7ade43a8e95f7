//! # Search Service
//!
//! This module sequences one invocation of the title search:
//! 1. Validate the request (400 on failure)
//! 2. Run the search (500 on failure)
//! 3. Encode the results (500 on failure)
//! 4. Respond 200 with the encoded body
//!
//! Exactly one response line is logged per invocation, at the point the
//! response is decided. Causes of 500s go to the log, never to the caller.

use std::sync::Arc;

use search::{Searcher, StoreSearcher};
use tracing::{error, info, warn};

use crate::config::{ConfigError, ServiceConfig};
use crate::encoder::{JsonEncoder, ResponseEncoder};
use crate::response::{Outcome, Response, SearchRequest};
use crate::validator::title_from_query;

/// Composition of a searcher and an encoder. Holds no per-request state.
#[derive(Clone)]
pub struct SearchService {
    searcher: Arc<dyn Searcher>,
    encoder: Arc<dyn ResponseEncoder>,
}

impl SearchService {
    pub fn new(searcher: Arc<dyn Searcher>, encoder: Arc<dyn ResponseEncoder>) -> Self {
        Self { searcher, encoder }
    }

    /// Build the production service: configured store, `StoreSearcher`, JSON encoder
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let store = config.build_store()?;
        info!("Using {} document store", store.name());

        let mut searcher = StoreSearcher::new(store);
        if let Some(timeout) = config.page_timeout() {
            searcher = searcher.with_page_timeout(timeout);
        }

        Ok(Self::new(Arc::new(searcher), Arc::new(JsonEncoder)))
    }

    /// Main entry point: answer one request
    pub async fn handle(&self, request: &SearchRequest) -> Response {
        self.outcome(request).await.into_response()
    }

    /// Run validation, search and encoding, logging the decision
    pub async fn outcome(&self, request: &SearchRequest) -> Outcome {
        let title = match title_from_query(&request.query_parameters) {
            Ok(title) => title,
            Err(e) => {
                warn!("400 - Bad Request: {}", e);
                return Outcome::BadRequest(e.to_string());
            }
        };
        info!("Title to search: {:?}", title);

        let movies = match self.searcher.execute(&title).await {
            Ok(movies) => movies,
            Err(e) => {
                error!(
                    phase = e.phase(),
                    "500 - Internal Error: error executing the search: {}", e
                );
                return Outcome::InternalError;
            }
        };

        let body = match self.encoder.encode_text(&movies) {
            Ok(body) => body,
            Err(e) => {
                error!(
                    "500 - Internal Error: error marshaling the search results: {}",
                    e
                );
                return Outcome::InternalError;
            }
        };

        info!("200 - Ok");
        Outcome::Success(body)
    }
}
