//! HTTP surface for the search service.
//!
//! - `GET /movies?title=<fragment>`: one search invocation
//! - `GET /health`: liveness probe

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::response::SearchRequest;
use crate::service::SearchService;

pub fn router(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/movies", get(handle_search))
        .route("/health", get(handle_health))
        .with_state(service)
}

/// Serve `router` on an already bound listener until the task is dropped
pub async fn serve(listener: TcpListener, service: Arc<SearchService>) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("HTTP server listening on {}", addr);
    }
    axum::serve(listener, router(service)).await
}

async fn handle_search(
    State(service): State<Arc<SearchService>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let response = service.handle(&SearchRequest::new(params)).await;

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = if response.is_success() {
        "application/json"
    } else {
        "text/plain; charset=utf-8"
    };

    (status, [(header::CONTENT_TYPE, content_type)], response.body)
}

async fn handle_health() -> &'static str {
    "ok"
}
