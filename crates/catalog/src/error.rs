//! Error types for the catalog crate.
//!
//! Three families of failure live here:
//! - `StoreError`: a document store call failed (open a scan, fetch a page)
//! - `DecodeError`: a page came back but an item is not a valid `Movie`
//! - `CatalogError`: a local catalog file could not be loaded

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a `DocumentStore` or its `Paginator`
#[derive(Error, Debug)]
pub enum StoreError {
    /// Client configuration (credentials, region, endpoint) could not be resolved
    #[error("error loading the store config: {0}")]
    Config(String),

    /// The collection named in the scan request does not exist
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// A store round-trip failed
    ///
    /// Carries the backend's message verbatim.
    #[error("{0}")]
    Request(String),

    /// A page fetch did not complete before its deadline
    #[error("page fetch timed out after {0:?}")]
    Timeout(Duration),

    /// `next_page` was called after the last page
    #[error("no more pages to fetch")]
    Exhausted,
}

/// A raw record could not be decoded into a `Movie`
#[derive(Error, Debug)]
#[error("record {index}: {source}")]
pub struct DecodeError {
    /// Position of the offending record within its page
    pub index: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Errors that can occur while loading a catalog file
#[derive(Error, Debug)]
pub enum CatalogError {
    /// I/O error occurred while reading the file
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON array of objects
    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An item is missing the attributes every movie needs
    #[error("invalid record {index} in catalog: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Convenience type alias for store results
pub type StoreResult<T> = std::result::Result<T, StoreError>;
