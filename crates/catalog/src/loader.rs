//! Loader for catalog files.
//!
//! A catalog file is a JSON array of objects, one per movie:
//!
//! ```json
//! [
//!   {"Title": "Alien", "Location": "LA", "Kind": "movie"},
//!   {"Title": "Heat", "Location": "LA", "Type": "movie", "TitleToSearch": "heat"}
//! ]
//! ```
//!
//! Items are kept as raw records so the store decodes them exactly as a
//! remote table would. The only change made on load is deriving
//! `TitleToSearch` from `Title` when a record does not carry it.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::CatalogError;
use crate::types::{RawRecord, TITLE_ATTRIBUTE, TITLE_TO_SEARCH_ATTRIBUTE};

/// Read and normalize every record in a catalog file
pub fn load_records(path: &Path) -> Result<Vec<RawRecord>, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let items: Vec<Value> = serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| normalize_record(index, item))
        .collect()
}

/// Check a single item and fill in the search attribute
fn normalize_record(index: usize, item: Value) -> Result<RawRecord, CatalogError> {
    let Value::Object(mut record) = item else {
        return Err(CatalogError::InvalidRecord {
            index,
            reason: "expected a JSON object".to_string(),
        });
    };

    let title = record
        .get(TITLE_ATTRIBUTE)
        .and_then(Value::as_str)
        .ok_or_else(|| CatalogError::InvalidRecord {
            index,
            reason: format!("missing string attribute {}", TITLE_ATTRIBUTE),
        })?
        .to_lowercase();

    record
        .entry(TITLE_TO_SEARCH_ATTRIBUTE)
        .or_insert(Value::String(title));

    Ok(record)
}
