//! Core domain types for the movie catalog.
//!
//! This module defines the records that travel through the search pipeline:
//! - `Movie`: the public record shape returned to callers
//! - `SearchQuery`: the normalized title fragment handed to a store
//! - `RawRecord`: one undecoded item as a store returns it
//!
//! Rust concepts demonstrated here:
//! - serde attributes to map Rust field names onto a wire format
//! - Newtypes to make "already normalized" visible in the type system

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Attribute names
// =============================================================================

/// Logical collection (table) that holds the catalog
pub const MOVIES_COLLECTION: &str = "Movies";

/// Stored attribute holding the pre-lowercased title used for filtering
pub const TITLE_TO_SEARCH_ATTRIBUTE: &str = "TitleToSearch";

/// Stored attribute holding the display title
pub const TITLE_ATTRIBUTE: &str = "Title";

/// One undecoded item from a store page.
///
/// Attribute name to JSON value. Stores translate their native item
/// representation into this shape so decoding is backend-agnostic.
pub type RawRecord = Map<String, Value>;

// =============================================================================
// Movie
// =============================================================================

/// A catalog record.
///
/// Serialized with PascalCase keys (`Title`, `Location`, `Kind`). Older
/// tables store the kind under `Type`, so decoding accepts either name.
/// Missing attributes decode as empty strings; only a wrong type is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Movie {
    pub title: String,
    pub location: String,
    #[serde(alias = "Type")]
    pub kind: String,
}

impl Movie {
    pub fn new(
        title: impl Into<String>,
        location: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            location: location.into(),
            kind: kind.into(),
        }
    }

    /// Stored form of this movie, including the lowercased search attribute
    pub fn to_record(&self) -> RawRecord {
        let mut record = RawRecord::new();
        record.insert(TITLE_ATTRIBUTE.to_string(), Value::String(self.title.clone()));
        record.insert("Location".to_string(), Value::String(self.location.clone()));
        record.insert("Kind".to_string(), Value::String(self.kind.clone()));
        record.insert(
            TITLE_TO_SEARCH_ATTRIBUTE.to_string(),
            Value::String(self.title.to_lowercase()),
        );
        record
    }
}

// =============================================================================
// SearchQuery
// =============================================================================

/// Title fragment to search for, lowercased on construction.
///
/// The store compares case-sensitively against `TitleToSearch`, which is
/// stored lowercased, so the fragment must be lowercased before it leaves
/// the executor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(title: &str) -> Self {
        Self(title.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
