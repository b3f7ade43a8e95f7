//! Extracts and validates the title to search from a request.
//!
//! Rules, first failure wins:
//! 1. No query parameters at all
//! 2. `title` absent or empty
//! 3. `title` shorter than `MIN_TITLE_LENGTH` characters
//!
//! Only `title` is inspected, and its casing is left alone.

use std::collections::HashMap;

use thiserror::Error;

/// Query parameter holding the title fragment
pub const TITLE_PARAMETER: &str = "title";

/// Shortest fragment worth scanning the whole catalog for
pub const MIN_TITLE_LENGTH: usize = 3;

/// Why a request was rejected. The message is returned to the caller verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("query string is empty")]
    EmptyQueryString,

    #[error("the title to search is empty")]
    EmptyTitle,

    #[error("the title to search is too short")]
    TitleTooShort,
}

/// Pull the title out of the query parameters
pub fn title_from_query(params: &HashMap<String, String>) -> Result<String, ValidationError> {
    if params.is_empty() {
        return Err(ValidationError::EmptyQueryString);
    }

    let title = params
        .get(TITLE_PARAMETER)
        .map(String::as_str)
        .unwrap_or_default();

    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    if title.chars().count() < MIN_TITLE_LENGTH {
        return Err(ValidationError::TitleTooShort);
    }

    Ok(title.to_string())
}
