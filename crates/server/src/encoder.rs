//! Serializes search results into a response body.

use catalog::Movie;
use thiserror::Error;

/// Encoding a result list failed
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The encoder produced bytes that are not valid UTF-8 text
    #[error("encoded body is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::string::FromUtf8Error),

    #[error("{0}")]
    Other(String),
}

/// Turns the aggregated movies into response bytes
pub trait ResponseEncoder: Send + Sync {
    fn encode(&self, movies: &[Movie]) -> Result<Vec<u8>, EncodeError>;

    /// Encode and check the body is UTF-8 text
    fn encode_text(&self, movies: &[Movie]) -> Result<String, EncodeError> {
        Ok(String::from_utf8(self.encode(movies)?)?)
    }
}

/// JSON array of `{Title, Location, Kind}` objects; `[]` when empty
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl ResponseEncoder for JsonEncoder {
    fn encode(&self, movies: &[Movie]) -> Result<Vec<u8>, EncodeError> {
        Ok(serde_json::to_vec(movies)?)
    }
}
