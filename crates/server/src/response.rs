//! Outcome of one invocation and its wire form.

use std::collections::HashMap;

/// Body sent for every 500; the underlying cause is only logged
pub const INTERNAL_ERROR_BODY: &str = "Internal error";

/// Inbound request: the query-string parameters, nothing else is consumed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub query_parameters: HashMap<String, String>,
}

impl SearchRequest {
    pub fn new(query_parameters: HashMap<String, String>) -> Self {
        Self { query_parameters }
    }

    /// A request carrying only `title`
    pub fn for_title(title: impl Into<String>) -> Self {
        Self::new(HashMap::from([("title".to_string(), title.into())]))
    }
}

/// How an invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    BadRequest(String),
    InternalError,
    Success(String),
}

impl Outcome {
    pub fn status(&self) -> u16 {
        match self {
            Outcome::BadRequest(_) => 400,
            Outcome::InternalError => 500,
            Outcome::Success(_) => 200,
        }
    }

    /// Convert to the outbound response
    pub fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Outcome::BadRequest(reason) => reason,
            Outcome::InternalError => INTERNAL_ERROR_BODY.to_string(),
            Outcome::Success(body) => body,
        };
        Response { status, body }
    }
}

/// Outbound response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn internal_error() -> Self {
        Self::new(500, INTERNAL_ERROR_BODY)
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}
