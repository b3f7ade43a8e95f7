//! Server crate for the ReelSearch title search.
//!
//! This crate contains the service that turns one request into one
//! response: validation, search, encoding, and the mapping of every outcome
//! onto a status code and body. It also holds the configuration that wires a
//! document store into the service, and the HTTP router that exposes it.

pub mod config;
pub mod encoder;
pub mod http;
pub mod response;
pub mod service;
pub mod validator;

pub use config::{BackendConfig, ConfigError, ServiceConfig};
pub use encoder::{EncodeError, JsonEncoder, ResponseEncoder};
pub use response::{Outcome, Response, SearchRequest};
pub use service::SearchService;
pub use validator::ValidationError;
