//! Service configuration, resolved once at startup.
//!
//! The backend choice lives here and nowhere else: `SearchService` is
//! handed a fully built store and never inspects the environment.
//!
//! Example configuration file:
//!
//! ```json
//! {
//!   "backend": {"kind": "memory", "catalog_path": "data/movies.json", "page_size": 50},
//!   "page_timeout_ms": 5000,
//!   "bind_addr": "0.0.0.0:8080"
//! }
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use catalog::{CatalogError, DEFAULT_PAGE_SIZE, DocumentStore, DynamoDbSettings, DynamoDbStore, InMemoryStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or applying configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

/// Which document store backs the search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// Catalog file served from memory
    Memory {
        catalog_path: PathBuf,
        #[serde(default = "default_page_size")]
        page_size: usize,
    },
    /// DynamoDB table
    Dynamodb(DynamoDbSettings),
}

/// Everything needed to assemble a `SearchService`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub backend: BackendConfig,

    /// Deadline for each page fetch, in milliseconds
    #[serde(default)]
    pub page_timeout_ms: Option<u64>,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
}

impl ServiceConfig {
    pub fn new(backend: BackendConfig) -> Self {
        Self {
            backend,
            page_timeout_ms: None,
            bind_addr: default_bind_addr(),
        }
    }

    /// Load and validate a JSON config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let BackendConfig::Memory { page_size: 0, .. } = self.backend {
            return Err(ConfigError::Invalid("page_size must be at least 1".to_string()));
        }

        if self.page_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "page_timeout_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn page_timeout(&self) -> Option<Duration> {
        self.page_timeout_ms.map(Duration::from_millis)
    }

    /// Construct the configured document store
    pub fn build_store(&self) -> Result<Arc<dyn DocumentStore>, ConfigError> {
        match &self.backend {
            BackendConfig::Memory {
                catalog_path,
                page_size,
            } => {
                let store = InMemoryStore::load_from_file(catalog_path)?.with_page_size(*page_size);
                Ok(Arc::new(store))
            }
            BackendConfig::Dynamodb(settings) => Ok(Arc::new(DynamoDbStore::new(settings.clone()))),
        }
    }
}
