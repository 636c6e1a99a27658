//! Error handling for the storefront event service
//!
//! One error enum covers the filesystem, configuration, and catalog
//! failure categories. HTTP mapping lives in `api_errors`.

use thiserror::Error;

/// Main error type for the storefront event service
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog request failed: {operation}")]
    Catalog {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Catalog returned HTTP {status} for {operation}")]
    UpstreamStatus { operation: String, status: u16 },

    #[error("Catalog sent an unreadable body for {operation}: {message}")]
    UpstreamBody { operation: String, message: String },

    #[error("Malformed log line: {message}")]
    MalformedLine { message: String },

    #[error("Resource not found: {resource} - {id}")]
    NotFound { resource: String, id: String },
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a catalog transport error
    pub fn catalog(operation: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Catalog {
            operation: operation.into(),
            source,
        }
    }

    pub fn upstream_status(operation: impl Into<String>, status: u16) -> Self {
        Self::UpstreamStatus {
            operation: operation.into(),
            status,
        }
    }

    pub fn upstream_body(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpstreamBody {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn malformed_line(message: impl Into<String>) -> Self {
        Self::MalformedLine {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }
}

impl From<figment::Error> for StoreError {
    fn from(err: figment::Error) -> Self {
        StoreError::config(err.to_string())
    }
}
