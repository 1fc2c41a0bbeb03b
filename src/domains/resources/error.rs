//! Resource-specific error types.

use thiserror::Error;

/// Errors that can occur while reading resources.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The requested resource was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl ResourceError {
    pub fn not_found(uri: impl Into<String>) -> Self {
        Self::NotFound(uri.into())
    }
}
