// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Not authorized (HTTP {status})")]
    Unauthorized { status: u16 },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Note id must not be empty")]
    InvalidId,
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
    #[error("Request cancelled")]
    Cancelled,
}

/// Coarse classification used by views to pick an error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Unauthorized,
    NotFound,
    Validation,
    Other,
    Cancelled,
}

impl ClientError {
    /// Map a non-success HTTP status and its body to an error.
    pub fn from_status(status: u16, body: &str, resource: &str) -> Self {
        let message = body.trim().to_string();
        match status {
            401 | 403 => ClientError::Unauthorized { status },
            404 => ClientError::NotFound(resource.to_string()),
            400 | 422 => ClientError::Validation(message),
            _ => ClientError::Server { status, message },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Network(_) => ErrorKind::Network,
            ClientError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ClientError::NotFound(_) => ErrorKind::NotFound,
            ClientError::Validation(_) | ClientError::InvalidId => ErrorKind::Validation,
            ClientError::Cancelled => ErrorKind::Cancelled,
            ClientError::Server { .. }
            | ClientError::Decode(_)
            | ClientError::Storage(_)
            | ClientError::InvalidUrl(_) => ErrorKind::Other,
        }
    }
}
