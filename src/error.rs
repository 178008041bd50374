use reqwest::StatusCode;
use serde_json::Value;

/// Errors raised by the API client.
///
/// Only reads turn a non-2xx status into [`ApiError::Http`]. Writes, deletes
/// and uploads report the status through their envelope instead.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Http {
        status: StatusCode,
        message: String,
        body: Value,
    },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid payload: {0}")]
    Payload(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status of a failed read, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Invalid(String),

    #[error("Token decryption failed: {0}")]
    Decrypt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
