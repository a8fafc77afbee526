//! Error types for ChainSentinel

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SentinelError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("No API key configured for {0}")]
    MissingApiKey(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Both AI services are currently unavailable")]
    BothProvidersUnavailable,
}

impl SentinelError {
    /// Build an upstream error for a vendor body that did not match its schema
    pub fn malformed(status: u16, what: &str) -> Self {
        Self::Upstream {
            status,
            message: format!("malformed response: {}", what),
        }
    }
}

pub type Result<T> = std::result::Result<T, SentinelError>;
