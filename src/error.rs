use thiserror::Error;

use crate::client::Method;

/// Errors that can occur while talking to the recipe backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never completed (DNS, connection refused, timeout)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response arrived but its status was outside the success range
    #[error("{method} {path}: {status}")]
    HttpStatus {
        method: Method,
        path: String,
        status: String,
    },

    /// The response body was not the JSON we expected
    #[error("{method} {path}: invalid response body: {source}")]
    Decode {
        method: Method,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Input rejected locally before any request was made
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl ClientError {
    /// HTTP status text, if the server answered with a non-success status
    pub fn status(&self) -> Option<&str> {
        match self {
            ClientError::HttpStatus { status, .. } => Some(status),
            _ => None,
        }
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
