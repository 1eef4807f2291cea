//! Error types for the Inkwell SDK.

use thiserror::Error;

/// SDK operation errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// Connection error (network, DNS, etc.)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Request could not be built from the given base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Item missing or unpublished
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authentication or authorization error
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Admin call made before `login`
    #[error("Not logged in - call login() first")]
    NotLoggedIn,

    /// Server rejected or failed the request
    #[error("HTTP {status}: {message}")]
    Http {
        /// Status code
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            SdkError::ConnectionError(e.to_string())
        } else if e.is_decode() {
            SdkError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            SdkError::Http {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            SdkError::ConnectionError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Decode(format!("JSON parsing error: {}", e))
    }
}
