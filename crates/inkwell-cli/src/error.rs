//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// SDK error
    #[error("SDK error: {0}")]
    Sdk(#[from] inkwell_sdk::SdkError),

    /// Local store error
    #[error("Store error: {0}")]
    Store(#[from] inkwell_store::StoreError),

    /// Local sweep error
    #[error("Sweep error: {0}")]
    Janitor(#[from] inkwell_janitor::JanitorError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Admin operation without a password
    #[error("Admin password required. Pass --password or set INKWELL_ADMIN_PASSWORD.")]
    MissingPassword,
}

impl From<inkwell_domain::SlugError> for CliError {
    fn from(e: inkwell_domain::SlugError) -> Self {
        CliError::InvalidInput(e.to_string())
    }
}
