use thiserror::Error;

use crate::project::types::Platform;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The tier is not configured (no file, no credentials). The chain skips
    /// it without recording a warning.
    #[error("Not configured: {0}")]
    Unavailable(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Could not determine {0} app identifier")]
    MissingAppId(Platform),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Timed out after {0} ms")]
    Timeout(u64),
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}
