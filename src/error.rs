//! Error types for ad-copy-guard

use thiserror::Error;

/// Failures surfaced by an analysis. Scoring itself never fails; every
/// variant originates at the generation service boundary.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Invalid API key. Please check your API key and try again.")]
    InvalidCredential,

    #[error("Failed to generate optimized copy: {message}. Please try again.")]
    Generation { message: String },

    #[error("Generation service not initialized. Please set your API key first.")]
    NotInitialized,
}

impl AnalyzerError {
    pub fn generation(message: impl Into<String>) -> Self {
        AnalyzerError::Generation {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for AnalyzerError {
    fn from(err: reqwest::Error) -> Self {
        AnalyzerError::Generation {
            message: format!("HTTP request failed: {}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Failures from the saved-copy store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No saved copy with id {id}")]
    NotFound { id: u64 },
}
