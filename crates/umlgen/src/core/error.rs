//! Core error types for diagram building
//!
//! Every failure the core can raise is deterministic: re-running a build with
//! the same model and configuration reproduces the same error.

use thiserror::Error;

/// Core error types for diagram building
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Manifest error: {message}")]
    Manifest { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl DiagramError {
    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new manifest error
    pub fn manifest(message: impl Into<String>) -> Self {
        Self::Manifest {
            message: message.into(),
        }
    }

    /// Returns true for errors caused by the caller's configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, DiagramError::Configuration { .. })
    }
}

/// Result alias used across the core
pub type DiagramResult<T> = std::result::Result<T, DiagramError>;

/// Fail with a configuration error when `value` is blank
pub fn require_not_blank(value: &str, what: &str) -> DiagramResult<()> {
    if value.trim().is_empty() {
        return Err(DiagramError::configuration(format!("{what} must not be blank")));
    }
    Ok(())
}
