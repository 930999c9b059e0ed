//! Error types for the SoftSync API tester
//!
//! These cover runner-level faults only. Individual request failures are
//! recorded as test results (see [`crate::client::RequestFailure`]) and never
//! surface through this type.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the tester
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === HTTP Client Errors ===
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    // === Report Errors ===
    #[error("Failed to write report '{path}': {error}")]
    ReportWrite { path: String, error: String },

    // === Run Control ===
    #[error("Tests interrupted by user")]
    Interrupted,

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a file read error for the given path
    pub fn file_read(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create a report write error for the given path
    pub fn report_write(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::ReportWrite {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }
}
