//! Error types for Trueno-Results
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trueno-Results error types
#[derive(Error, Debug)]
pub enum Error {
    /// Column schema is invalid (empty, duplicate names, or name/type count mismatch)
    #[error("Schema error: {0}")]
    Schema(String),

    /// Appended row has the wrong number of values
    #[error("Row arity mismatch: expected {expected} values, got {got}")]
    Arity {
        /// Declared column count
        expected: usize,
        /// Number of values supplied
        got: usize,
    },

    /// Appended value does not match the declared column type
    #[error("Type mismatch in column '{column}': expected {expected}, got {got}")]
    TypeMismatch {
        /// Column name
        column: String,
        /// Declared column type
        expected: &'static str,
        /// Type of the supplied value
        got: &'static str,
    },

    /// No snapshot carries the requested version label
    #[error("Version not found: {0}")]
    VersionNotFound(String),

    /// Storage document exists but is not a valid versioned log
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
