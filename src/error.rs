//! Error types for the readmark library.
//!
//! All fallible operations return [`ReadmarkError`] through the crate-wide
//! [`Result`] alias.
//!
//! # Examples
//!
//! ```
//! use readmark::error::{ReadmarkError, Result};
//!
//! fn lookup() -> Result<()> {
//!     Err(ReadmarkError::store("vocabulary store is offline"))
//! }
//!
//! match lookup() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for readmark operations.
#[derive(Error, Debug)]
pub enum ReadmarkError {
    /// I/O errors (reading articles, store files, configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Vocabulary store errors (unreachable, malformed response, ...)
    #[error("Store error: {0}")]
    Store(String),

    /// A content invariant was violated while rendering.
    ///
    /// This indicates a bug in the pipeline rather than bad input data.
    #[error("Invariant violation: {0}")]
    Invariant(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with ReadmarkError.
pub type Result<T> = std::result::Result<T, ReadmarkError>;

impl ReadmarkError {
    /// Create a new store error.
    pub fn store<S: Into<String>>(msg: S) -> Self {
        ReadmarkError::Store(msg.into())
    }

    /// Create a new invariant violation error.
    pub fn invariant<S: Into<String>>(msg: S) -> Self {
        ReadmarkError::Invariant(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ReadmarkError::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = ReadmarkError::store("connection refused");
        assert_eq!(error.to_string(), "Store error: connection refused");

        let error = ReadmarkError::invariant("phrase without occurrence");
        assert_eq!(
            error.to_string(),
            "Invariant violation: phrase without occurrence"
        );

        let error = ReadmarkError::config("unknown field");
        assert_eq!(error.to_string(), "Configuration error: unknown field");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = ReadmarkError::from(io_error);

        match error {
            ReadmarkError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<u8>("not json").unwrap_err();
        assert!(matches!(
            ReadmarkError::from(json_error),
            ReadmarkError::Json(_)
        ));
    }
}
