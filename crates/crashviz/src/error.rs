//! Error types for crashviz.
//!
//! This module defines all error types used throughout the crashviz crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for crashviz operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Data Errors ===
    /// A row's date could not be parsed into a calendar date.
    #[error("malformed record at row {row}: cannot parse date '{value}'")]
    MalformedRecord {
        /// One-based data row number (the header is not counted).
        row: usize,
        /// The offending date text.
        value: String,
    },

    /// The CSV input could not be tokenised or deserialized.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to read the data file.
    #[error("failed to read data file {path}: {source}")]
    DataFile {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// No data file was given on the command line or in configuration.
    #[error("no data file configured (use --data or set data.path)")]
    MissingDataPath,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for crashviz operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a malformed record error.
    #[must_use]
    pub fn malformed_record(row: usize, value: impl Into<String>) -> Self {
        Self::MalformedRecord {
            row,
            value: value.into(),
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error was caused by bad input data.
    #[must_use]
    pub fn is_data_error(&self) -> bool {
        matches!(self, Self::MalformedRecord { .. } | Self::Csv(_))
    }
}
