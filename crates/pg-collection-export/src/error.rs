//! Error types for the export library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Configuration error (malformed front matter, invalid identifiers, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// Output directory is missing or not a directory
    #[error("Output directory {path:?} is not usable")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A column value could not be read from a fetched row
    #[error("Cannot read column {column} (type {type_name}): {message}")]
    RowScan {
        column: String,
        type_name: String,
        message: String,
    },

    /// Writing a generated document failed
    #[error("Failed to write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    /// Create a RowScan error for a column.
    pub fn row_scan(
        column: impl Into<String>,
        type_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ExportError::RowScan {
            column: column.into(),
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
