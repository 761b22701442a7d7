//! Error types for script export.

use thiserror::Error;

/// Result type alias for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while exporting a notebook to a script.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The notebook file could not be read.
    #[error("failed to read notebook {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The notebook file did not parse as a notebook document.
    #[error("malformed notebook {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The exported script could not be written.
    #[error("failed to write script {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
