//! Error types for the contents layer.

use crate::hook::HookError;
use thiserror::Error;

/// Result type alias for contents operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during contents operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// No document at the requested path.
    #[error("no such file or directory: {0}")]
    NotFound(String),

    /// Expected a directory, found a file (or vice versa).
    #[error("wrong entry kind at {path}: expected {expected}")]
    WrongKind { path: String, expected: &'static str },

    /// Path validation failed.
    #[error("invalid path: {0}")]
    InvalidPath(#[from] nbscript_core::PathError),

    /// A file claiming to be a notebook did not parse.
    #[error("malformed notebook {path}: {source}")]
    MalformedNotebook {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Model content is missing or does not match its declared type.
    #[error("invalid content for {path}: {reason}")]
    InvalidContent { path: String, reason: String },

    /// A post-save hook failed; the save itself reached disk.
    #[error("post-save hook '{name}' failed: {source}")]
    Hook {
        name: String,
        #[source]
        source: HookError,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl std::fmt::Display, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_string(),
            source,
        }
    }
}
