//! nbscript-core: Shared document model for nbscript
//!
//! This crate provides:
//! - The notebook document model (cells, kernel and language metadata)
//! - API-relative path handling for the contents layer
//!
//! # Architecture
//!
//! Notebooks are plain JSON documents. The types here mirror the on-disk
//! format closely enough to round-trip documents written by other tools:
//! unknown metadata is preserved as raw JSON, and cell sources accept both
//! the single-string and list-of-lines encodings.
//!
//! # Usage
//!
//! ```rust,ignore
//! use nbscript_core::{ApiPath, Notebook};
//!
//! let notebook = Notebook::parse(&json_text)?;
//! let ext = notebook.file_extension().unwrap_or(".txt");
//! ```

pub mod notebook;
pub mod path;

pub use notebook::{Cell, CellType, LanguageInfo, Notebook, NotebookMetadata, Source};
pub use path::{ApiPath, PathError};
