//! nbscript-export: Notebook-to-script conversion for nbscript
//!
//! This crate provides:
//! - [`ScriptExporter`]: turns a parsed notebook into plain source text
//! - [`ScriptExportHook`]: a post-save hook that writes the exported script
//!   next to the notebook on every notebook save
//!
//! # Architecture
//!
//! The exporter is constructed once at startup and handed to the hook
//! explicitly; the hook holds that single instance for the life of the
//! process. The hook runs inline on the save path: a notebook save does not
//! complete until the script is on disk, and any export failure is the
//! save's failure.
//!
//! # Usage
//!
//! ```rust,ignore
//! use nbscript_export::{ScriptExporter, ScriptExportHook};
//!
//! let exporter = Arc::new(ScriptExporter::new());
//! manager.register_post_save_hook(Arc::new(ScriptExportHook::new(exporter)));
//! ```

pub mod error;
pub mod exporter;
pub mod hook;

pub use error::{ExportError, ExportResult};
pub use exporter::{ExportMeta, ScriptExporter, FALLBACK_EXTENSION};
pub use hook::ScriptExportHook;
