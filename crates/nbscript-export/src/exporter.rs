//! Notebook-to-script transformation.

use crate::error::{ExportError, ExportResult};
use nbscript_core::Notebook;
use std::fs;
use std::path::Path;

/// Extension used when a notebook declares no `language_info` extension.
pub const FALLBACK_EXTENSION: &str = "txt";

/// Metadata describing one export.
#[derive(Debug, Clone)]
pub struct ExportMeta {
    /// Output file extension, without the leading dot.
    pub file_extension: String,
    /// Language name from the notebook metadata, if declared.
    pub language: Option<String>,
}

/// Converts a notebook's in-memory form into plain source text.
///
/// Stateless apart from its construction; one instance is shared across all
/// invocations for the life of the process.
#[derive(Debug, Default)]
pub struct ScriptExporter;

impl ScriptExporter {
    pub fn new() -> Self {
        ScriptExporter
    }

    /// The output extension this exporter declares for `notebook`, without
    /// the leading dot. Falls back to [`FALLBACK_EXTENSION`] when the
    /// notebook's metadata declares none.
    pub fn file_extension(&self, notebook: &Notebook) -> String {
        notebook
            .file_extension()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
    }

    /// Transform a parsed notebook into script text.
    ///
    /// Code cell sources are concatenated in order, separated by one blank
    /// line; markdown and raw cells are omitted. The output always ends
    /// with a newline.
    pub fn export(&self, notebook: &Notebook) -> (String, ExportMeta) {
        let blocks: Vec<String> = notebook
            .cells
            .iter()
            .filter(|cell| cell.is_code() && !cell.source.is_empty())
            .map(|cell| cell.source.text().trim_end_matches('\n').to_string())
            .collect();
        let mut source = blocks.join("\n\n");
        if !source.is_empty() {
            source.push('\n');
        }
        let meta = ExportMeta {
            file_extension: self.file_extension(notebook),
            language: notebook.language().map(str::to_string),
        };
        (source, meta)
    }

    /// Read, parse, and transform the notebook file at `path`.
    pub fn export_file(&self, path: &Path) -> ExportResult<(String, ExportMeta)> {
        let text = fs::read_to_string(path).map_err(|source| ExportError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let notebook = Notebook::parse(&text).map_err(|source| ExportError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Ok(self.export(&notebook))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn python_notebook(cells: &str) -> Notebook {
        let json = format!(
            r#"{{
                "cells": [{cells}],
                "metadata": {{
                    "language_info": {{"name": "python", "file_extension": ".py"}}
                }},
                "nbformat": 4,
                "nbformat_minor": 5
            }}"#
        );
        Notebook::parse(&json).unwrap()
    }

    #[test]
    fn test_code_cells_only() {
        let nb = python_notebook(
            r##"{"cell_type": "markdown", "source": "# Heading"},
               {"cell_type": "code", "source": ["x = 1\n", "print(x)\n"]},
               {"cell_type": "raw", "source": "raw text"},
               {"cell_type": "code", "source": "y = 2"}"##,
        );
        let (source, meta) = ScriptExporter::new().export(&nb);
        assert_eq!(source, "x = 1\nprint(x)\n\ny = 2\n");
        assert_eq!(meta.file_extension, "py");
        assert_eq!(meta.language.as_deref(), Some("python"));
    }

    #[test]
    fn test_empty_code_cells_are_skipped() {
        let nb = python_notebook(
            r#"{"cell_type": "code", "source": ""},
               {"cell_type": "code", "source": "x = 1"}"#,
        );
        let (source, _) = ScriptExporter::new().export(&nb);
        assert_eq!(source, "x = 1\n");
    }

    #[test]
    fn test_notebook_with_no_code_exports_empty() {
        let nb = python_notebook(r#"{"cell_type": "markdown", "source": "only prose"}"#);
        let (source, _) = ScriptExporter::new().export(&nb);
        assert_eq!(source, "");
    }

    #[test]
    fn test_extension_fallback() {
        let nb = Notebook::parse(
            r#"{"cells": [], "metadata": {}, "nbformat": 4, "nbformat_minor": 5}"#,
        )
        .unwrap();
        assert_eq!(ScriptExporter::new().file_extension(&nb), FALLBACK_EXTENSION);
    }

    #[test]
    fn test_export_file_missing() {
        let err = ScriptExporter::new()
            .export_file(Path::new("/nonexistent/nb.ipynb"))
            .unwrap_err();
        assert!(matches!(err, ExportError::Read { .. }));
    }

    #[test]
    fn test_export_file_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ipynb");
        fs::write(&path, "{broken").unwrap();
        let err = ScriptExporter::new().export_file(&path).unwrap_err();
        assert!(matches!(err, ExportError::Parse { .. }));
    }
}
