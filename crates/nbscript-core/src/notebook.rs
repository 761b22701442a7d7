//! The notebook document model.
//!
//! Mirrors the nbformat v4 JSON layout: a list of cells plus notebook-level
//! metadata. Only the fields the rest of the system reads are typed;
//! everything else is carried as raw JSON so that saving a document does not
//! strip metadata written by other tools.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A parsed notebook document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notebook {
    #[serde(default)]
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub metadata: NotebookMetadata,
    #[serde(default = "default_nbformat")]
    pub nbformat: u32,
    #[serde(default)]
    pub nbformat_minor: u32,
}

fn default_nbformat() -> u32 {
    4
}

impl Notebook {
    /// Parse a notebook from its JSON text.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serialize the notebook back to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The source-file extension declared by the notebook's language
    /// metadata, including the leading dot (e.g. `".py"`).
    ///
    /// Returns `None` when the notebook carries no `language_info` or the
    /// info declares no extension.
    pub fn file_extension(&self) -> Option<&str> {
        self.metadata
            .language_info
            .as_ref()
            .and_then(|info| info.file_extension.as_deref())
    }

    /// The language name declared by the notebook, if any.
    pub fn language(&self) -> Option<&str> {
        self.metadata
            .language_info
            .as_ref()
            .map(|info| info.name.as_str())
    }
}

/// Notebook-level metadata.
///
/// `language_info` and `kernelspec` are what the exporter consults; anything
/// else round-trips through `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotebookMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_info: Option<LanguageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernelspec: Option<Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// The `language_info` block of notebook metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A single notebook cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,
    #[serde(default)]
    pub source: Source,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Cell {
    /// True for cells whose source belongs in an exported script.
    pub fn is_code(&self) -> bool {
        self.cell_type == CellType::Code
    }
}

/// The kind of a notebook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Code,
    Markdown,
    Raw,
}

/// Cell source text, stored on disk either as one string or as a list of
/// line strings (each keeping its trailing newline).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Text(String),
    Lines(Vec<String>),
}

impl Source {
    /// The full source as one string.
    pub fn text(&self) -> String {
        match self {
            Source::Text(s) => s.clone(),
            Source::Lines(lines) => lines.concat(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Source::Text(s) => s.is_empty(),
            Source::Lines(lines) => lines.iter().all(|l| l.is_empty()),
        }
    }
}

impl Default for Source {
    fn default() -> Self {
        Source::Text(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = r##"{
        "cells": [
            {"cell_type": "markdown", "source": "# Title", "metadata": {}},
            {"cell_type": "code", "source": ["x = 1\n", "print(x)"], "metadata": {}, "outputs": [], "execution_count": null}
        ],
        "metadata": {
            "language_info": {"name": "python", "file_extension": ".py"}
        },
        "nbformat": 4,
        "nbformat_minor": 5
    }"##;

    #[test]
    fn test_parse_simple_notebook() {
        let nb = Notebook::parse(SIMPLE).unwrap();
        assert_eq!(nb.cells.len(), 2);
        assert_eq!(nb.cells[0].cell_type, CellType::Markdown);
        assert_eq!(nb.cells[1].cell_type, CellType::Code);
        assert_eq!(nb.nbformat, 4);
    }

    #[test]
    fn test_source_joins_lines() {
        let nb = Notebook::parse(SIMPLE).unwrap();
        assert_eq!(nb.cells[1].source.text(), "x = 1\nprint(x)");
        assert_eq!(nb.cells[0].source.text(), "# Title");
    }

    #[test]
    fn test_language_metadata() {
        let nb = Notebook::parse(SIMPLE).unwrap();
        assert_eq!(nb.language(), Some("python"));
        assert_eq!(nb.file_extension(), Some(".py"));
    }

    #[test]
    fn test_missing_language_info() {
        let nb = Notebook::parse(r#"{"cells": [], "metadata": {}, "nbformat": 4, "nbformat_minor": 5}"#)
            .unwrap();
        assert_eq!(nb.file_extension(), None);
        assert_eq!(nb.language(), None);
    }

    #[test]
    fn test_unknown_metadata_round_trips() {
        let nb = Notebook::parse(SIMPLE).unwrap();
        let json = nb.to_json().unwrap();
        let again = Notebook::parse(&json).unwrap();
        assert_eq!(again.cells.len(), 2);
        assert_eq!(again.file_extension(), Some(".py"));
        // The non-typed cell fields (outputs, execution_count) survive.
        assert!(again.cells[1].extra.contains_key("outputs"));
    }

    #[test]
    fn test_malformed_notebook_is_an_error() {
        assert!(Notebook::parse("not json").is_err());
        assert!(Notebook::parse(r#"{"cells": [{"cell_type": "mystery"}]}"#).is_err());
    }
}
