//! Content models exchanged with the contents manager.
//!
//! A [`ContentsModel`] is the manager's view of one entry: its type tag,
//! API path, optional content, and last-modified time. The same shape is
//! used for request bodies and responses on the HTTP surface.

use chrono::{DateTime, Utc};
use nbscript_core::{ApiPath, Notebook};
use serde::{Deserialize, Serialize};

/// The kind of a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Notebook,
    File,
    Directory,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Notebook => "notebook",
            ContentType::File => "file",
            ContentType::Directory => "directory",
        }
    }
}

/// Content carried by a model, shaped by its [`ContentType`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// A parsed notebook document (`type = notebook`).
    Notebook(Notebook),
    /// Plain text (`type = file`).
    Text(String),
    /// Child entries without their own content (`type = directory`).
    Listing(Vec<ContentsModel>),
}

/// One entry as seen through the contents manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentsModel {
    /// Entry kind. Serialized as `type` to match the wire format.
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// API-relative path of the entry.
    pub path: ApiPath,
    /// Final path component.
    pub name: String,
    /// Content; omitted in directory listings of children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// Modification time reported by the filesystem.
    pub last_modified: DateTime<Utc>,
}

impl ContentsModel {
    /// Build a model for saving: path plus content to write.
    pub fn for_save(content_type: ContentType, path: ApiPath, content: Content) -> Self {
        let name = path.name().to_string();
        Self {
            content_type,
            path,
            name,
            content: Some(content),
            last_modified: Utc::now(),
        }
    }

    pub fn is_notebook(&self) -> bool {
        self.content_type == ContentType::Notebook
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_serialization() {
        let model = ContentsModel::for_save(
            ContentType::File,
            ApiPath::new("notes.txt").unwrap(),
            Content::Text("hello".to_string()),
        );
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["path"], "notes.txt");
        assert_eq!(json["name"], "notes.txt");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn test_notebook_content_deserializes_as_notebook() {
        let json = r#"{
            "type": "notebook",
            "path": "nb.ipynb",
            "name": "nb.ipynb",
            "content": {"cells": [], "metadata": {}, "nbformat": 4, "nbformat_minor": 5},
            "last_modified": "2026-01-01T00:00:00Z"
        }"#;
        let model: ContentsModel = serde_json::from_str(json).unwrap();
        assert!(model.is_notebook());
        assert!(matches!(model.content, Some(Content::Notebook(_))));
    }
}
