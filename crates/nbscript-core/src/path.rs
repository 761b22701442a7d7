//! API-relative paths.
//!
//! The contents layer addresses documents with `/`-separated paths relative
//! to the serving root. These are what appears in request URLs and log
//! lines; the absolute filesystem path is derived from them and never shown
//! to clients.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Errors from API path validation and conversion.
#[derive(Debug, Error)]
pub enum PathError {
    /// Path escapes the serving root via `..` or an absolute component.
    #[error("path escapes the serving root: {0}")]
    EscapesRoot(String),

    /// Filesystem path is not located under the serving root.
    #[error("path is not under the serving root: {0}")]
    NotUnderRoot(String),

    /// Path contains bytes that are not valid UTF-8.
    #[error("path is not valid UTF-8: {0}")]
    NonUtf8(String),
}

/// A validated path relative to the serving root.
///
/// Always `/`-separated, never absolute, never containing `.` or `..`
/// components. The empty path denotes the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiPath(String);

impl ApiPath {
    /// The serving root.
    pub fn root() -> Self {
        ApiPath(String::new())
    }

    /// Validate and normalize a client-supplied path.
    ///
    /// Leading and trailing slashes are stripped; `..` and rooted components
    /// are rejected rather than resolved.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PathError> {
        let raw = raw.as_ref();
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        for part in trimmed.split('/') {
            if part.is_empty() || part == "." || part == ".." {
                return Err(PathError::EscapesRoot(raw.to_string()));
            }
        }
        Ok(ApiPath(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The final path component, or the empty string for the root.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    /// Join the absolute on-disk location under `root`.
    pub fn to_os_path(&self, root: &Path) -> PathBuf {
        if self.is_root() {
            return root.to_path_buf();
        }
        let mut out = root.to_path_buf();
        for part in self.0.split('/') {
            out.push(part);
        }
        out
    }

    /// Derive the API path of an on-disk location under `root`.
    pub fn from_os_path(path: &Path, root: &Path) -> Result<Self, PathError> {
        let rel = path
            .strip_prefix(root)
            .map_err(|_| PathError::NotUnderRoot(path.display().to_string()))?;
        let mut parts = Vec::new();
        for component in rel.components() {
            match component {
                Component::Normal(part) => {
                    let part = part
                        .to_str()
                        .ok_or_else(|| PathError::NonUtf8(path.display().to_string()))?;
                    parts.push(part);
                }
                Component::CurDir => {}
                _ => return Err(PathError::NotUnderRoot(path.display().to_string())),
            }
        }
        Ok(ApiPath(parts.join("/")))
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ApiPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ApiPath::new(value)
    }
}

impl From<ApiPath> for String {
    fn from(path: ApiPath) -> Self {
        path.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_slashes() {
        assert_eq!(ApiPath::new("/a/b/").unwrap().as_str(), "a/b");
        assert_eq!(ApiPath::new("a/b").unwrap().as_str(), "a/b");
    }

    #[test]
    fn test_root_path() {
        assert!(ApiPath::new("").unwrap().is_root());
        assert!(ApiPath::new("/").unwrap().is_root());
    }

    #[test]
    fn test_rejects_traversal() {
        assert!(ApiPath::new("../etc/passwd").is_err());
        assert!(ApiPath::new("a/../../b").is_err());
        assert!(ApiPath::new("a//b").is_err());
    }

    #[test]
    fn test_os_path_round_trip() {
        let root = Path::new("/srv/notebooks");
        let api = ApiPath::new("sub/Notebook.ipynb").unwrap();
        let os = api.to_os_path(root);
        assert_eq!(os, Path::new("/srv/notebooks/sub/Notebook.ipynb"));
        assert_eq!(ApiPath::from_os_path(&os, root).unwrap(), api);
    }

    #[test]
    fn test_from_os_path_outside_root() {
        let root = Path::new("/srv/notebooks");
        assert!(ApiPath::from_os_path(Path::new("/etc/passwd"), root).is_err());
    }

    #[test]
    fn test_name() {
        assert_eq!(ApiPath::new("a/b/c.txt").unwrap().name(), "c.txt");
        assert_eq!(ApiPath::root().name(), "");
    }
}
