//! Filesystem-backed contents manager.

use crate::error::{StoreError, StoreResult};
use crate::hook::PostSaveHook;
use crate::model::{Content, ContentType, ContentsModel};
use chrono::{DateTime, Utc};
use nbscript_core::{ApiPath, Notebook};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// File extension that marks a document as a notebook.
const NOTEBOOK_EXTENSION: &str = "ipynb";

/// Manages documents under a single root directory.
///
/// Hooks are registered before the manager is shared (registration takes
/// `&mut self`); after that the manager is read-only apart from the
/// per-path lock table.
pub struct FileContentsManager {
    root_dir: PathBuf,
    hooks: Vec<Arc<dyn PostSaveHook>>,
    path_locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl FileContentsManager {
    /// Open a manager over `root_dir`. The directory must exist.
    pub fn new(root_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let root_dir = root_dir.into();
        let root_dir = root_dir
            .canonicalize()
            .map_err(|e| StoreError::io(root_dir.display(), e))?;
        if !root_dir.is_dir() {
            return Err(StoreError::WrongKind {
                path: root_dir.display().to_string(),
                expected: "directory",
            });
        }
        Ok(Self {
            root_dir,
            hooks: Vec::new(),
            path_locks: Mutex::new(HashMap::new()),
        })
    }

    /// The absolute serving root.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Register a post-save hook. Hooks run in registration order.
    pub fn register_post_save_hook(&mut self, hook: Arc<dyn PostSaveHook>) {
        tracing::info!(hook = hook.name(), "registered post-save hook");
        self.hooks.push(hook);
    }

    /// Convert an absolute on-disk path back to its API path, for display.
    pub fn api_path(&self, os_path: &Path) -> StoreResult<ApiPath> {
        Ok(ApiPath::from_os_path(os_path, &self.root_dir)?)
    }

    /// Read the entry at `path`.
    ///
    /// Directories come back as listings of child models without content;
    /// `.ipynb` files are parsed as notebooks; everything else is read as
    /// UTF-8 text.
    pub fn get(&self, path: &ApiPath) -> StoreResult<ContentsModel> {
        let os_path = path.to_os_path(&self.root_dir);
        let meta = self.stat(path, &os_path)?;
        if meta.is_dir() {
            return self.list_dir(path, &os_path, &meta);
        }
        let text = fs::read_to_string(&os_path).map_err(|e| StoreError::io(path, e))?;
        let (content_type, content) = if is_notebook_path(&os_path) {
            let notebook =
                Notebook::parse(&text).map_err(|e| StoreError::MalformedNotebook {
                    path: path.to_string(),
                    source: e,
                })?;
            (ContentType::Notebook, Content::Notebook(notebook))
        } else {
            (ContentType::File, Content::Text(text))
        };
        Ok(ContentsModel {
            content_type,
            path: path.clone(),
            name: path.name().to_string(),
            content: Some(content),
            last_modified: modified_time(&meta),
        })
    }

    /// Write a model to disk, then run the post-save hooks.
    ///
    /// The write and the hooks execute under a per-path lock, so two saves
    /// of the same document cannot interleave. A hook error is returned as
    /// the save's error; the write itself has already reached disk.
    ///
    /// Returns the saved model without content.
    pub fn save(&self, model: &ContentsModel) -> StoreResult<ContentsModel> {
        let os_path = model.path.to_os_path(&self.root_dir);
        let lock = self.path_lock(&os_path);
        let result = {
            let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
            self.save_locked(model, &os_path)
        };
        drop(lock);
        self.release_path_lock(&os_path);
        result
    }

    fn save_locked(&self, model: &ContentsModel, os_path: &Path) -> StoreResult<ContentsModel> {
        self.write_model(model, os_path)?;
        let meta = self.stat(&model.path, os_path)?;
        let saved = ContentsModel {
            content_type: model.content_type,
            path: model.path.clone(),
            name: model.path.name().to_string(),
            content: None,
            last_modified: modified_time(&meta),
        };
        tracing::debug!(path = %model.path, kind = model.content_type.as_str(), "saved");

        for hook in &self.hooks {
            hook.on_save(&saved, os_path, self)
                .map_err(|source| StoreError::Hook {
                    name: hook.name().to_string(),
                    source,
                })?;
        }
        Ok(saved)
    }

    /// Remove the entry at `path`. Directories are removed recursively.
    pub fn delete(&self, path: &ApiPath) -> StoreResult<()> {
        let os_path = path.to_os_path(&self.root_dir);
        let meta = self.stat(path, &os_path)?;
        let result = if meta.is_dir() {
            fs::remove_dir_all(&os_path)
        } else {
            fs::remove_file(&os_path)
        };
        result.map_err(|e| StoreError::io(path, e))?;
        tracing::debug!(path = %path, "deleted");
        Ok(())
    }

    fn write_model(&self, model: &ContentsModel, os_path: &Path) -> StoreResult<()> {
        if model.content_type == ContentType::Directory {
            return fs::create_dir_all(os_path).map_err(|e| StoreError::io(&model.path, e));
        }
        let content = model.content.as_ref().ok_or_else(|| StoreError::InvalidContent {
            path: model.path.to_string(),
            reason: "save requires content".to_string(),
        })?;
        let text = match (model.content_type, content) {
            (ContentType::Notebook, Content::Notebook(nb)) => {
                nb.to_json().map_err(|e| StoreError::MalformedNotebook {
                    path: model.path.to_string(),
                    source: e,
                })?
            }
            (ContentType::File, Content::Text(text)) => text.clone(),
            _ => {
                return Err(StoreError::InvalidContent {
                    path: model.path.to_string(),
                    reason: format!(
                        "content does not match declared type '{}'",
                        model.content_type.as_str()
                    ),
                });
            }
        };
        if let Some(parent) = os_path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(&model.path, e))?;
        }
        fs::write(os_path, text).map_err(|e| StoreError::io(&model.path, e))
    }

    fn list_dir(
        &self,
        path: &ApiPath,
        os_path: &Path,
        meta: &fs::Metadata,
    ) -> StoreResult<ContentsModel> {
        let mut children = Vec::new();
        let entries = fs::read_dir(os_path).map_err(|e| StoreError::io(path, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(path, e))?;
            let child_os = entry.path();
            let child_path = self.api_path(&child_os)?;
            let child_meta = entry.metadata().map_err(|e| StoreError::io(&child_path, e))?;
            let content_type = if child_meta.is_dir() {
                ContentType::Directory
            } else if is_notebook_path(&child_os) {
                ContentType::Notebook
            } else {
                ContentType::File
            };
            children.push(ContentsModel {
                content_type,
                name: child_path.name().to_string(),
                path: child_path,
                content: None,
                last_modified: modified_time(&child_meta),
            });
        }
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ContentsModel {
            content_type: ContentType::Directory,
            path: path.clone(),
            name: path.name().to_string(),
            content: Some(Content::Listing(children)),
            last_modified: modified_time(meta),
        })
    }

    fn stat(&self, path: &ApiPath, os_path: &Path) -> StoreResult<fs::Metadata> {
        fs::metadata(os_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(path.to_string())
            } else {
                StoreError::io(path, e)
            }
        })
    }

    fn path_lock(&self, os_path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.path_locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .entry(os_path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop a path's lock entry once no saver holds it any more.
    ///
    /// Callers must have dropped their own clone first. The table mutex
    /// covers both the count check and the removal, and `path_lock` clones
    /// under the same mutex, so an entry with a strong count of 1 cannot
    /// gain a holder while it is being removed.
    fn release_path_lock(&self, os_path: &Path) {
        let mut locks = self.path_locks.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = locks.get(os_path) {
            if Arc::strong_count(entry) == 1 {
                locks.remove(os_path);
            }
        }
    }
}

impl std::fmt::Debug for FileContentsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileContentsManager")
            .field("root_dir", &self.root_dir)
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}

fn is_notebook_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(NOTEBOOK_EXTENSION))
}

fn modified_time(meta: &fs::Metadata) -> DateTime<Utc> {
    meta.modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}
