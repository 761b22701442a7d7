//! The post-save extension point.
//!
//! Hooks run synchronously on the save path: a save does not complete until
//! every registered hook has returned, and a hook error becomes the save's
//! error. There is no retry and no recovery here; whatever invoked the save
//! is responsible for surfacing the failure.

use crate::manager::FileContentsManager;
use crate::model::ContentsModel;
use std::path::Path;

/// Error returned by a post-save hook.
///
/// Hooks live in other crates with their own error enums; this wraps
/// whatever they produce so the store can report it with the hook's name
/// attached.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct HookError(Box<dyn std::error::Error + Send + Sync>);

impl HookError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        HookError(source.into())
    }
}

/// A callback invoked after a model has been written to disk.
///
/// Registered against [`FileContentsManager::register_post_save_hook`] at
/// startup; invoked with the saved model, the absolute on-disk path of the
/// written file, and the owning manager (for root-directory resolution and
/// API-path display).
pub trait PostSaveHook: Send + Sync {
    /// Stable name used in registration logs and error reporting.
    fn name(&self) -> &'static str;

    /// Called once per successful save, before the save returns.
    fn on_save(
        &self,
        model: &ContentsModel,
        os_path: &Path,
        manager: &FileContentsManager,
    ) -> Result<(), HookError>;
}
