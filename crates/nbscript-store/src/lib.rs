//! nbscript-store: Contents management for nbscript
//!
//! This crate provides:
//! - Filesystem-backed storage for notebooks and plain files
//! - Directory listing with typed content models
//! - A post-save extension point invoked after every successful write
//!
//! # Architecture
//!
//! Documents live under a single root directory and are addressed by
//! API-relative paths. Hooks implement [`PostSaveHook`] and are registered
//! against the manager at startup; the manager invokes them synchronously,
//! in registration order, after a save reaches disk. Saves to the same path
//! are serialized with a per-path lock held across the write and the hooks,
//! so a hook's derived output never interleaves with a concurrent save of
//! the same document.
//!
//! # Usage
//!
//! ```rust,ignore
//! use nbscript_store::{ContentsModel, FileContentsManager};
//!
//! let mut manager = FileContentsManager::new("/srv/notebooks")?;
//! manager.register_post_save_hook(Arc::new(my_hook));
//! manager.save(&model)?;
//! ```

pub mod error;
pub mod hook;
pub mod manager;
pub mod model;

pub use error::{StoreError, StoreResult};
pub use hook::{HookError, PostSaveHook};
pub use manager::FileContentsManager;
pub use model::{Content, ContentType, ContentsModel};

// Re-export nbscript-core for downstream crates
pub use nbscript_core;
