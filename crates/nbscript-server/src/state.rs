//! Application state shared across handlers.

use std::sync::Arc;

use nbscript_store::FileContentsManager;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// This is cloneable and can be extracted in handlers using `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Contents manager serving the root directory.
    manager: Arc<FileContentsManager>,
    /// Server configuration.
    config: Arc<ServerConfig>,
}

impl AppState {
    /// Create new application state.
    ///
    /// The manager arrives fully wired: any post-save hooks were registered
    /// before this point, while it was still exclusively owned.
    pub fn new(manager: FileContentsManager, config: ServerConfig) -> Self {
        Self {
            manager: Arc::new(manager),
            config: Arc::new(config),
        }
    }

    /// Get a reference to the contents manager.
    pub fn manager(&self) -> &Arc<FileContentsManager> {
        &self.manager
    }

    /// Get a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
