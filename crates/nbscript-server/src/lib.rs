//! nbscript-server: HTTP contents server for nbscript
//!
//! This crate provides:
//! - Configuration loading from a dotted-key config file
//! - The contents API (GET/PUT/DELETE under `/api/contents`)
//! - Startup wiring: root-privilege check, post-save hook registration,
//!   browser launch, graceful shutdown
//!
//! # Architecture
//!
//! The server is built on Axum over a [`FileContentsManager`]. All wiring
//! happens in [`server::Server::bind`]: the script exporter is constructed
//! exactly once there and registered as a post-save hook when
//! `export.script_on_save` is set, before the manager is shared with the
//! router.
//!
//! # Usage
//!
//! ```rust,ignore
//! use nbscript_server::{config::ServerConfig, server::Server};
//!
//! let config = ServerConfig::load(Path::new("nbscript.conf"))?;
//! let server = Server::bind(config).await?;
//! server.serve().await?;
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

// Re-exports for convenience
pub use config::{ConfigError, Options, Scalar, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use server::{init_tracing, launch_browser, Server, ServerError};
pub use state::AppState;

// Re-export dependent crates
pub use nbscript_export;
pub use nbscript_store;
