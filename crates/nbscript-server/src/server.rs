//! Startup wiring and the server lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use nbscript_export::{ScriptExportHook, ScriptExporter};
use nbscript_store::{FileContentsManager, StoreError};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{ConfigError, ServerConfig};
use crate::routes;
use crate::state::AppState;

/// Errors that can stop the server from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration rejected.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Running with an effective uid of 0 without server.allow_root.
    #[error("refusing to run as root; set server.allow_root = true to override")]
    RootRefused,

    /// Contents manager could not open the root directory.
    #[error("contents error: {0}")]
    Store(#[from] StoreError),

    /// Could not bind the configured address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while serving.
    #[error("server i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// A bound, fully wired server that has not started serving yet.
///
/// Splitting bind from serve lets callers learn the actual listen address
/// (port 0 binds an ephemeral port) before requests flow.
pub struct Server {
    listener: TcpListener,
    app: Router,
    local_addr: SocketAddr,
}

impl Server {
    /// Wire up and bind a server from its configuration.
    ///
    /// This performs the root-privilege check, opens the contents manager,
    /// constructs the script exporter once and registers the export hook
    /// when `export.script_on_save` is set, and binds the listener.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        if running_as_root() && !config.allow_root {
            return Err(ServerError::RootRefused);
        }

        let mut manager = FileContentsManager::new(&config.root_dir)?;
        if config.script_on_save {
            let exporter = Arc::new(ScriptExporter::new());
            manager.register_post_save_hook(Arc::new(ScriptExportHook::new(exporter)));
        }

        let addr = config.socket_addr()?;
        let state = AppState::new(manager, config);
        let app = routes::build_router(state)
            .layer(cors_layer())
            .layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            app,
            local_addr,
        })
    }

    /// The address actually bound.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn serve(self) -> Result<(), ServerError> {
        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

/// Initialize the tracing subscriber.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Launch the system browser at the served URL. Failures are logged, not
/// fatal.
pub fn launch_browser(addr: &SocketAddr) {
    let host = if addr.ip().is_unspecified() {
        "127.0.0.1".to_string()
    } else if addr.is_ipv6() {
        format!("[{}]", addr.ip())
    } else {
        addr.ip().to_string()
    };
    let url = format!("http://{host}:{}", addr.port());
    if let Err(e) = webbrowser::open(&url) {
        tracing::warn!(url = %url, error = %e, "failed to open browser");
    }
}

#[cfg(unix)]
fn running_as_root() -> bool {
    // Effective uid, so a setuid-dropped process is not refused.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn running_as_root() -> bool {
    false
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
