//! Entry point for the nbscript-server binary.

use std::path::PathBuf;

use nbscript_server::config::ServerConfig;
use nbscript_server::server::{init_tracing, launch_browser, Server};

/// Config file used when none is named on the command line.
const DEFAULT_CONFIG_FILE: &str = "nbscript.conf";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let config = ServerConfig::load(&config_path)?;
    init_tracing(&config.log_level);

    tracing::info!(config = %config_path.display(), "starting nbscript-server");
    tracing::info!(
        ip = %config.ip,
        port = config.port,
        root_dir = %config.root_dir.display(),
        script_on_save = config.script_on_save,
        "configuration loaded"
    );

    let open_browser = config.open_browser;
    let server = Server::bind(config).await?;
    let addr = server.local_addr();
    tracing::info!("listening on {addr}");

    if open_browser {
        launch_browser(&addr);
    }

    server.serve().await?;
    tracing::info!("server shutdown complete");
    Ok(())
}
