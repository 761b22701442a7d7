//! The serve command: run the contents server from a config file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use nbscript_server::config::ServerConfig;
use nbscript_server::server::{init_tracing, launch_browser, Server};

#[derive(Args)]
pub struct ServeArgs {
    /// Path to the config file
    #[arg(long, default_value = "nbscript.conf")]
    config: PathBuf,
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let config = ServerConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    init_tracing(&config.log_level);

    let open_browser = config.open_browser;
    let server = Server::bind(config).await?;
    let addr = server.local_addr();
    println!("{} listening on http://{addr}", "nbscript".green().bold());

    if open_browser {
        launch_browser(&addr);
    }

    server.serve().await?;
    Ok(())
}
