//! Command-line interface for nbscript.
//!
//! Two commands:
//! - serve: run the contents server from a config file
//! - convert: one-shot notebook-to-script export, the same transformation
//!   the server's post-save hook performs

mod commands;

use clap::{Parser, Subcommand};

use commands::{convert::ConvertArgs, serve::ServeArgs};

/// Notebook contents server and script exporter
#[derive(Parser)]
#[command(name = "nbscript")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the contents server
    Serve(ServeArgs),
    /// Convert a notebook file to a script
    Convert(ConvertArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args).await,
        Commands::Convert(args) => commands::convert::run(args),
    }
}
