//! The convert command: one-shot notebook-to-script export.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use nbscript_export::ScriptExporter;

#[derive(Args)]
pub struct ConvertArgs {
    /// Notebook file to convert
    notebook: PathBuf,

    /// Output path; defaults to the notebook path with the exporter's
    /// extension
    #[arg(long)]
    output: Option<PathBuf>,
}

pub fn run(args: ConvertArgs) -> anyhow::Result<()> {
    let exporter = ScriptExporter::new();
    let (source, meta) = exporter
        .export_file(&args.notebook)
        .with_context(|| format!("converting {}", args.notebook.display()))?;

    let output = args
        .output
        .unwrap_or_else(|| args.notebook.with_extension(&meta.file_extension));
    fs::write(&output, source).with_context(|| format!("writing {}", output.display()))?;

    let language = meta.language.as_deref().unwrap_or("unknown language");
    println!(
        "{} {} -> {} ({language})",
        "converted".green().bold(),
        args.notebook.display(),
        output.display()
    );
    Ok(())
}
