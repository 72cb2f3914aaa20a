//! nfdocs CLI: API documentation for Nextflow pipelines.
//!
//! Extracts `///` YAML annotation blocks from `.nf` sources and renders them
//! as reStructuredText, Markdown, or JSON.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
