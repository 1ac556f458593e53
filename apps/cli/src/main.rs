//! padexport CLI: export pad documents to HTML, Markdown, or Word.
//!
//! Reads the editor's JSON document tree, inlines attached media, and
//! writes the exported artifact to a file or stdout.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
