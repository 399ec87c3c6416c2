//! CLI for acdl.

mod commands;

use anyhow::Result;
use clap::Parser;

use commands::run_download;

/// Download the PDFs behind academia.edu document pages into the current directory.
#[derive(Debug, Parser)]
#[command(name = "acdl", version)]
#[command(about = "acdl: download PDFs from academia.edu document pages", long_about = None)]
pub struct Cli {
    /// Document page URLs (https://www.academia.edu/<id>/<title>).
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        run_download(cli.urls).await
    }
}
