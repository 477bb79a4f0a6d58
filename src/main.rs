//! pdfstitch - Reorder PDF files and merge them into a single document.

use clap::Parser;
use std::process;

use pdfstitch::cli::Cli;
use pdfstitch::error::PdfStitchError;
use pdfstitch::logging::init_tracing;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), PdfStitchError> {
    let inputs = cli.get_all_inputs().await?;

    let mut config = cli.to_config()?;
    config.inputs = inputs;

    pdfstitch::run(config).await
}
