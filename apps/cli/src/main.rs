//! cinfinder CLI: look up Indian companies by name or CIN.
//!
//! Searches a public CIN finder by company name and resolves a CIN to a
//! structured company profile, from the command line or over HTTP.

mod commands;
mod server;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
