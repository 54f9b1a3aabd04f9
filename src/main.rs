// ABOUTME: Entry point for the fit binary.
// ABOUTME: Loads settings, initializes tracing on stderr, and runs one command against the database file.

mod cli;
mod commands;
mod render;
mod settings;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;
use crate::settings::Settings;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fit=info,fit_store=info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?.with_overrides(cli.file, cli.output_version);
    tracing::debug!("using database {}", settings.file.display());

    let stdout = std::io::stdout();
    commands::run(cli.command, &settings, &mut stdout.lock())
}
