mod cli;
mod error;
mod fetch;
mod html;
mod matchup;
mod page;
mod settings;
mod store;
mod view;
mod watch;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use cli::Commands;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::View(args) => view::view(args),
        Commands::Matchup(args) => matchup::matchup(args),
        Commands::Settings(args) => settings::settings(args),
        Commands::Fetch(args) => fetch::fetch(args),
    }
}
