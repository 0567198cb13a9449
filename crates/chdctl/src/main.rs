//! CHD Control - terminal client for CHD risk assessment

use chdctl::cli::{Cli, Commands};
use chdctl::errors::{exit_code_for, EXIT_SUCCESS};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // The full-screen form owns the terminal, so it gets no log output
    if !Commands::is_interactive(cli.command.as_ref()) {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match chdctl::commands::run(cli) {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(exit_code_for(&e));
        }
    }
}
