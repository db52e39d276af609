mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod report;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info, warn};

fn main() {
    match run_app() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(2);
        }
    }
}

fn run_app() -> Result<bool> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!(
        "🚀 caspol-check v{} starting up.",
        env!("CARGO_PKG_VERSION")
    );
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let command_result = match cli.command {
        Commands::Asymptotic(args) => {
            info!("Dispatching to 'asymptotic' command.");
            commands::asymptotic::run(args)
        }
        Commands::Regression(args) => {
            info!("Dispatching to 'regression' command.");
            commands::regression::run(args)
        }
        Commands::Equivalence(args) => {
            info!("Dispatching to 'equivalence' command.");
            commands::equivalence::run(args)
        }
        Commands::Suite(args) => {
            info!("Dispatching to 'suite' command.");
            commands::suite::run(args)
        }
        Commands::Models => return commands::models::run(),
    };

    match &command_result {
        Ok(true) => {
            info!("✅ All checks passed.");
            println!("✅ All checks passed.");
        }
        Ok(false) => {
            warn!("❌ Some checks failed.");
            println!("❌ Some checks failed.");
        }
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
