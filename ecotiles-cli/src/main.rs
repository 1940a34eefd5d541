//! EcoTiles CLI - Command-line interface
//!
//! `ecotiles serve` runs the tile server; the other commands inspect the
//! configuration and the geocell bucketing.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::geocell::GeocellArgs;
use commands::serve::ServeArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "ecotiles")]
#[command(version = ecotiles::VERSION)]
#[command(about = "XYZ tile server for Earth Engine imagery", long_about = None)]
struct Cli {
    /// Path to config.ini (defaults to ~/.ecotiles/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tile server
    Serve(ServeArgs),

    /// Show the geocell and cache keys for a tile
    Geocell(GeocellArgs),

    /// Inspect or initialize the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Serve(args) => commands::serve::run(cli.config, args).await,
        Commands::Geocell(args) => {
            let config = commands::load_config(cli.config.as_deref())?;
            commands::geocell::run(&config, args)
        }
        Commands::Config(command) => commands::config::run(cli.config, command),
    }
}
