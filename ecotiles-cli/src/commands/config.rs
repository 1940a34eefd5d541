//! `ecotiles config` - inspect and initialize the configuration file.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use ecotiles::config::{config_file_path, ConfigFile};

use super::load_config;
use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as INI
    Show,

    /// Show the configuration file path
    Path,

    /// Write a default configuration file if none exists
    Init,
}

pub fn run(config_path: Option<PathBuf>, command: ConfigCommands) -> Result<(), CliError> {
    let path = config_path.unwrap_or_else(config_file_path);
    match command {
        ConfigCommands::Show => run_show(&path),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Init => run_init(&path),
    }
}

fn run_show(path: &Path) -> Result<(), CliError> {
    let mut config = load_config(Some(path))?;
    if config.provider.access_token.is_some() {
        config.provider.access_token = Some("********".to_string());
    }
    print!("{}", config.to_config_string());
    Ok(())
}

fn run_init(path: &Path) -> Result<(), CliError> {
    if path.exists() {
        println!("Config file already exists: {}", path.display());
        return Ok(());
    }
    ConfigFile::default()
        .save_to(path)
        .map_err(|e| CliError::FileWrite {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
