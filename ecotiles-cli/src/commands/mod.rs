//! CLI command implementations.

pub mod config;
pub mod geocell;
pub mod serve;

use std::path::Path;

use ecotiles::config::ConfigFile;

use crate::error::CliError;

/// Load the config file (explicit path or default) with environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    Ok(ConfigFile::load_with_env(path)?)
}
