//! Configuration for the EcoTiles server.
//!
//! Values come from `~/.ecotiles/config.ini` (or an explicit path), fall back
//! to the defaults in [`defaults`], and can be overridden by `ECOTILES_*`
//! environment variables.
//!
//! # Example
//!
//! ```
//! use ecotiles::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.tiles.min_zoom, 10);
//! assert_eq!(config.tiles.max_zoom, 18);
//! ```

pub mod defaults;
mod env;
mod file;
mod parser;
mod settings;
mod size;
mod writer;

pub use env::{
    ENV_ACCESS_TOKEN, ENV_BIND, ENV_CACHE_PROVIDER, ENV_CACHE_URL, ENV_PROJECT,
    ENV_URL_TTL_HOURS,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    CacheBackend, CacheSettings, ConfigFile, LoggingSettings, ProviderSettings, ServerSettings,
    TilesSettings,
};
pub use size::{format_size, parse_size, SizeParseError};
