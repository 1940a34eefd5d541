//! Default configuration values.

use std::path::PathBuf;

pub use crate::provider::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use crate::resolver::{
    DEFAULT_GEOCELL_PRECISION, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_URL_TTL_HOURS,
    MAX_URL_TTL_HOURS,
};

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_DATASET: &str = crate::dataset::OPEN_BUILDINGS_ID;
pub const DEFAULT_MEMORY_CACHE_SIZE: usize = 512 * 1024 * 1024;
pub const DEFAULT_VALKEY_URL: &str = "redis://valkey:6379";
pub const DEFAULT_LOG_DIRECTORY: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "ecotiles.log";

/// Get the default disk cache directory (platform cache dir + `ecotiles`).
pub fn default_cache_directory() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("ecotiles")
}
