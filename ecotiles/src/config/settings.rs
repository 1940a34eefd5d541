//! Settings structs, one per INI section.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::*;

/// Full configuration file contents.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub server: ServerSettings,
    pub tiles: TilesSettings,
    pub cache: CacheSettings,
    pub provider: ProviderSettings,
    pub logging: LoggingSettings,
}

/// `[server]`
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub bind: String,
}

/// `[tiles]`
#[derive(Debug, Clone, PartialEq)]
pub struct TilesSettings {
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub geocell_precision: usize,
    pub url_ttl_hours: i64,
    pub default_dataset: String,
}

/// Cache store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Disk,
    Valkey,
}

/// Accepted `[cache] provider` values, for error messages.
pub(super) const CACHE_BACKEND_CHOICES: &str = "must be 'memory', 'disk' or 'valkey'";

impl CacheBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheBackend::Memory => "memory",
            CacheBackend::Disk => "disk",
            CacheBackend::Valkey => "valkey",
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackend::Memory),
            "disk" => Ok(CacheBackend::Disk),
            "valkey" | "redis" => Ok(CacheBackend::Valkey),
            _ => Err(()),
        }
    }
}

/// `[cache]`
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    pub provider: CacheBackend,
    pub directory: PathBuf,
    pub memory_size: usize,
    pub url: String,
}

/// `[provider]`
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub project: Option<String>,
    pub base_url: String,
    pub access_token: Option<String>,
    pub timeout: u64,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                bind: DEFAULT_BIND.to_string(),
            },
            tiles: TilesSettings {
                min_zoom: DEFAULT_MIN_ZOOM,
                max_zoom: DEFAULT_MAX_ZOOM,
                geocell_precision: DEFAULT_GEOCELL_PRECISION,
                url_ttl_hours: DEFAULT_URL_TTL_HOURS,
                default_dataset: DEFAULT_DATASET.to_string(),
            },
            cache: CacheSettings {
                provider: CacheBackend::Memory,
                directory: default_cache_directory(),
                memory_size: DEFAULT_MEMORY_CACHE_SIZE,
                url: DEFAULT_VALKEY_URL.to_string(),
            },
            provider: ProviderSettings {
                project: None,
                base_url: DEFAULT_BASE_URL.to_string(),
                access_token: None,
                timeout: DEFAULT_TIMEOUT_SECS,
            },
            logging: LoggingSettings {
                directory: PathBuf::from(DEFAULT_LOG_DIRECTORY),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}
