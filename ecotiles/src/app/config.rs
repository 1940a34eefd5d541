//! Application configuration for `EcoTilesApp`.
//!
//! `AppConfig` gathers everything needed to bootstrap the server: the cache
//! store, the resolver settings, the dataset and the upstream credentials.

use chrono::Duration;

use super::error::AppError;
use crate::cache::ServiceCacheConfig;
use crate::config::{CacheBackend, ConfigFile};
use crate::dataset::DatasetSpec;
use crate::provider::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::resolver::{ResolverConfig, MAX_URL_TTL_HOURS};

/// Earth Engine connection settings.
#[derive(Clone, Debug, PartialEq)]
pub struct EarthEngineConfig {
    pub project: String,
    pub access_token: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl EarthEngineConfig {
    pub fn new(project: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Application configuration combining all component configs.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind: String,

    /// Backing store shared by both cache tiers.
    pub cache: ServiceCacheConfig,

    pub resolver: ResolverConfig,

    pub dataset: DatasetSpec,

    pub earth_engine: EarthEngineConfig,
}

impl AppConfig {
    /// Create a config with default settings and the given credentials.
    pub fn new(earth_engine: EarthEngineConfig) -> Self {
        let defaults = ConfigFile::default();
        Self {
            bind: defaults.server.bind,
            cache: ServiceCacheConfig::memory(defaults.cache.memory_size as u64),
            resolver: ResolverConfig::default(),
            dataset: DatasetSpec::open_buildings(),
            earth_engine,
        }
    }

    /// Build from a loaded configuration file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when the Earth Engine project or access
    /// token is missing, the dataset id is unknown, or the URL lifetime is out
    /// of range.
    pub fn from_config_file(file: &ConfigFile) -> Result<Self, AppError> {
        let project = file.provider.project.clone().ok_or_else(|| {
            AppError::Config(
                "provider.project is not set (config file or ECOTILES_PROJECT)".to_string(),
            )
        })?;
        let access_token = file.provider.access_token.clone().ok_or_else(|| {
            AppError::Config(
                "provider.access_token is not set (config file or ECOTILES_ACCESS_TOKEN)"
                    .to_string(),
            )
        })?;
        let dataset = DatasetSpec::by_id(&file.tiles.default_dataset).ok_or_else(|| {
            AppError::Config(format!("unknown dataset '{}'", file.tiles.default_dataset))
        })?;

        let cache = match file.cache.provider {
            CacheBackend::Memory => ServiceCacheConfig::memory(file.cache.memory_size as u64),
            CacheBackend::Disk => ServiceCacheConfig::disk(file.cache.directory.clone()),
            CacheBackend::Valkey => ServiceCacheConfig::valkey(file.cache.url.clone()),
        };

        let url_ttl = Some(file.tiles.url_ttl_hours)
            .filter(|hours| (1..=MAX_URL_TTL_HOURS).contains(hours))
            .and_then(Duration::try_hours)
            .ok_or_else(|| {
                AppError::Config(format!(
                    "tiles.url_ttl_hours = {} is outside 1..={}",
                    file.tiles.url_ttl_hours, MAX_URL_TTL_HOURS
                ))
            })?;

        let resolver = ResolverConfig::default()
            .with_zoom_range(file.tiles.min_zoom, file.tiles.max_zoom)
            .with_geocell_precision(file.tiles.geocell_precision)
            .with_url_ttl(url_ttl);

        Ok(Self {
            bind: file.server.bind.clone(),
            cache,
            resolver,
            dataset,
            earth_engine: EarthEngineConfig {
                project,
                access_token,
                base_url: file.provider.base_url.clone(),
                timeout_secs: file.provider.timeout,
            },
        })
    }

    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    pub fn with_cache(mut self, cache: ServiceCacheConfig) -> Self {
        self.cache = cache;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentialed() -> ConfigFile {
        let mut file = ConfigFile::default();
        file.provider.project = Some("eco".to_string());
        file.provider.access_token = Some("token".to_string());
        file
    }

    #[test]
    fn test_from_config_file() {
        let mut file = credentialed();
        file.tiles.min_zoom = 12;
        file.tiles.url_ttl_hours = 3;
        file.cache.provider = CacheBackend::Disk;
        file.cache.directory = "/tmp/ecotiles-cache".into();

        let config = AppConfig::from_config_file(&file).unwrap();

        assert_eq!(config.resolver.min_zoom, 12);
        assert_eq!(config.resolver.url_ttl, Duration::hours(3));
        assert_eq!(config.earth_engine.project, "eco");
        assert_eq!(config.dataset.id, "open_buildings");
        assert!(matches!(config.cache, ServiceCacheConfig::Disk { .. }));
    }

    #[test]
    fn test_valkey_backend_uses_cache_url() {
        let mut file = credentialed();
        file.cache.provider = CacheBackend::Valkey;
        file.cache.url = "redis://127.0.0.1:6379".to_string();

        let config = AppConfig::from_config_file(&file).unwrap();
        assert_eq!(
            config.cache,
            ServiceCacheConfig::valkey("redis://127.0.0.1:6379")
        );
    }

    #[test]
    fn test_missing_project_is_config_error() {
        let mut file = credentialed();
        file.provider.project = None;
        let err = AppConfig::from_config_file(&file).unwrap_err();
        assert!(matches!(err, AppError::Config(ref msg) if msg.contains("provider.project")));
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let mut file = credentialed();
        file.provider.access_token = None;
        let err = AppConfig::from_config_file(&file).unwrap_err();
        assert!(matches!(err, AppError::Config(ref msg) if msg.contains("access_token")));
    }

    #[test]
    fn test_oversized_url_ttl_is_config_error() {
        let mut file = credentialed();
        file.tiles.url_ttl_hours = 9_000_000_000_000_000;
        let err = AppConfig::from_config_file(&file).unwrap_err();
        assert!(matches!(err, AppError::Config(ref msg) if msg.contains("url_ttl_hours")));
    }

    #[test]
    fn test_builders() {
        let config = AppConfig::new(EarthEngineConfig::new("p", "t"))
            .with_bind("127.0.0.1:0")
            .with_cache(ServiceCacheConfig::memory(1024));
        assert_eq!(config.bind, "127.0.0.1:0");
        assert!(matches!(
            config.cache,
            ServiceCacheConfig::Memory { max_size_bytes: 1024 }
        ));
    }
}
