//! Cache service lifecycle management.
//!
//! `CacheService` owns the single store handle shared by both tiers. It is
//! created once at startup and shut down once at exit.
//!
//! # Usage
//!
//! ```ignore
//! use ecotiles::cache::{CacheService, ServiceCacheConfig};
//!
//! let service = CacheService::start(ServiceCacheConfig::memory(512 * 1024 * 1024)).await?;
//! service.cache().set("key", vec![1, 2, 3]).await?;
//! service.shutdown().await;
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::providers::{DiskCacheProvider, MemoryCacheProvider, ValkeyCacheProvider};
use crate::cache::traits::{Cache, ServiceCacheError};

/// Configuration for creating a cache service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCacheConfig {
    /// In-memory store using moka, bounded by a byte budget.
    Memory {
        /// Maximum size in bytes.
        max_size_bytes: u64,
    },

    /// One file per key under a directory.
    Disk {
        /// Directory for cache storage.
        directory: PathBuf,
    },

    /// Shared Valkey (or Redis) instance.
    Valkey {
        /// Connection URL, e.g. `redis://valkey:6379`.
        url: String,
    },
}

impl ServiceCacheConfig {
    /// Create a memory cache configuration.
    pub fn memory(max_size_bytes: u64) -> Self {
        Self::Memory { max_size_bytes }
    }

    /// Create a disk cache configuration.
    pub fn disk(directory: impl Into<PathBuf>) -> Self {
        Self::Disk {
            directory: directory.into(),
        }
    }

    /// Create a Valkey cache configuration.
    pub fn valkey(url: impl Into<String>) -> Self {
        Self::Valkey { url: url.into() }
    }
}

/// A running cache service that can be shut down.
pub struct CacheService {
    cache: Arc<dyn Cache>,
}

impl CacheService {
    /// Start a new cache service with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to start (e.g., disk directory
    /// cannot be created, or the Valkey server is unreachable).
    pub async fn start(config: ServiceCacheConfig) -> Result<Self, ServiceCacheError> {
        let cache: Arc<dyn Cache> = match config {
            ServiceCacheConfig::Memory { max_size_bytes } => {
                info!(max_bytes = max_size_bytes, "Memory cache service started");
                Arc::new(MemoryCacheProvider::new(max_size_bytes))
            }
            ServiceCacheConfig::Disk { directory } => {
                Arc::new(DiskCacheProvider::start(directory).await?)
            }
            ServiceCacheConfig::Valkey { url } => {
                Arc::new(ValkeyCacheProvider::connect(&url).await?)
            }
        };
        Ok(Self { cache })
    }

    /// Get a shared handle to the store.
    pub fn cache(&self) -> Arc<dyn Cache> {
        Arc::clone(&self.cache)
    }

    /// Provider name: `"memory"`, `"disk"` or `"valkey"`.
    pub fn kind(&self) -> &'static str {
        self.cache.name()
    }

    /// Shutdown the cache service gracefully.
    ///
    /// Consumes the service to prevent further use after shutdown.
    pub async fn shutdown(self) {
        if let Err(e) = self.cache.flush().await {
            warn!(error = %e, provider = self.kind(), "Cache flush on shutdown failed");
        }
        info!(
            provider = self.kind(),
            entries = self.cache.entry_count(),
            bytes = self.cache.size_bytes(),
            "Cache service shutdown complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_service_roundtrip() {
        let service = CacheService::start(ServiceCacheConfig::memory(1_000_000))
            .await
            .unwrap();
        assert_eq!(service.kind(), "memory");

        let cache = service.cache();
        cache.set("k", vec![9]).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(vec![9]));

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_disk_service_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("cache");

        let service = CacheService::start(ServiceCacheConfig::disk(&dir))
            .await
            .unwrap();
        assert_eq!(service.kind(), "disk");
        assert!(dir.is_dir());

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_valkey_service_reports_bad_url() {
        let result = CacheService::start(ServiceCacheConfig::valkey("not a url")).await;
        assert!(matches!(result, Err(ServiceCacheError::Provider(_))));
    }
}
