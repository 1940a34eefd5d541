//! Valkey cache provider.
//!
//! Talks the Redis protocol through a `redis` [`ConnectionManager`], which
//! multiplexes one connection across every in-flight request and reconnects
//! on its own after a dropped link. Several server processes pointed at the
//! same Valkey instance share both cache tiers.
//!
//! Keys are stored verbatim. Size and entry counters only count the writes
//! and deletes made by this process; other writers to the same instance are
//! not reflected.

use std::sync::atomic::{AtomicU64, Ordering};

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use crate::cache::traits::{BoxFuture, Cache, ServiceCacheError};

/// Valkey-backed cache provider.
pub struct ValkeyCacheProvider {
    connection: ConnectionManager,
    written_bytes: AtomicU64,
    written_keys: AtomicU64,
}

fn provider_error(e: redis::RedisError) -> ServiceCacheError {
    ServiceCacheError::Provider(e.to_string())
}

impl ValkeyCacheProvider {
    /// Connect to the instance at `url` (`redis://host:port/db`).
    ///
    /// # Errors
    ///
    /// Returns `ServiceCacheError::Provider` if the URL is malformed or the
    /// server cannot be reached.
    pub async fn connect(url: &str) -> Result<Self, ServiceCacheError> {
        let client = redis::Client::open(url).map_err(provider_error)?;
        let addr = client.get_connection_info().addr.to_string();
        let connection = ConnectionManager::new(client)
            .await
            .map_err(provider_error)?;

        info!(addr = %addr, "Valkey cache provider connected");

        Ok(Self {
            connection,
            written_bytes: AtomicU64::new(0),
            written_keys: AtomicU64::new(0),
        })
    }
}

impl Cache for ValkeyCacheProvider {
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), ServiceCacheError>> {
        let key = key.to_string();
        let mut conn = self.connection.clone();
        Box::pin(async move {
            let len = value.len() as u64;
            let _: () = conn.set(&key, value).await.map_err(provider_error)?;
            self.written_keys.fetch_add(1, Ordering::Relaxed);
            self.written_bytes.fetch_add(len, Ordering::Relaxed);
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, ServiceCacheError>> {
        let key = key.to_string();
        let mut conn = self.connection.clone();
        Box::pin(async move {
            let value: Option<Vec<u8>> = conn.get(&key).await.map_err(provider_error)?;
            Ok(value)
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>> {
        let key = key.to_string();
        let mut conn = self.connection.clone();
        Box::pin(async move {
            let removed: u64 = conn.del(&key).await.map_err(provider_error)?;
            if removed > 0 {
                let _ = self
                    .written_keys
                    .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                        Some(n.saturating_sub(removed))
                    });
            }
            Ok(removed > 0)
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>> {
        let key = key.to_string();
        let mut conn = self.connection.clone();
        Box::pin(async move {
            let exists: bool = conn.exists(&key).await.map_err(provider_error)?;
            Ok(exists)
        })
    }

    fn size_bytes(&self) -> u64 {
        self.written_bytes.load(Ordering::Relaxed)
    }

    fn entry_count(&self) -> u64 {
        self.written_keys.load(Ordering::Relaxed)
    }

    fn flush(&self) -> BoxFuture<'_, Result<(), ServiceCacheError>> {
        Box::pin(async { Ok(()) })
    }

    fn name(&self) -> &'static str {
        "valkey"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        let err = ValkeyCacheProvider::connect("not a url").await.err().unwrap();
        assert!(matches!(err, ServiceCacheError::Provider(_)));
    }

    #[test]
    fn test_provider_error_keeps_message() {
        let err = provider_error(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "connection refused",
        )));
        assert!(err.to_string().contains("connection refused"));
    }
}
