//! URL-tier cache client.
//!
//! Wraps the shared store with bucket-key translation and the
//! `"<template>, <timestamp>"` entry encoding. Store failures and undecodable
//! entries are logged and reported as a miss.

use std::sync::Arc;

use tracing::warn;

use crate::cache::entry::CachedUrlEntry;
use crate::cache::keys::BucketKey;
use crate::cache::traits::Cache;

/// Cache client for minted URL templates.
#[derive(Clone)]
pub struct UrlTemplateCacheClient {
    cache: Arc<dyn Cache>,
}

impl UrlTemplateCacheClient {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    /// Get the stored entry for a bucket, expired or not.
    pub async fn get(&self, key: &BucketKey) -> Option<CachedUrlEntry> {
        match self.cache.get(key.as_str()).await {
            Ok(Some(bytes)) => match CachedUrlEntry::from_bytes(&bytes) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, key = %key, "Discarding undecodable URL cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, key = %key, "URL cache get failed");
                None
            }
        }
    }

    /// Store an entry, overwriting any previous one.
    ///
    /// Returns `false` if the store rejected the write.
    pub async fn set(&self, key: &BucketKey, entry: &CachedUrlEntry) -> bool {
        match self.cache.set(key.as_str(), entry.to_bytes()).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, key = %key, "URL cache set failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheService, ServiceCacheConfig};
    use crate::geocell;
    use chrono::{TimeZone, Utc};

    fn bucket() -> BucketKey {
        BucketKey::new("open_buildings", "presence", 2023, &geocell::decode("u48").unwrap())
    }

    #[tokio::test]
    async fn test_url_client_set_and_get() {
        let service = CacheService::start(ServiceCacheConfig::memory(1_000_000))
            .await
            .unwrap();
        let client = UrlTemplateCacheClient::new(service.cache());

        let entry = CachedUrlEntry::new(
            "https://earthengine.googleapis.com/v1/m/tiles/{z}/{x}/{y}",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        );
        assert!(client.set(&bucket(), &entry).await);
        assert_eq!(client.get(&bucket()).await, Some(entry));

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_url_client_garbage_is_miss() {
        let service = CacheService::start(ServiceCacheConfig::memory(1_000_000))
            .await
            .unwrap();
        service
            .cache()
            .set(bucket().as_str(), b"not an entry".to_vec())
            .await
            .unwrap();

        let client = UrlTemplateCacheClient::new(service.cache());
        assert_eq!(client.get(&bucket()).await, None);

        service.shutdown().await;
    }
}
