//! Image-tier cache client.

use std::sync::Arc;

use tracing::warn;

use crate::cache::keys::TileKey;
use crate::cache::traits::Cache;

/// Cache client for rendered tile images.
///
/// Values are the raw image bytes exactly as fetched upstream.
#[derive(Clone)]
pub struct ImageCacheClient {
    cache: Arc<dyn Cache>,
}

impl ImageCacheClient {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    /// Get a tile image from the cache.
    ///
    /// # Returns
    ///
    /// `Some(data)` if cached, `None` on a miss or a store failure
    pub async fn get(&self, key: &TileKey) -> Option<Vec<u8>> {
        match self.cache.get(key.as_str()).await {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, key = %key, "Image cache get failed");
                None
            }
        }
    }

    /// Store a tile image.
    ///
    /// Returns `false` if the store rejected the write.
    pub async fn set(&self, key: &TileKey, data: Vec<u8>) -> bool {
        match self.cache.set(key.as_str(), data).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, key = %key, "Image cache set failed");
                false
            }
        }
    }
}
