//! Core traits for the tile cache store.
//!
//! The `Cache` trait is the key-value interface both cache tiers sit on: the
//! URL tier (bucket key → minted template) and the image tier (tile key →
//! image bytes). A single store instance backs both tiers.
//!
//! # Design Principles
//!
//! - **String keys**: Human-readable for debugging, e.g.
//!   `open_buildings_presence_2024/u48/10/512_300.png`
//! - **Vec<u8> values**: Raw bytes, no serialization opinions imposed
//! - **Single-key atomicity**: `get` and `set` are atomic per key; there are
//!   no multi-key transactions
//! - **No native TTL**: expiry of URL templates is decided by the caller from
//!   the stored timestamp
//! - **Dyn-compatible**: Uses `Pin<Box<dyn Future>>` for trait object support

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum ServiceCacheError {
    /// I/O error during cache operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider-specific error.
    #[error("Provider error: {0}")]
    Provider(String),
}

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Generic cache interface for key-value storage.
///
/// Eviction is entirely the provider's concern. Callers must treat any entry
/// as possibly gone on the next read.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`; one handle is shared by every
/// in-flight request.
pub trait Cache: Send + Sync {
    /// Store a value with the given key.
    ///
    /// If the key already exists, the value is replaced. A reader never
    /// observes a partially written value.
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), ServiceCacheError>>;

    /// Retrieve a value by key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(data))` if the key exists
    /// - `Ok(None)` if the key is not found
    /// - `Err(_)` if an error occurs
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, ServiceCacheError>>;

    /// Delete a value by key, returning whether it existed.
    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>>;

    /// Check if a key exists without retrieving the value.
    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>>;

    /// Get the current size of the cache in bytes.
    fn size_bytes(&self) -> u64;

    /// Get the current number of entries in the cache.
    fn entry_count(&self) -> u64;

    /// Complete pending maintenance work before shutdown.
    fn flush(&self) -> BoxFuture<'_, Result<(), ServiceCacheError>>;

    /// Short backend name for logs and health reports.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_display() {
        let err = ServiceCacheError::Provider("connection refused".to_string());
        assert_eq!(format!("{}", err), "Provider error: connection refused");
    }

    #[test]
    fn test_cache_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cache_err: ServiceCacheError = io_err.into();
        assert!(matches!(cache_err, ServiceCacheError::Io(_)));
    }

    #[test]
    fn test_trait_is_dyn_compatible() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn Cache>();
    }
}
