//! On-disk cache provider.
//!
//! Stores one file per key. Eviction is left to the operator; entries are
//! never removed by this provider except through `delete`.
//!
//! # File Layout
//!
//! ```text
//! {cache_dir}/{sha256(key)}.cache
//! ```
//!
//! The key is hashed to create a safe filename that works across all
//! platforms. Writes go to a uniquely named temp file first and are then
//! renamed into place, so readers see either the old value or the new one.
//! Temp files left behind by an interrupted write are removed on `start`.
//!
//! Size and entry counters are approximate: two first writes racing on the
//! same key may both count it. `start` recomputes them from the directory.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::cache::traits::{BoxFuture, Cache, ServiceCacheError};

const ENTRY_EXTENSION: &str = "cache";
const TEMP_EXTENSION: &str = "tmp";

/// On-disk cache provider.
pub struct DiskCacheProvider {
    /// Cache directory path.
    directory: PathBuf,

    /// Current cached size (approximate).
    cached_size: AtomicU64,

    /// Current entry count (approximate).
    cached_count: AtomicU64,

    /// Sequence used to keep concurrent temp files apart.
    temp_seq: AtomicU64,
}

impl DiskCacheProvider {
    /// Open a disk cache rooted at `directory`.
    ///
    /// Creates the directory if needed, removes stray temp files and scans
    /// existing entries so size and count start out accurate.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created or read.
    pub async fn start(directory: impl Into<PathBuf>) -> Result<Self, ServiceCacheError> {
        let directory = directory.into();
        tokio::fs::create_dir_all(&directory).await?;

        let (size, count) = Self::scan(&directory).await?;

        info!(
            dir = %directory.display(),
            entries = count,
            bytes = size,
            "Disk cache provider started"
        );

        Ok(Self {
            directory,
            cached_size: AtomicU64::new(size),
            cached_count: AtomicU64::new(count),
            temp_seq: AtomicU64::new(0),
        })
    }

    /// Cache directory this provider writes to.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    async fn scan(directory: &Path) -> Result<(u64, u64), ServiceCacheError> {
        let mut size = 0;
        let mut count = 0;
        let mut entries = tokio::fs::read_dir(directory).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            match path.extension() {
                Some(ext) if ext == ENTRY_EXTENSION => {
                    size += entry.metadata().await?.len();
                    count += 1;
                }
                Some(ext) if ext == TEMP_EXTENSION => {
                    if let Err(e) = tokio::fs::remove_file(&path).await {
                        warn!(path = %path.display(), error = %e, "Failed to remove stale temp file");
                    }
                }
                _ => {}
            }
        }
        Ok((size, count))
    }

    /// Generate a safe filename from a cache key.
    fn key_to_filename(key: &str) -> String {
        let digest = Sha256::digest(key.as_bytes());
        let mut name = String::with_capacity(digest.len() * 2 + ENTRY_EXTENSION.len() + 1);
        for byte in digest {
            name.push_str(&format!("{:02x}", byte));
        }
        name.push('.');
        name.push_str(ENTRY_EXTENSION);
        name
    }

    /// Get the file path for a cache key.
    fn key_path(&self, key: &str) -> PathBuf {
        self.directory.join(Self::key_to_filename(key))
    }

    fn temp_path(&self, path: &Path) -> PathBuf {
        let seq = self.temp_seq.fetch_add(1, Ordering::Relaxed);
        path.with_extension(format!("{}.{}", seq, TEMP_EXTENSION))
    }

    async fn existing_len(path: &Path) -> Option<u64> {
        tokio::fs::metadata(path).await.ok().map(|m| m.len())
    }
}

fn saturating_sub(counter: &AtomicU64, amount: u64) {
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
        Some(n.saturating_sub(amount))
    });
}

impl Cache for DiskCacheProvider {
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), ServiceCacheError>> {
        let path = self.key_path(key);
        let temp_path = self.temp_path(&path);
        Box::pin(async move {
            let previous = Self::existing_len(&path).await;

            if let Err(e) = tokio::fs::write(&temp_path, &value).await {
                let _ = tokio::fs::remove_file(&temp_path).await;
                return Err(ServiceCacheError::Io(e));
            }
            if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
                let _ = tokio::fs::remove_file(&temp_path).await;
                return Err(ServiceCacheError::Io(e));
            }

            match previous {
                Some(old) => saturating_sub(&self.cached_size, old),
                None => {
                    self.cached_count.fetch_add(1, Ordering::Relaxed);
                }
            }
            self.cached_size
                .fetch_add(value.len() as u64, Ordering::Relaxed);
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, ServiceCacheError>> {
        let path = self.key_path(key);
        Box::pin(async move {
            match tokio::fs::read(&path).await {
                Ok(data) => Ok(Some(data)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(ServiceCacheError::Io(e)),
            }
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>> {
        let path = self.key_path(key);
        Box::pin(async move {
            let previous = Self::existing_len(&path).await;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    if let Some(old) = previous {
                        saturating_sub(&self.cached_size, old);
                    }
                    saturating_sub(&self.cached_count, 1);
                    Ok(true)
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(ServiceCacheError::Io(e)),
            }
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>> {
        let path = self.key_path(key);
        Box::pin(async move { Ok(tokio::fs::try_exists(&path).await?) })
    }

    fn size_bytes(&self) -> u64 {
        self.cached_size.load(Ordering::Relaxed)
    }

    fn entry_count(&self) -> u64 {
        self.cached_count.load(Ordering::Relaxed)
    }

    fn flush(&self) -> BoxFuture<'_, Result<(), ServiceCacheError>> {
        Box::pin(async { Ok(()) })
    }

    fn name(&self) -> &'static str {
        "disk"
    }
}
