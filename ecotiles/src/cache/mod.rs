//! Two-tier tile cache.
//!
//! A single key-value store backs two logical tiers:
//!
//! - the URL tier, keyed by [`BucketKey`], holding minted upstream URL
//!   templates with their issue time
//! - the image tier, keyed by [`TileKey`], holding fetched tile images
//!
//! The store is reached through the dyn-compatible [`Cache`] trait and owned
//! by a [`CacheService`]. Backends are in-process memory (moka), a local
//! directory, or a shared Valkey instance.

pub mod clients;
mod entry;
mod keys;
pub mod providers;
mod service;
mod traits;

pub use clients::{ImageCacheClient, UrlTemplateCacheClient};
pub use entry::{CachedUrlEntry, EntryError};
pub use keys::{BucketKey, TileKey};
pub use providers::{DiskCacheProvider, MemoryCacheProvider, ValkeyCacheProvider};
pub use service::{CacheService, ServiceCacheConfig};
pub use traits::{BoxFuture, Cache, ServiceCacheError};
