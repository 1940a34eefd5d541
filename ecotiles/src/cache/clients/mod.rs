//! Tier-specific cache clients.
//!
//! Both clients wrap the same `Arc<dyn Cache>`; they differ only in key type
//! and value encoding.
//!
//! ```text
//! ┌──────────────────────────┐     ┌──────────────────────────┐
//! │  UrlTemplateCacheClient  │     │    ImageCacheClient      │
//! │                          │     │                          │
//! │ BucketKey → entry text   │     │ TileKey → image bytes    │
//! └────────────┬─────────────┘     └────────────┬─────────────┘
//!              │                                │
//!              ▼                                ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │                     Arc<dyn Cache>                        │
//! └───────────────────────────────────────────────────────────┘
//! ```

mod image;
mod url;

pub use image::ImageCacheClient;
pub use url::UrlTemplateCacheClient;
