//! Cache store providers.

mod disk;
mod memory;
mod valkey;

pub use disk::DiskCacheProvider;
pub use memory::MemoryCacheProvider;
pub use valkey::ValkeyCacheProvider;
