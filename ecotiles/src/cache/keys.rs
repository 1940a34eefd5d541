//! Cache key construction for the two tiers.
//!
//! - Bucket keys address the URL tier: `"{dataset}_{band}_{year}/{geocell}"`
//! - Tile keys address the image tier: `"{bucket}/{z}/{x}_{y}.png"`
//!
//! Every tile key starts with the bucket key of the geocell its tile falls in,
//! so all tiles sharing a minted template share a key prefix.

use std::fmt;

use crate::coord::TileCoord;
use crate::geocell::GeoCell;

/// Key of a URL-template entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey(String);

impl BucketKey {
    pub fn new(dataset: &str, band: &str, year: i32, cell: &GeoCell) -> Self {
        Self(format!("{}_{}_{}/{}", dataset, band, year, cell.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BucketKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Key of a cached tile image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileKey {
    key: String,
    bucket_len: usize,
}

impl TileKey {
    pub fn new(bucket: &BucketKey, z: u8, x: u32, y: u32) -> Self {
        Self {
            key: format!("{}/{}/{}_{}.png", bucket.as_str(), z, x, y),
            bucket_len: bucket.as_str().len(),
        }
    }

    /// Build the tile key for `tile` under `bucket`.
    pub fn for_tile(bucket: &BucketKey, tile: &TileCoord) -> Self {
        Self::new(bucket, tile.z, tile.x, tile.y)
    }

    /// The bucket key this tile key is prefixed by.
    pub fn bucket(&self) -> BucketKey {
        BucketKey(self.key[..self.bucket_len].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl AsRef<str> for TileKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocell;

    #[test]
    fn test_bucket_key_format() {
        let cell = geocell::decode("u48").unwrap();
        let key = BucketKey::new("open_buildings", "presence", 2023, &cell);
        assert_eq!(key.as_str(), "open_buildings_presence_2023/u48");
    }

    #[test]
    fn test_tile_key_format() {
        let cell = geocell::decode("u48").unwrap();
        let bucket = BucketKey::new("ds", "presence", 2024, &cell);
        let tile = TileKey::new(&bucket, 10, 512, 300);
        assert_eq!(tile.as_str(), "ds_presence_2024/u48/10/512_300.png");
    }

    #[test]
    fn test_tile_key_is_prefixed_by_bucket() {
        let cell = geocell::decode("6vj").unwrap();
        let bucket = BucketKey::new("open_buildings", "height", 2020, &cell);
        let tile = TileKey::for_tile(&bucket, &TileCoord::new(372, 561, 10));

        assert!(tile.as_str().starts_with(bucket.as_str()));
        assert_eq!(tile.bucket(), bucket);
    }

    #[test]
    fn test_empty_cell_key() {
        let cell = geocell::decode("").unwrap();
        let key = BucketKey::new("ds", "height", 2016, &cell);
        assert_eq!(key.to_string(), "ds_height_2016/");
    }
}
