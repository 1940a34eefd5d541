//! The `GeoCell` value type.

use std::fmt;

use super::bbox::GeoBoundingBox;

/// A decoded or encoded geocell.
///
/// Besides the hash text it keeps the de-interleaved axis integers and how
/// many bits each axis received. The two counters differ by one whenever the
/// total bit count is odd, which is the case for every odd precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeoCell {
    pub(super) hash: String,
    pub(super) lat: u64,
    pub(super) lon: u64,
    pub(super) lat_bits: u32,
    pub(super) lon_bits: u32,
}

impl GeoCell {
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Number of symbols in the hash.
    pub fn precision(&self) -> usize {
        self.hash.len()
    }

    pub fn lat_bits(&self) -> u32 {
        self.lat_bits
    }

    pub fn lon_bits(&self) -> u32 {
        self.lon_bits
    }

    /// Geographic extent of the cell.
    ///
    /// Each axis is rebuilt from its integer and bit count alone:
    /// `min + value * range / 2^bits` up to one step beyond. Zero bits yields
    /// the full axis, so the empty cell covers the world.
    pub fn bounding_box(&self) -> GeoBoundingBox {
        if self.hash.is_empty() {
            return GeoBoundingBox::WORLD;
        }

        let (south, north) = axis_bounds(self.lat, self.lat_bits, -90.0, 180.0);
        let (west, east) = axis_bounds(self.lon, self.lon_bits, -180.0, 360.0);

        GeoBoundingBox {
            north,
            south,
            east,
            west,
        }
    }

    /// Returns the cell's `(lat, lon)` center.
    pub fn center(&self) -> (f64, f64) {
        self.bounding_box().center()
    }
}

fn axis_bounds(value: u64, bits: u32, min: f64, range: f64) -> (f64, f64) {
    if bits == 0 {
        return (min, min + range);
    }
    let step = range / (1u64 << bits) as f64;
    let low = min + value as f64 * step;
    (low, low + step)
}

impl fmt::Display for GeoCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hash)
    }
}

impl AsRef<str> for GeoCell {
    fn as_ref(&self) -> &str {
        &self.hash
    }
}
