//! Coordinate types and constants.

use std::fmt;

use thiserror::Error;

/// Minimum latitude representable in Web Mercator.
pub const MIN_LAT: f64 = -85.05112878;

/// Maximum latitude representable in Web Mercator.
pub const MAX_LAT: f64 = 85.05112878;

/// Minimum longitude.
pub const MIN_LON: f64 = -180.0;

/// Maximum longitude.
pub const MAX_LON: f64 = 180.0;

/// Deepest zoom level the coordinate math accepts.
///
/// This is a bound on the arithmetic, not on what the tile service serves;
/// the served range lives in the tile configuration.
pub const MAX_ZOOM: u8 = 30;

/// Errors from coordinate conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("Invalid latitude: {0} (must be between {MIN_LAT} and {MAX_LAT})")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (must be between {MIN_LON} and {MAX_LON})")]
    InvalidLongitude(f64),

    #[error("Invalid zoom level: {0} (must be at most {MAX_ZOOM})")]
    InvalidZoom(u8),

    #[error("Tile {x}/{y} does not exist at zoom {z}")]
    OutOfRange { x: u32, y: u32, z: u8 },
}

/// An XYZ slippy-map tile address.
///
/// `x` grows eastward from the antimeridian and `y` grows southward from the
/// northern Mercator limit, both in `0..2^z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    /// Creates a tile coordinate without validating it.
    pub const fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Creates a tile coordinate, rejecting addresses outside the pyramid.
    pub fn checked(x: u32, y: u32, z: u8) -> Result<Self, CoordError> {
        let tile = Self::new(x, y, z);
        if z > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(z));
        }
        if !tile.is_within_pyramid() {
            return Err(CoordError::OutOfRange { x, y, z });
        }
        Ok(tile)
    }

    /// Number of tiles along one axis at this zoom level.
    #[inline]
    pub fn tiles_per_axis(&self) -> u64 {
        1u64 << self.z.min(MAX_ZOOM)
    }

    /// Returns true if both `x` and `y` fall inside `0..2^z`.
    #[inline]
    pub fn is_within_pyramid(&self) -> bool {
        let n = self.tiles_per_axis();
        self.z <= MAX_ZOOM && u64::from(self.x) < n && u64::from(self.y) < n
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}
