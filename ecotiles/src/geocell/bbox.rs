//! Geographic bounding boxes.

use std::fmt;

/// Axis-aligned lat/lon rectangle in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBoundingBox {
    /// The whole globe. Returned for a zero-length geocell.
    pub const WORLD: GeoBoundingBox = GeoBoundingBox {
        north: 90.0,
        south: -90.0,
        east: 180.0,
        west: -180.0,
    };

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Returns the `(lat, lon)` midpoint.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }

    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lon)
    }

    /// Returns true if `other` lies entirely within this box.
    ///
    /// `tolerance` absorbs floating-point noise on shared edges.
    pub fn contains(&self, other: &GeoBoundingBox, tolerance: f64) -> bool {
        other.north <= self.north + tolerance
            && other.south >= self.south - tolerance
            && other.east <= self.east + tolerance
            && other.west >= self.west - tolerance
    }
}

impl fmt::Display for GeoBoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[w={:.6}, s={:.6}, e={:.6}, n={:.6}]",
            self.west, self.south, self.east, self.north
        )
    }
}
