//! Geocell (geohash) encoding and decoding.
//!
//! A geocell is a standard base-32 geohash. Bits alternate between longitude
//! and latitude starting with longitude, so within every 5-bit symbol one
//! axis contributes three bits and the other two, swapping roles from one
//! symbol to the next.
//!
//! Both directions go through fixed-point integers: a coordinate is
//! quantised to `2^bits` steps per axis before interleaving, and a hash is
//! de-interleaved into two integers with their own bit counters before the
//! bounding box is rebuilt. There is no floating-point bisection.
//!
//! # Example
//!
//! ```
//! use ecotiles::geocell;
//!
//! let cell = geocell::encode(42.605, -5.603, 5).unwrap();
//! assert_eq!(cell.as_str(), "ezs42");
//!
//! let bbox = geocell::decode("ezs42").unwrap().bounding_box();
//! assert!(bbox.contains_point(42.605, -5.603));
//! ```

mod bbox;
mod cell;

pub use bbox::GeoBoundingBox;
pub use cell::GeoCell;

use thiserror::Error;

use crate::coord::{self, TileCoord, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Geohash symbol alphabet (no `a`, `i`, `l`, `o`).
pub const ALPHABET: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Longest supported geocell.
///
/// 12 symbols is 60 bits, which keeps each axis to 30 bits and well inside
/// the exact range of an `f64` mantissa.
pub const MAX_PRECISION: usize = 12;

/// Errors from geocell encoding and decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocellError {
    #[error("Invalid geocell character '{0}'")]
    InvalidCharacter(char),

    #[error("Geocell precision {0} exceeds maximum of {MAX_PRECISION}")]
    PrecisionTooLarge(usize),

    #[error("Coordinate ({lat}, {lon}) is outside the globe")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// Encodes a coordinate into a geocell of `precision` symbols.
///
/// A precision of 0 yields the empty cell, which decodes to the whole world.
pub fn encode(lat: f64, lon: f64, precision: usize) -> Result<GeoCell, GeocellError> {
    if precision > MAX_PRECISION {
        return Err(GeocellError::PrecisionTooLarge(precision));
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        // NaN fails both range checks as well.
        return Err(GeocellError::InvalidCoordinate { lat, lon });
    }

    let total_bits = (precision * 5) as u32;
    let lon_bits = total_bits.div_ceil(2);
    let lat_bits = total_bits / 2;

    let lat_int = quantize(lat, -90.0, 180.0, lat_bits);
    let lon_int = quantize(lon, -180.0, 360.0, lon_bits);

    let mut hash = String::with_capacity(precision);
    let mut lat_left = lat_bits;
    let mut lon_left = lon_bits;
    let mut symbol = 0usize;

    for bit in 0..total_bits {
        let value = if bit % 2 == 0 {
            lon_left -= 1;
            (lon_int >> lon_left) & 1
        } else {
            lat_left -= 1;
            (lat_int >> lat_left) & 1
        };
        symbol = (symbol << 1) | value as usize;

        if bit % 5 == 4 {
            hash.push(ALPHABET[symbol] as char);
            symbol = 0;
        }
    }

    Ok(GeoCell {
        hash,
        lat: lat_int,
        lon: lon_int,
        lat_bits,
        lon_bits,
    })
}

/// Decodes a geocell string.
///
/// Every input symbol is validated; the empty string is accepted.
pub fn decode(hash: &str) -> Result<GeoCell, GeocellError> {
    if hash.len() > MAX_PRECISION {
        return Err(GeocellError::PrecisionTooLarge(hash.len()));
    }

    let mut lat = 0u64;
    let mut lon = 0u64;
    let mut lat_bits = 0u32;
    let mut lon_bits = 0u32;
    let mut bit = 0u32;

    for c in hash.chars() {
        let value = symbol_value(c).ok_or(GeocellError::InvalidCharacter(c))?;
        for shift in (0..5).rev() {
            let b = u64::from((value >> shift) & 1);
            if bit % 2 == 0 {
                lon = (lon << 1) | b;
                lon_bits += 1;
            } else {
                lat = (lat << 1) | b;
                lat_bits += 1;
            }
            bit += 1;
        }
    }

    Ok(GeoCell {
        hash: hash.to_ascii_lowercase(),
        lat,
        lon,
        lat_bits,
        lon_bits,
    })
}

/// Returns the region that covers every tile anchored in `cell`.
///
/// Tiles are bucketed by their north-west corner, and a tile extends south
/// and east of that corner, so the tiles of a bucket can spill past the
/// cell's south and east edges. Mercator rows also never line up with the
/// linear latitude steps of a geocell. The region is the cell grown to the
/// edges of the `min_zoom` tiles sitting on its south and east borders; finer
/// zooms nest inside those tiles.
pub fn covering_region(cell: &GeoCell, min_zoom: u8) -> GeoBoundingBox {
    let cell_box = cell.bounding_box();
    let mut region = cell_box;

    if cell_box.south > MIN_LAT && cell_box.south <= MAX_LAT {
        let lon = cell_box.west.clamp(MIN_LON, MAX_LON);
        if let Ok(tile) = coord::to_tile_coords(cell_box.south, lon, min_zoom) {
            region.south = region.south.min(coord::tile_bounds(&tile).south);
        }
    }

    if cell_box.east < MAX_LON {
        // Cell and tile edges are both dyadic and never closer than 2^-30 of
        // the globe unless equal, so this lands inside the last tile.
        let lon = cell_box.east - 1e-9;
        let lat = cell_box.north.clamp(MIN_LAT, MAX_LAT);
        if let Ok(tile) = coord::to_tile_coords(lat, lon, min_zoom) {
            region.east = region.east.max(coord::tile_bounds(&tile).east);
        }
    }

    region
}

/// Geocell containing the north-west corner of `tile`.
pub fn cell_for_tile(tile: &TileCoord, precision: usize) -> Result<GeoCell, GeocellError> {
    let (lat, lon) = coord::tile_to_lat_lon(tile);
    encode(lat, lon, precision)
}

fn quantize(value: f64, min: f64, range: f64, bits: u32) -> u64 {
    if bits == 0 {
        return 0;
    }
    let steps = 1u64 << bits;
    let scaled = ((value - min) / range * steps as f64).floor();
    (scaled.max(0.0) as u64).min(steps - 1)
}

fn symbol_value(c: char) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    ALPHABET
        .iter()
        .position(|&symbol| symbol as char == c)
        .map(|index| index as u8)
}
