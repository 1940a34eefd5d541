//! Path and query parsing for tile and series routes.

use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::coord::TileCoord;
use crate::dataset::{Band, UnknownBand};
use crate::timeseries::{SeriesRequest, DEFAULT_SERIES_START};

#[derive(Debug, Error, PartialEq)]
pub enum TileParamError {
    #[error("invalid {name} '{value}'")]
    InvalidSegment { name: &'static str, value: String },

    /// `z` is a number, but no tile pyramid has that level.
    #[error("zoom level {0} out of range")]
    ZoomOutOfRange(i64),

    #[error("invalid year '{0}'")]
    InvalidYear(String),

    #[error(transparent)]
    Band(#[from] UnknownBand),
}

fn segment<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, TileParamError> {
    value.parse().map_err(|_| TileParamError::InvalidSegment {
        name,
        value: value.to_string(),
    })
}

/// Parse the `{x}/{y}/{z}` segments. A `.png` suffix on the last one is allowed.
///
/// `z` is checked first: a numeric zoom that does not fit a level is
/// reported as [`TileParamError::ZoomOutOfRange`] whatever `x` and `y` hold.
pub fn parse_tile_path(x: &str, y: &str, z: &str) -> Result<TileCoord, TileParamError> {
    let z = z.strip_suffix(".png").unwrap_or(z);
    let wide: i64 = segment("z", z)?;
    let z = u8::try_from(wide).map_err(|_| TileParamError::ZoomOutOfRange(wide))?;
    Ok(TileCoord::new(segment("x", x)?, segment("y", y)?, z))
}

/// Parse `year` and `band`, falling back to `default_year` and presence.
pub fn parse_tile_query(
    query: &HashMap<String, String>,
    default_year: i32,
) -> Result<(i32, Band), TileParamError> {
    let year = match query.get("year") {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| TileParamError::InvalidYear(raw.clone()))?,
        None => default_year,
    };
    let band = match query.get("band") {
        Some(raw) => raw.parse()?,
        None => Band::default(),
    };
    Ok((year, band))
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesParamError {
    #[error("invalid {name} '{value}'")]
    InvalidCoordinate { name: &'static str, value: String },

    #[error("invalid {name} '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { name: &'static str, value: String },

    #[error("end_date {end} is not after start_date {start}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    Band(#[from] UnknownBand),
}

fn coordinate(name: &'static str, value: &str, limit: f64) -> Result<f64, SeriesParamError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= limit)
        .ok_or_else(|| SeriesParamError::InvalidCoordinate {
            name,
            value: value.to_string(),
        })
}

fn date(name: &'static str, value: &str) -> Result<NaiveDate, SeriesParamError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        SeriesParamError::InvalidDate {
            name,
            value: value.to_string(),
        }
    })
}

/// Parse `{lat}/{lon}` and `band`, `start_date`, `end_date`.
///
/// `band` defaults to height, `start_date` to 2015-07-01 and `end_date` to
/// `today`.
pub fn parse_series_request(
    lat: &str,
    lon: &str,
    query: &HashMap<String, String>,
    today: NaiveDate,
) -> Result<SeriesRequest, SeriesParamError> {
    let lat = coordinate("lat", lat, 90.0)?;
    let lon = coordinate("lon", lon, 180.0)?;
    let band = match query.get("band") {
        Some(raw) => raw.parse()?,
        None => Band::Height,
    };
    let start = date(
        "start_date",
        query
            .get("start_date")
            .map(String::as_str)
            .unwrap_or(DEFAULT_SERIES_START),
    )?;
    let end = match query.get("end_date") {
        Some(raw) => date("end_date", raw)?,
        None => today,
    };
    if end <= start {
        return Err(SeriesParamError::EmptyRange { start, end });
    }
    Ok(SeriesRequest {
        lat,
        lon,
        band,
        start,
        end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(
            parse_tile_path("512", "300", "10"),
            Ok(TileCoord::new(512, 300, 10))
        );
        assert_eq!(
            parse_tile_path("512", "300", "10.png"),
            Ok(TileCoord::new(512, 300, 10))
        );
    }

    #[test]
    fn test_parse_path_rejects_garbage() {
        assert!(parse_tile_path("-1", "0", "10").is_err());
        assert!(parse_tile_path("a", "0", "10").is_err());
        assert!(matches!(
            parse_tile_path("0", "0", "ten"),
            Err(TileParamError::InvalidSegment { name: "z", .. })
        ));
    }

    #[test]
    fn test_parse_path_zoom_beyond_level_range() {
        assert_eq!(
            parse_tile_path("0", "0", "300"),
            Err(TileParamError::ZoomOutOfRange(300))
        );
        assert_eq!(
            parse_tile_path("0", "0", "-3.png"),
            Err(TileParamError::ZoomOutOfRange(-3))
        );
        assert_eq!(
            parse_tile_path("abc", "0", "256"),
            Err(TileParamError::ZoomOutOfRange(256))
        );
    }

    #[test]
    fn test_query_defaults() {
        assert_eq!(parse_tile_query(&query(&[]), 2026), Ok((2026, Band::Presence)));
    }

    #[test]
    fn test_query_values() {
        assert_eq!(
            parse_tile_query(&query(&[("year", "2020"), ("band", "height")]), 2026),
            Ok((2020, Band::Height))
        );
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_series_defaults() {
        let request = parse_series_request("-15.79", "-47.88", &query(&[]), today()).unwrap();
        assert_eq!(request.lat, -15.79);
        assert_eq!(request.lon, -47.88);
        assert_eq!(request.band, Band::Height);
        assert_eq!(request.start, NaiveDate::from_ymd_opt(2015, 7, 1).unwrap());
        assert_eq!(request.end, today());
    }

    #[test]
    fn test_series_query_values() {
        let q = query(&[
            ("band", "presence"),
            ("start_date", "2018-01-01"),
            ("end_date", "2020-01-01"),
        ]);
        let request = parse_series_request("1.5", "2.5", &q, today()).unwrap();
        assert_eq!(request.band, Band::Presence);
        assert_eq!(request.start, NaiveDate::from_ymd_opt(2018, 1, 1).unwrap());
        assert_eq!(request.end, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    }

    #[test]
    fn test_series_errors() {
        assert!(matches!(
            parse_series_request("91", "0", &query(&[]), today()),
            Err(SeriesParamError::InvalidCoordinate { name: "lat", .. })
        ));
        assert!(matches!(
            parse_series_request("0", "NaN", &query(&[]), today()),
            Err(SeriesParamError::InvalidCoordinate { name: "lon", .. })
        ));
        assert!(matches!(
            parse_series_request("0", "0", &query(&[("start_date", "01/07/2015")]), today()),
            Err(SeriesParamError::InvalidDate { name: "start_date", .. })
        ));
        assert!(matches!(
            parse_series_request("0", "0", &query(&[("end_date", "2015-07-01")]), today()),
            Err(SeriesParamError::EmptyRange { .. })
        ));
        assert!(matches!(
            parse_series_request("0", "0", &query(&[("band", "roofs")]), today()),
            Err(SeriesParamError::Band(_))
        ));
    }

    #[test]
    fn test_query_errors() {
        assert_eq!(
            parse_tile_query(&query(&[("year", "twenty")]), 2026),
            Err(TileParamError::InvalidYear("twenty".into()))
        );
        assert!(matches!(
            parse_tile_query(&query(&[("band", "roofs")]), 2026),
            Err(TileParamError::Band(_))
        ));
    }
}
