//! Provider types and traits

use std::future::Future;

use chrono::NaiveDate;
use thiserror::Error;

use crate::dataset::VisParams;
use crate::geocell::GeoBoundingBox;

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// Request exceeded the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),
    /// Invalid response data from provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// Provider-specific error
    #[error("Provider error: {0}")]
    ProviderSpecific(String),
}

/// Filter describing the assets a tile bucket draws from.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetQuery {
    /// Upstream collection id.
    pub collection: String,
    /// Calendar year the assets must fall in.
    pub year: i32,
    /// Region the assets must intersect.
    pub region: GeoBoundingBox,
}

impl AssetQuery {
    pub fn new(collection: impl Into<String>, year: i32, region: GeoBoundingBox) -> Self {
        Self {
            collection: collection.into(),
            year,
            region,
        }
    }

    /// First day of the date filter, `YYYY-01-01`.
    pub fn start_date(&self) -> String {
        format!("{:04}-01-01", self.year)
    }

    /// Last day of the date filter, `YYYY-12-31`.
    pub fn end_date(&self) -> String {
        format!("{:04}-12-31", self.year)
    }
}

/// Everything needed to mint a tile URL template.
///
/// Visualization values are carried in their wire encoding: bounds as
/// decimal strings and the palette as one comma-joined string.
#[derive(Debug, Clone, PartialEq)]
pub struct MintRequest {
    pub query: AssetQuery,
    pub bands: Vec<String>,
    pub min: String,
    pub max: String,
    pub palette: String,
}

impl MintRequest {
    pub fn new(query: AssetQuery, vis: &VisParams) -> Self {
        Self {
            query,
            bands: vis.bands.clone(),
            min: vis.min_string(),
            max: vis.max_string(),
            palette: vis.palette_string(),
        }
    }
}

/// A single-pixel time series request.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSeriesQuery {
    /// Upstream collection id.
    pub collection: String,
    /// Upstream band name, e.g. `building_height`.
    pub band: String,
    pub lat: f64,
    pub lon: f64,
    /// First day included.
    pub start: NaiveDate,
    /// First day excluded.
    pub end: NaiveDate,
}

/// One band value read from one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSample {
    pub date: NaiveDate,
    pub value: f64,
}

/// Upstream imagery service.
///
/// A template minted by `mint_tile_url_template` contains the literal
/// placeholders `{x}`, `{y}` and `{z}`; callers substitute them before
/// calling `fetch_tile`.
pub trait ImageryProvider: Send + Sync {
    /// Number of assets matching the query.
    fn count_assets(
        &self,
        query: &AssetQuery,
    ) -> impl Future<Output = Result<u64, ProviderError>> + Send;

    /// Mint a tile URL template for the mosaic described by `request`.
    fn mint_tile_url_template(
        &self,
        request: &MintRequest,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;

    /// Download a single tile image.
    fn fetch_tile(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Band values at a point, one sample per image with data there.
    fn point_series(
        &self,
        query: &PointSeriesQuery,
    ) -> impl Future<Output = Result<Vec<SeriesSample>, ProviderError>> + Send;

    /// Cheapest request proving the upstream answers for `collection`.
    fn check_connection(
        &self,
        collection: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;
}

/// Fill the `{x}`, `{y}` and `{z}` placeholders of a template.
pub fn expand_template(template: &str, x: u32, y: u32, z: u8) -> String {
    template
        .replace("{x}", &x.to_string())
        .replace("{y}", &y.to_string())
        .replace("{z}", &z.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Band, DatasetSpec};

    #[test]
    fn test_asset_query_dates() {
        let q = AssetQuery::new("c", 2020, GeoBoundingBox::WORLD);
        assert_eq!(q.start_date(), "2020-01-01");
        assert_eq!(q.end_date(), "2020-12-31");
    }

    #[test]
    fn test_mint_request_wire_encoding() {
        let ds = DatasetSpec::open_buildings();
        let q = AssetQuery::new(&ds.collection, 2021, GeoBoundingBox::WORLD);
        let req = MintRequest::new(q, ds.visparams(Band::Presence));
        assert_eq!(req.bands, vec!["building_presence"]);
        assert_eq!(req.min, "0");
        assert_eq!(req.max, "1");
        assert_eq!(req.palette, "000000,2446c0,2ca02c,ffdd57");
    }

    #[test]
    fn test_expand_template() {
        let url = expand_template("https://h/v1/m/tiles/{z}/{x}/{y}", 512, 300, 10);
        assert_eq!(url, "https://h/v1/m/tiles/10/512/300");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ProviderError::HttpError("HTTP 500".into()).to_string(),
            "HTTP error: HTTP 500"
        );
        assert!(ProviderError::Timeout("x".into()).to_string().contains("timed out"));
    }
}
