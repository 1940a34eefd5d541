//! Google Earth Engine imagery provider.
//!
//! Talks to the Earth Engine REST API (v1) with an OAuth access token.
//!
//! # API Endpoints
//!
//! - Asset listing: `GET {base}/v1/projects/earthengine-public/assets/{collection}:listImages`
//! - Map creation: `POST {base}/v1/projects/{project}/maps`
//! - Tiles: `GET {base}/v1/{map_name}/tiles/{z}/{x}/{y}`
//! - Point series: `POST {base}/v1/projects/{project}/value:compute`
//!
//! A map is a mosaic of the collection filtered by year and region, with one
//! band selected and a palette applied. Its tile URL stays valid for a
//! limited time, which is why callers cache the template with an issue date.

use chrono::DateTime;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::http::AsyncHttpClient;
use super::types::{
    AssetQuery, ImageryProvider, MintRequest, PointSeriesQuery, ProviderError, SeriesSample,
};
use crate::geocell::GeoBoundingBox;

/// Default Earth Engine API host.
pub const DEFAULT_BASE_URL: &str = "https://earthengine.googleapis.com";

/// Project hosting the public data catalog.
const PUBLIC_CATALOG_PROJECT: &str = "earthengine-public";

/// Page size used when counting assets.
const LIST_PAGE_SIZE: u32 = 1000;

/// Upper bound on listing pages followed for one count.
const MAX_LIST_PAGES: usize = 20;

/// Sampling scale for point series, in meters.
const SERIES_SCALE_METERS: f64 = 10.0;

/// Year listed by the connection check.
const CHECK_YEAR: i32 = 2020;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListImagesResponse {
    #[serde(default)]
    images: Vec<Value>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MapResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ComputeResponse {
    #[serde(default)]
    result: Value,
}

/// Earth Engine imagery provider.
pub struct EarthEngineProvider<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
    project: String,
    access_token: String,
}

impl<C: AsyncHttpClient> EarthEngineProvider<C> {
    /// Creates a provider against the public Earth Engine host.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `project` - Cloud project that owns minted maps
    /// * `access_token` - OAuth bearer token, passed through unchanged
    pub fn new(http_client: C, project: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: DEFAULT_BASE_URL.to_string(),
            project: project.into(),
            access_token: access_token.into(),
        }
    }

    /// Use a different API host (trailing slashes are ignored).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn list_images_endpoint(&self, collection: &str) -> String {
        format!(
            "{}/v1/projects/{}/assets/{}:listImages",
            self.base_url, PUBLIC_CATALOG_PROJECT, collection
        )
    }

    fn list_images_url(
        &self,
        query: &AssetQuery,
        page_token: Option<&str>,
    ) -> Result<String, ProviderError> {
        let endpoint = self.list_images_endpoint(&query.collection);
        let start = format!("{}T00:00:00Z", query.start_date());
        let end = format!("{}T00:00:00Z", query.end_date());
        let region = geojson_polygon(&query.region).to_string();
        let page_size = LIST_PAGE_SIZE.to_string();

        let mut params = vec![
            ("startTime", start.as_str()),
            ("endTime", end.as_str()),
            ("region", region.as_str()),
            ("pageSize", page_size.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        Url::parse_with_params(&endpoint, &params)
            .map(|url| url.to_string())
            .map_err(|e| ProviderError::ProviderSpecific(format!("Invalid listing URL: {}", e)))
    }

    fn check_url(&self, collection: &str) -> Result<String, ProviderError> {
        let start = format!("{:04}-01-01T00:00:00Z", CHECK_YEAR);
        let end = format!("{:04}-12-31T00:00:00Z", CHECK_YEAR);
        let params = [
            ("startTime", start.as_str()),
            ("endTime", end.as_str()),
            ("pageSize", "1"),
        ];
        Url::parse_with_params(&self.list_images_endpoint(collection), &params)
            .map(|url| url.to_string())
            .map_err(|e| ProviderError::ProviderSpecific(format!("Invalid listing URL: {}", e)))
    }

    fn maps_url(&self) -> String {
        format!("{}/v1/projects/{}/maps", self.base_url, self.project)
    }

    fn compute_url(&self) -> String {
        format!("{}/v1/projects/{}/value:compute", self.base_url, self.project)
    }

    fn template_for(&self, map_name: &str) -> String {
        format!("{}/v1/{}/tiles/{{z}}/{{x}}/{{y}}", self.base_url, map_name)
    }
}

/// GeoJSON polygon for a bounding box, counter-clockwise from the south-west corner.
fn geojson_polygon(b: &GeoBoundingBox) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[
            [b.west, b.south],
            [b.east, b.south],
            [b.east, b.north],
            [b.west, b.north],
            [b.west, b.south],
        ]],
    })
}

fn constant(value: Value) -> Value {
    json!({ "constantValue": value })
}

fn invoke(function: &str, arguments: Value) -> Value {
    json!({
        "functionInvocationValue": {
            "functionName": function,
            "arguments": arguments,
        }
    })
}

/// `ImageCollection.load(collection).filterDate(start, end).filterBounds(geometry)`.
fn filtered_collection(collection: &str, start: &str, end: &str, geometry: Value) -> Value {
    let loaded = invoke(
        "ImageCollection.load",
        json!({ "id": constant(json!(collection)) }),
    );
    let by_date = invoke(
        "Collection.filter",
        json!({
            "collection": loaded,
            "filter": invoke("Filter.dateRangeContains", json!({
                "leftValue": invoke("DateRange", json!({
                    "start": constant(json!(start)),
                    "end": constant(json!(end)),
                })),
                "rightField": constant(json!("system:time_start")),
            })),
        }),
    );
    invoke(
        "Collection.filter",
        json!({
            "collection": by_date,
            "filter": invoke("Filter.intersects", json!({
                "leftField": constant(json!(".all")),
                "rightValue": geometry,
            })),
        }),
    )
}

fn single_result(value: Value) -> Value {
    json!({
        "result": "0",
        "values": { "0": value },
    })
}

/// Expression graph for `load -> filterDate -> filterBounds -> mosaic -> select`.
fn mosaic_expression(request: &MintRequest) -> Value {
    let query = &request.query;
    let region = &query.region;

    let bbox = invoke(
        "GeometryConstructors.BBox",
        json!({
            "west": constant(json!(region.west)),
            "south": constant(json!(region.south)),
            "east": constant(json!(region.east)),
            "north": constant(json!(region.north)),
        }),
    );
    let by_bounds = filtered_collection(
        &query.collection,
        &query.start_date(),
        &query.end_date(),
        bbox,
    );
    let mosaic = invoke("ImageCollection.mosaic", json!({ "collection": by_bounds }));
    let selected = invoke(
        "Image.select",
        json!({
            "input": mosaic,
            "bandSelectors": constant(json!(request.bands)),
        }),
    );

    single_result(selected)
}

/// Expression graph for `load -> filterDate -> filterBounds(point) -> getRegion(point)`.
fn point_series_expression(query: &PointSeriesQuery) -> Value {
    let point = || {
        invoke(
            "GeometryConstructors.Point",
            json!({ "coordinates": constant(json!([query.lon, query.lat])) }),
        )
    };
    let start = query.start.format("%Y-%m-%d").to_string();
    let end = query.end.format("%Y-%m-%d").to_string();
    let images = filtered_collection(&query.collection, &start, &end, point());
    let region = invoke(
        "ImageCollection.getRegion",
        json!({
            "collection": images,
            "geometry": point(),
            "scale": constant(json!(SERIES_SCALE_METERS)),
        }),
    );
    single_result(region)
}

/// Read `getRegion` rows: a header row naming the columns, then one row per
/// image. Rows without a value for `band` are skipped.
fn parse_region_rows(result: &Value, band: &str) -> Result<Vec<SeriesSample>, ProviderError> {
    let rows = match result {
        Value::Null => return Ok(Vec::new()),
        Value::Array(rows) => rows,
        _ => {
            return Err(ProviderError::InvalidResponse(
                "region result is not a list".to_string(),
            ))
        }
    };
    let Some((header, rows)) = rows.split_first() else {
        return Ok(Vec::new());
    };

    let column = |name: &str| {
        header
            .as_array()
            .and_then(|cols| cols.iter().position(|c| c.as_str() == Some(name)))
            .ok_or_else(|| {
                ProviderError::InvalidResponse(format!("region result has no '{}' column", name))
            })
    };
    let time_col = column("time")?;
    let band_col = column(band)?;

    let mut samples = Vec::with_capacity(rows.len());
    for row in rows {
        let value = row.get(band_col).and_then(Value::as_f64);
        let millis = row.get(time_col).and_then(Value::as_f64);
        let (Some(value), Some(millis)) = (value, millis) else {
            continue;
        };
        let date = DateTime::from_timestamp_millis(millis as i64)
            .ok_or_else(|| {
                ProviderError::InvalidResponse(format!("image time {} out of range", millis))
            })?
            .date_naive();
        samples.push(SeriesSample { date, value });
    }
    Ok(samples)
}

fn map_body(request: &MintRequest) -> Value {
    let palette: Vec<&str> = request
        .palette
        .split(',')
        .filter(|c| !c.is_empty())
        .collect();

    json!({
        "expression": mosaic_expression(request),
        "fileFormat": "PNG",
        "bandIds": request.bands,
        "visualizationOptions": {
            "ranges": [{ "min": request.min, "max": request.max }],
            "paletteColors": palette,
        },
    })
}

fn parse_json<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, ProviderError> {
    serde_json::from_slice(bytes).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}

impl<C: AsyncHttpClient> ImageryProvider for EarthEngineProvider<C> {
    async fn count_assets(&self, query: &AssetQuery) -> Result<u64, ProviderError> {
        let mut count: u64 = 0;
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_LIST_PAGES {
            let url = self.list_images_url(query, page_token.as_deref())?;
            let body = self
                .http_client
                .get_with_bearer(&url, &self.access_token)
                .await?;
            let page: ListImagesResponse = parse_json(&body)?;
            count += page.images.len() as u64;

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(
            collection = %query.collection,
            year = query.year,
            region = %query.region,
            count,
            "Counted upstream assets"
        );
        Ok(count)
    }

    async fn mint_tile_url_template(&self, request: &MintRequest) -> Result<String, ProviderError> {
        let body = map_body(request).to_string();
        let response = self
            .http_client
            .post_json_with_bearer(&self.maps_url(), &self.access_token, &body)
            .await?;
        let map: MapResponse = parse_json(&response)?;
        if map.name.is_empty() {
            return Err(ProviderError::InvalidResponse("map name is empty".to_string()));
        }
        Ok(self.template_for(&map.name))
    }

    async fn fetch_tile(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        self.http_client
            .get_with_bearer(url, &self.access_token)
            .await
    }

    async fn point_series(&self, query: &PointSeriesQuery) -> Result<Vec<SeriesSample>, ProviderError> {
        let body = json!({ "expression": point_series_expression(query) }).to_string();
        let response = self
            .http_client
            .post_json_with_bearer(&self.compute_url(), &self.access_token, &body)
            .await?;
        let computed: ComputeResponse = parse_json(&response)?;
        let samples = parse_region_rows(&computed.result, &query.band)?;

        debug!(
            collection = %query.collection,
            band = %query.band,
            lat = query.lat,
            lon = query.lon,
            samples = samples.len(),
            "Read point series"
        );
        Ok(samples)
    }

    async fn check_connection(&self, collection: &str) -> Result<(), ProviderError> {
        let url = self.check_url(collection)?;
        let body = self
            .http_client
            .get_with_bearer(&url, &self.access_token)
            .await?;
        let _: ListImagesResponse = parse_json(&body)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "Google Earth Engine"
    }
}
