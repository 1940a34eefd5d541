//! Cache-aside tile resolution.
//!
//! Each request walks the same stages:
//!
//! ```text
//! Validating ─► ImageCacheCheck ─► UrlCacheCheck ─► UpstreamResolve ─► Fetch ─► Done
//!     │               │ hit              │ valid           │ no assets     │ error
//!     ▼               ▼                  └────────────────►│               ▼
//! Placeholder      Success                    (skip)       ▼          RenderedError
//!                                                      Placeholder
//! ```
//!
//! Nothing is locked between checking a tier and writing it, so concurrent
//! misses on the same key each do the upstream work and write equal values.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, error, info};

use super::clock::{Clock, SystemClock};
use super::types::{ResolveError, TileOutcome, TileRequest};
use crate::cache::{
    BucketKey, Cache, CachedUrlEntry, ImageCacheClient, TileKey, UrlTemplateCacheClient,
};
use crate::capabilities::CapabilityTable;
use crate::dataset::DatasetSpec;
use crate::fallback::PlaceholderKind;
use crate::geocell::{self, GeoCell, GeocellError};
use crate::provider::{expand_template, AssetQuery, ImageryProvider, MintRequest, ProviderError};

/// Default lowest served zoom level.
pub const DEFAULT_MIN_ZOOM: u8 = 10;
/// Default highest served zoom level.
pub const DEFAULT_MAX_ZOOM: u8 = 18;
/// Default geocell precision.
pub const DEFAULT_GEOCELL_PRECISION: usize = 3;
/// Default lifetime of a minted URL template in hours.
pub const DEFAULT_URL_TTL_HOURS: i64 = 24;
/// Longest accepted URL template lifetime in hours (one year).
pub const MAX_URL_TTL_HOURS: i64 = 24 * 365;

/// Resolver settings fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub geocell_precision: usize,
    pub url_ttl: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            geocell_precision: DEFAULT_GEOCELL_PRECISION,
            url_ttl: Duration::hours(DEFAULT_URL_TTL_HOURS),
        }
    }
}

impl ResolverConfig {
    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_geocell_precision(mut self, precision: usize) -> Self {
        self.geocell_precision = precision;
        self
    }

    pub fn with_url_ttl(mut self, ttl: Duration) -> Self {
        self.url_ttl = ttl;
        self
    }

    pub fn zoom_supported(&self, z: u8) -> bool {
        (self.min_zoom..=self.max_zoom).contains(&z)
    }
}

/// Keys a tile request maps to.
#[derive(Debug, Clone, PartialEq)]
pub struct TileKeys {
    pub cell: GeoCell,
    pub bucket: BucketKey,
    pub tile: TileKey,
}

/// Resolves tile requests through the two cache tiers and the upstream.
pub struct TileResolver<P: ImageryProvider> {
    provider: Arc<P>,
    url_cache: UrlTemplateCacheClient,
    image_cache: ImageCacheClient,
    dataset: DatasetSpec,
    capabilities: CapabilityTable,
    clock: Arc<dyn Clock>,
    config: ResolverConfig,
}

impl<P: ImageryProvider> TileResolver<P> {
    /// Create a resolver for Open Buildings with the built-in capability table
    /// and the system clock.
    pub fn new(provider: Arc<P>, cache: Arc<dyn Cache>, config: ResolverConfig) -> Self {
        Self {
            provider,
            url_cache: UrlTemplateCacheClient::new(Arc::clone(&cache)),
            image_cache: ImageCacheClient::new(cache),
            dataset: DatasetSpec::open_buildings(),
            capabilities: CapabilityTable::default_table(),
            clock: Arc::new(SystemClock),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_dataset(mut self, dataset: DatasetSpec) -> Self {
        self.dataset = dataset;
        self
    }

    pub fn with_capabilities(mut self, capabilities: CapabilityTable) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn dataset(&self) -> &DatasetSpec {
        &self.dataset
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Derive the geocell and both cache keys for a request.
    pub fn keys_for(&self, request: &TileRequest) -> Result<TileKeys, GeocellError> {
        let cell = geocell::cell_for_tile(&request.tile, self.config.geocell_precision)?;
        let bucket = BucketKey::new(
            &self.dataset.id,
            request.band.as_str(),
            request.year,
            &cell,
        );
        let tile = TileKey::for_tile(&bucket, &request.tile);
        Ok(TileKeys { cell, bucket, tile })
    }

    /// Resolve a request to an outcome. Never fails.
    pub async fn resolve(&self, request: &TileRequest) -> TileOutcome {
        let tile = request.tile;

        // Validating
        if !self.config.zoom_supported(tile.z) {
            debug!(tile = %tile, "Zoom level outside served range");
            return TileOutcome::Placeholder(PlaceholderKind::ZoomUnsupported);
        }
        if !tile.is_within_pyramid() {
            debug!(tile = %tile, "Tile outside the zoom level's grid");
            return TileOutcome::Placeholder(PlaceholderKind::NotFound);
        }
        if !self
            .capabilities
            .is_valid_year(&self.dataset.id, request.year)
        {
            debug!(dataset = %self.dataset.id, year = request.year, "Year not available");
            return TileOutcome::Placeholder(PlaceholderKind::NotFound);
        }

        let keys = match self.keys_for(request) {
            Ok(keys) => keys,
            Err(e) => {
                error!(tile = %tile, error = %e, "Failed to derive geocell");
                return TileOutcome::Placeholder(PlaceholderKind::NotFound);
            }
        };

        // ImageCacheCheck
        if let Some(bytes) = self.image_cache.get(&keys.tile).await {
            debug!(tile_key = %keys.tile, "Image cache hit");
            return TileOutcome::Success(bytes);
        }

        // UrlCacheCheck, then UpstreamResolve on miss or expiry
        let template = match self.cached_template(&keys.bucket).await {
            Some(template) => template,
            None => match self.mint(request, &keys).await {
                Ok(Some(template)) => template,
                Ok(None) => {
                    debug!(tile_key = %keys.tile, "No upstream assets for bucket");
                    return TileOutcome::Placeholder(PlaceholderKind::NotFound);
                }
                Err(e) => {
                    error!(tile_key = %keys.tile, error = %e, "Tile URL resolution failed");
                    return TileOutcome::error(format!("Error: {}", e));
                }
            },
        };

        // Fetch
        match self.fetch(&template, request).await {
            Ok(bytes) => {
                self.image_cache.set(&keys.tile, bytes.clone()).await;
                info!(tile_key = %keys.tile, bytes = bytes.len(), "Tile generated");
                TileOutcome::Success(bytes)
            }
            Err(e) => {
                error!(tile_key = %keys.tile, error = %e, "Tile fetch failed");
                TileOutcome::error(format!("Error: {}", e))
            }
        }
    }

    async fn cached_template(&self, bucket: &BucketKey) -> Option<String> {
        let entry = self.url_cache.get(bucket).await?;
        if entry.is_valid(self.clock.now(), self.config.url_ttl) {
            debug!(bucket = %bucket, "URL cache hit");
            Some(entry.template)
        } else {
            debug!(bucket = %bucket, issued_at = %entry.issued_at, "URL cache entry expired");
            None
        }
    }

    /// Count assets for the bucket and mint a template if there are any.
    ///
    /// Returns `Ok(None)` when the bucket has no assets; nothing is written in
    /// that case.
    async fn mint(
        &self,
        request: &TileRequest,
        keys: &TileKeys,
    ) -> Result<Option<String>, ResolveError> {
        let region = geocell::covering_region(&keys.cell, self.config.min_zoom);
        let query = AssetQuery::new(&self.dataset.collection, request.year, region);

        let count = self
            .provider
            .count_assets(&query)
            .await
            .map_err(ResolveError::Query)?;
        if count == 0 {
            return Ok(None);
        }

        let mint_request = MintRequest::new(query, self.dataset.visparams(request.band));
        let template = self
            .provider
            .mint_tile_url_template(&mint_request)
            .await
            .map_err(ResolveError::Mint)?;

        let entry = CachedUrlEntry::new(template.clone(), self.clock.now());
        self.url_cache.set(&keys.bucket, &entry).await;
        debug!(bucket = %keys.bucket, assets = count, "Minted tile URL template");

        Ok(Some(template))
    }

    async fn fetch(&self, template: &str, request: &TileRequest) -> Result<Vec<u8>, ResolveError> {
        let tile = request.tile;
        let url = expand_template(template, tile.x, tile.y, tile.z);
        let bytes = self
            .provider
            .fetch_tile(&url)
            .await
            .map_err(ResolveError::Fetch)?;
        if bytes.is_empty() {
            return Err(ResolveError::Fetch(ProviderError::InvalidResponse(
                "empty tile body".to_string(),
            )));
        }
        Ok(bytes)
    }
}
