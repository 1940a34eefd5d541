//! End-to-end resolution through the cache tiers with a scripted provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, TimeZone, Utc};
use ecotiles::cache::{BucketKey, Cache, CachedUrlEntry, MemoryCacheProvider};
use ecotiles::capabilities::{CapabilityTable, CollectionCapability};
use ecotiles::coord::TileCoord;
use ecotiles::dataset::{Band, DatasetSpec};
use ecotiles::fallback::PlaceholderKind;
use ecotiles::provider::{
    AssetQuery, ImageryProvider, MintRequest, PointSeriesQuery, ProviderError, SeriesSample,
};
use ecotiles::resolver::{
    Clock, ManualClock, ResolverConfig, TileOutcome, TileRequest, TileResolver,
};

const TEMPLATE: &str = "https://tiles.example/v1/maps/abc/tiles/{z}/{x}/{y}";

/// Provider whose answers are fixed up front and whose calls are counted.
struct ScriptedProvider {
    assets: u64,
    template: Result<String, ProviderError>,
    tile: Result<Vec<u8>, ProviderError>,
    counts: AtomicUsize,
    mints: AtomicUsize,
    fetches: AtomicUsize,
    fetched_urls: Mutex<Vec<String>>,
    last_query: Mutex<Option<AssetQuery>>,
}

impl ScriptedProvider {
    fn new(assets: u64, tile: Result<Vec<u8>, ProviderError>) -> Self {
        Self {
            assets,
            template: Ok(TEMPLATE.to_string()),
            tile,
            counts: AtomicUsize::new(0),
            mints: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
            fetched_urls: Mutex::new(Vec::new()),
            last_query: Mutex::new(None),
        }
    }

    fn failing_mint(error: ProviderError) -> Self {
        Self {
            template: Err(error),
            ..Self::new(1, Ok(vec![1]))
        }
    }

    fn upstream_calls(&self) -> usize {
        self.counts.load(Ordering::SeqCst)
            + self.mints.load(Ordering::SeqCst)
            + self.fetches.load(Ordering::SeqCst)
    }
}

impl ImageryProvider for ScriptedProvider {
    async fn count_assets(&self, query: &AssetQuery) -> Result<u64, ProviderError> {
        self.counts.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        Ok(self.assets)
    }

    async fn mint_tile_url_template(&self, _request: &MintRequest) -> Result<String, ProviderError> {
        self.mints.fetch_add(1, Ordering::SeqCst);
        self.template.clone()
    }

    async fn fetch_tile(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.fetched_urls.lock().unwrap().push(url.to_string());
        self.tile.clone()
    }

    async fn point_series(&self, _query: &PointSeriesQuery) -> Result<Vec<SeriesSample>, ProviderError> {
        Ok(Vec::new())
    }

    async fn check_connection(&self, _collection: &str) -> Result<(), ProviderError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct Harness {
    resolver: TileResolver<ScriptedProvider>,
    provider: Arc<ScriptedProvider>,
    cache: Arc<dyn Cache>,
    clock: Arc<ManualClock>,
}

fn harness(provider: ScriptedProvider) -> Harness {
    let provider = Arc::new(provider);
    let cache: Arc<dyn Cache> = Arc::new(MemoryCacheProvider::new(10 * 1024 * 1024));
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    ));
    let resolver = TileResolver::new(
        Arc::clone(&provider),
        Arc::clone(&cache),
        ResolverConfig::default(),
    )
    .with_clock(clock.clone())
    .with_capabilities(CapabilityTable::default_table_for(2024));
    Harness {
        resolver,
        provider,
        cache,
        clock,
    }
}

fn request(x: u32, y: u32, z: u8) -> TileRequest {
    TileRequest::new(TileCoord::new(x, y, z), 2020, Band::Presence)
}

#[tokio::test]
async fn test_bucket_without_assets_is_not_found_and_writes_nothing() {
    let h = harness(ScriptedProvider::new(0, Ok(vec![1])));

    let outcome = h.resolver.resolve(&request(512, 300, 10)).await;

    assert_eq!(outcome, TileOutcome::Placeholder(PlaceholderKind::NotFound));
    assert_eq!(h.provider.counts.load(Ordering::SeqCst), 1);
    assert_eq!(h.provider.mints.load(Ordering::SeqCst), 0);
    assert_eq!(h.provider.fetches.load(Ordering::SeqCst), 0);
    assert_eq!(h.cache.entry_count(), 0);
}

#[tokio::test]
async fn test_miss_mints_fetches_and_fills_both_tiers() {
    let h = harness(ScriptedProvider::new(3, Ok(vec![0x89, b'P', b'N', b'G'])));
    let req = request(512, 300, 10);

    let outcome = h.resolver.resolve(&req).await;

    assert_eq!(outcome, TileOutcome::Success(vec![0x89, b'P', b'N', b'G']));
    let keys = h.resolver.keys_for(&req).unwrap();
    let raw = h.cache.get(keys.bucket.as_str()).await.unwrap().unwrap();
    let entry = CachedUrlEntry::from_bytes(&raw).unwrap();
    assert_eq!(entry.template, TEMPLATE);
    assert_eq!(entry.issued_at, h.clock.now());
    assert_eq!(
        h.cache.get(keys.tile.as_str()).await.unwrap(),
        Some(vec![0x89, b'P', b'N', b'G'])
    );
    assert_eq!(
        h.provider.fetched_urls.lock().unwrap().as_slice(),
        ["https://tiles.example/v1/maps/abc/tiles/10/512/300"]
    );
}

#[tokio::test]
async fn test_query_region_covers_the_bucket_cell() {
    let h = harness(ScriptedProvider::new(1, Ok(vec![1])));
    let req = request(512, 300, 10);
    h.resolver.resolve(&req).await;

    let query = h.provider.last_query.lock().unwrap().clone().unwrap();
    let cell = h.resolver.keys_for(&req).unwrap().cell;
    assert!(query.region.contains(&cell.bounding_box(), 1e-9));
    assert_eq!(query.collection, DatasetSpec::open_buildings().collection);
    assert_eq!(query.year, 2020);
}

#[tokio::test]
async fn test_second_tile_in_same_cell_reuses_template() {
    let h = harness(ScriptedProvider::new(1, Ok(vec![5])));

    h.resolver.resolve(&request(512, 300, 10)).await;
    h.clock.advance(Duration::seconds(1));
    let outcome = h.resolver.resolve(&request(513, 301, 10)).await;

    assert_eq!(outcome, TileOutcome::Success(vec![5]));
    assert_eq!(h.provider.counts.load(Ordering::SeqCst), 1);
    assert_eq!(h.provider.mints.load(Ordering::SeqCst), 1);
    assert_eq!(h.provider.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_repeated_request_is_served_from_image_tier() {
    let h = harness(ScriptedProvider::new(1, Ok(vec![9, 9])));
    let req = request(512, 300, 10);

    h.resolver.resolve(&req).await;
    let calls = h.provider.upstream_calls();
    let outcome = h.resolver.resolve(&req).await;

    assert_eq!(outcome, TileOutcome::Success(vec![9, 9]));
    assert_eq!(h.provider.upstream_calls(), calls);
}

#[tokio::test]
async fn test_preseeded_image_is_returned_without_upstream_calls() {
    let provider = Arc::new(ScriptedProvider::new(1, Ok(vec![0])));
    let cache: Arc<dyn Cache> = Arc::new(MemoryCacheProvider::new(1024 * 1024));
    let mut dataset = DatasetSpec::open_buildings();
    dataset.id = "ds".to_string();
    let resolver = TileResolver::new(
        Arc::clone(&provider),
        Arc::clone(&cache),
        ResolverConfig::default(),
    )
    .with_dataset(dataset)
    .with_capabilities(CapabilityTable::new(vec![CollectionCapability::new(
        "ds",
        2016..=2024,
    )]));

    let req = TileRequest::new(TileCoord::new(512, 300, 10), 2024, Band::Presence);
    let cell = resolver.keys_for(&req).unwrap().cell;
    let key = format!("ds_presence_2024/{}/10/512_300.png", cell);
    cache.set(&key, b"seeded-bytes".to_vec()).await.unwrap();

    let outcome = resolver.resolve(&req).await;

    assert_eq!(outcome, TileOutcome::Success(b"seeded-bytes".to_vec()));
    assert_eq!(provider.upstream_calls(), 0);
}

#[tokio::test]
async fn test_zoom_bounds_are_inclusive() {
    let h = harness(ScriptedProvider::new(1, Ok(vec![1])));

    for z in [9u8, 19] {
        let outcome = h.resolver.resolve(&request(0, 0, z)).await;
        assert_eq!(
            outcome,
            TileOutcome::Placeholder(PlaceholderKind::ZoomUnsupported)
        );
    }
    assert_eq!(h.provider.upstream_calls(), 0);

    for z in [10u8, 18] {
        let outcome = h.resolver.resolve(&request(0, 0, z)).await;
        assert!(outcome.is_success(), "z{} should be served", z);
    }
}

#[tokio::test]
async fn test_expired_template_is_reminted_once_and_overwritten() {
    let h = harness(ScriptedProvider::new(1, Ok(vec![4])));
    let req = request(512, 300, 10);
    let keys = h.resolver.keys_for(&req).unwrap();

    let stale_time = h.clock.now() - Duration::hours(25);
    let stale = CachedUrlEntry::new("https://stale.example/{z}/{x}/{y}", stale_time);
    h.cache
        .set(keys.bucket.as_str(), stale.to_bytes())
        .await
        .unwrap();

    let outcome = h.resolver.resolve(&req).await;

    assert_eq!(outcome, TileOutcome::Success(vec![4]));
    assert_eq!(h.provider.mints.load(Ordering::SeqCst), 1);
    let raw = h.cache.get(keys.bucket.as_str()).await.unwrap().unwrap();
    let entry = CachedUrlEntry::from_bytes(&raw).unwrap();
    assert_eq!(entry.template, TEMPLATE);
    assert_eq!(entry.issued_at, h.clock.now());
}

#[tokio::test]
async fn test_fresh_template_is_used_without_minting() {
    let h = harness(ScriptedProvider::new(1, Ok(vec![4])));
    let req = request(512, 300, 10);
    let bucket = BucketKey::new(
        "open_buildings",
        "presence",
        2020,
        &h.resolver.keys_for(&req).unwrap().cell,
    );
    let issued = h.clock.now() - Duration::hours(23);
    let entry = CachedUrlEntry::new("https://fresh.example/{z}/{x}/{y}", issued);
    h.cache.set(bucket.as_str(), entry.to_bytes()).await.unwrap();

    h.resolver.resolve(&req).await;

    assert_eq!(h.provider.counts.load(Ordering::SeqCst), 0);
    assert_eq!(h.provider.mints.load(Ordering::SeqCst), 0);
    assert_eq!(
        h.provider.fetched_urls.lock().unwrap().as_slice(),
        ["https://fresh.example/10/512/300"]
    );
}

#[tokio::test]
async fn test_fetch_failure_renders_error_and_caches_no_image() {
    let h = harness(ScriptedProvider::new(
        1,
        Err(ProviderError::HttpError("HTTP 500".to_string())),
    ));
    let req = request(512, 300, 10);

    let outcome = h.resolver.resolve(&req).await;

    match outcome {
        TileOutcome::RenderedError { message, image } => {
            assert!(message.starts_with("Error: "));
            assert!(message.contains("HTTP 500"));
            assert!(image.starts_with(&[0x89, b'P', b'N', b'G']));
        }
        other => panic!("expected rendered error, got {:?}", other),
    }
    let keys = h.resolver.keys_for(&req).unwrap();
    assert!(!h.cache.contains(keys.tile.as_str()).await.unwrap());
}

#[tokio::test]
async fn test_empty_tile_body_is_an_error() {
    let h = harness(ScriptedProvider::new(1, Ok(Vec::new())));
    let req = request(512, 300, 10);

    let outcome = h.resolver.resolve(&req).await;

    assert!(matches!(outcome, TileOutcome::RenderedError { .. }));
    let keys = h.resolver.keys_for(&req).unwrap();
    assert!(!h.cache.contains(keys.tile.as_str()).await.unwrap());
}

#[tokio::test]
async fn test_fetch_timeout_renders_error_and_caches_no_image() {
    let h = harness(ScriptedProvider::new(
        1,
        Err(ProviderError::Timeout("tile fetch after 30s".to_string())),
    ));
    let req = request(512, 300, 10);

    let outcome = h.resolver.resolve(&req).await;

    let TileOutcome::RenderedError { message, .. } = outcome else {
        panic!("expected rendered error, got {:?}", outcome);
    };
    assert!(message.contains("timed out"));
    let keys = h.resolver.keys_for(&req).unwrap();
    assert!(!h.cache.contains(keys.tile.as_str()).await.unwrap());
    // The template was minted before the fetch failed and stays usable.
    assert!(h.cache.contains(keys.bucket.as_str()).await.unwrap());
}

#[tokio::test]
async fn test_mint_failure_renders_error_and_writes_no_tier() {
    let h = harness(ScriptedProvider::failing_mint(ProviderError::HttpError(
        "HTTP 403".to_string(),
    )));
    let req = request(512, 300, 10);

    let outcome = h.resolver.resolve(&req).await;

    let TileOutcome::RenderedError { message, image } = outcome else {
        panic!("expected rendered error, got {:?}", outcome);
    };
    assert!(message.contains("HTTP 403"));
    assert!(image.starts_with(&[0x89, b'P', b'N', b'G']));
    assert_eq!(h.provider.mints.load(Ordering::SeqCst), 1);
    assert_eq!(h.provider.fetches.load(Ordering::SeqCst), 0);
    let keys = h.resolver.keys_for(&req).unwrap();
    assert!(!h.cache.contains(keys.bucket.as_str()).await.unwrap());
    assert!(!h.cache.contains(keys.tile.as_str()).await.unwrap());
    assert_eq!(h.cache.entry_count(), 0);
}

#[tokio::test]
async fn test_mint_timeout_is_retried_on_next_request() {
    let h = harness(ScriptedProvider::failing_mint(ProviderError::Timeout(
        "mint after 30s".to_string(),
    )));
    let req = request(512, 300, 10);

    h.resolver.resolve(&req).await;
    h.resolver.resolve(&req).await;

    assert_eq!(h.provider.counts.load(Ordering::SeqCst), 2);
    assert_eq!(h.provider.mints.load(Ordering::SeqCst), 2);
}
