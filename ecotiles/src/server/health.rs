//! Readiness checks for the cache store and the upstream.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::warn;

use crate::cache::{Cache, ServiceCacheError};
use crate::provider::ImageryProvider;

static CHECK_SEQ: AtomicU64 = AtomicU64::new(0);

/// Outcome of one dependency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyState {
    Connected,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyStatus {
    pub provider: String,
    pub status: DependencyState,
}

/// Body of `GET /healthz/ready`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadinessReport {
    /// `"ok"` when every dependency is connected, `"degraded"` otherwise.
    pub status: &'static str,
    pub cache: DependencyStatus,
    pub upstream: DependencyStatus,
}

impl ReadinessReport {
    pub fn is_ready(&self) -> bool {
        self.cache.status == DependencyState::Connected
            && self.upstream.status == DependencyState::Connected
    }
}

/// Write, read back and delete a key unique to this check.
async fn check_cache(cache: &dyn Cache) -> DependencyState {
    let key = format!(
        "ecotiles/healthz/{}/{}",
        std::process::id(),
        CHECK_SEQ.fetch_add(1, Ordering::Relaxed)
    );
    let marker = key.as_bytes().to_vec();

    let round_trip = async {
        cache.set(&key, marker.clone()).await?;
        let read = cache.get(&key).await?;
        cache.delete(&key).await?;
        Ok::<_, ServiceCacheError>(read.as_deref() == Some(marker.as_slice()))
    };

    match round_trip.await {
        Ok(true) => DependencyState::Connected,
        Ok(false) => {
            warn!(cache = cache.name(), "Cache returned a different value on readback");
            DependencyState::Error
        }
        Err(e) => {
            warn!(cache = cache.name(), error = %e, "Cache readiness check failed");
            DependencyState::Error
        }
    }
}

async fn check_upstream<P: ImageryProvider>(provider: &P, collection: &str) -> DependencyState {
    match provider.check_connection(collection).await {
        Ok(()) => DependencyState::Connected,
        Err(e) => {
            warn!(provider = provider.name(), error = %e, "Upstream readiness check failed");
            DependencyState::Error
        }
    }
}

/// Check the store and the upstream concurrently.
pub async fn check_readiness<P: ImageryProvider>(
    cache: &dyn Cache,
    provider: &P,
    collection: &str,
) -> ReadinessReport {
    let (cache_state, upstream_state) =
        tokio::join!(check_cache(cache), check_upstream(provider, collection));

    let mut report = ReadinessReport {
        status: "ok",
        cache: DependencyStatus {
            provider: cache.name().to_string(),
            status: cache_state,
        },
        upstream: DependencyStatus {
            provider: provider.name().to_string(),
            status: upstream_state,
        },
    };
    if !report.is_ready() {
        report.status = "degraded";
    }
    report
}
