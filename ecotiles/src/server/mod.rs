//! HTTP boundary.
//!
//! Every tile route answers `200 image/png`: malformed coordinates, a bad
//! `year` or an unknown `band` produce the not-found placeholder instead of a
//! client error.
//!
//! # Routes
//!
//! | Route | Response |
//! |---|---|
//! | `GET /api/buildings/{x}/{y}/{z}?year=&band=` | tile PNG |
//! | `GET /{x}/{y}/{z}?year=&band=` | tile PNG |
//! | `GET /api/buildings/{lat}/{lon}?band=&start_date=&end_date=` | point series JSON |
//! | `GET /api/capabilities` | capability table as JSON |
//! | `GET /healthz` | `{"status":"ok"}` |
//! | `GET /healthz/ready` | cache and upstream checks, 503 when degraded |
//! | `GET /` | welcome message |
//!
//! The series route is plain JSON: bad parameters get `422`, no data gets
//! `204`, and an upstream failure gets `500`.

mod handlers;
mod health;
mod params;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::cache::Cache;
use crate::capabilities::CapabilityTable;
use crate::provider::ImageryProvider;
use crate::resolver::TileResolver;

pub use health::{check_readiness, DependencyState, DependencyStatus, ReadinessReport};
pub use params::{
    parse_series_request, parse_tile_path, parse_tile_query, SeriesParamError, TileParamError,
};

/// State shared by every handler.
pub struct ServerState<P: ImageryProvider> {
    pub resolver: TileResolver<P>,
    pub capabilities: CapabilityTable,
    /// The store behind both tiers, checked by the readiness route.
    pub cache: Arc<dyn Cache>,
}

/// Build the router for a resolver.
pub fn router<P>(state: Arc<ServerState<P>>) -> Router
where
    P: ImageryProvider + 'static,
{
    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::health))
        .route("/healthz/ready", get(handlers::readiness::<P>))
        .route("/api/capabilities", get(handlers::capabilities::<P>))
        .route("/api/buildings/:x/:y", get(handlers::series::<P>))
        .route("/api/buildings/:x/:y/:z", get(handlers::tile::<P>))
        .route("/:x/:y/:z", get(handlers::tile::<P>))
        .with_state(state)
}

/// Serve `router` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: Option<SocketAddr> = listener.local_addr().ok();
    if let Some(addr) = addr {
        info!(addr = %addr, "Tile server listening");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Tile server stopped");
    Ok(())
}
