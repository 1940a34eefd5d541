use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use chrono::{Datelike, Utc};
use serde_json::{json, Value};
use tracing::{debug, error};

use super::health::check_readiness;
use super::params::{parse_series_request, parse_tile_path, parse_tile_query, TileParamError};
use super::ServerState;
use crate::fallback::PlaceholderKind;
use crate::provider::ImageryProvider;
use crate::resolver::{TileOutcome, TileRequest};
use crate::timeseries;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to EcoTiles",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /healthz
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /healthz/ready
pub async fn readiness<P: ImageryProvider + 'static>(
    State(state): State<Arc<ServerState<P>>>,
) -> Response {
    let report = check_readiness(
        state.cache.as_ref(),
        state.resolver.provider(),
        &state.resolver.dataset().collection,
    )
    .await;
    let status = if report.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report)).into_response()
}

/// GET /api/capabilities
pub async fn capabilities<P: ImageryProvider + 'static>(
    State(state): State<Arc<ServerState<P>>>,
) -> Response {
    Json(&state.capabilities).into_response()
}

/// GET /{x}/{y}/{z}
pub async fn tile<P: ImageryProvider + 'static>(
    State(state): State<Arc<ServerState<P>>>,
    path: Option<Path<(String, String, String)>>,
    query: Option<Query<HashMap<String, String>>>,
) -> Response {
    let (x, y, z) = path.map(|Path(p)| p).unwrap_or_default();
    let query = query.map(|Query(q)| q).unwrap_or_default();

    let parsed = parse_tile_path(&x, &y, &z).and_then(|tile| {
        let (year, band) = parse_tile_query(&query, Utc::now().year())?;
        Ok(TileRequest::new(tile, year, band))
    });

    let outcome = match parsed {
        Ok(request) => state.resolver.resolve(&request).await,
        Err(TileParamError::ZoomOutOfRange(level)) => {
            debug!(z = level, "Zoom level outside served range");
            TileOutcome::Placeholder(PlaceholderKind::ZoomUnsupported)
        }
        Err(e) => {
            debug!(x = %x, y = %y, z = %z, error = %e, "Unreadable tile request");
            TileOutcome::Placeholder(PlaceholderKind::NotFound)
        }
    };

    let (body, content_type) = outcome.into_response_parts();
    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}

fn detail(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

/// GET /api/buildings/{lat}/{lon}
pub async fn series<P: ImageryProvider + 'static>(
    State(state): State<Arc<ServerState<P>>>,
    path: Option<Path<(String, String)>>,
    query: Option<Query<HashMap<String, String>>>,
) -> Response {
    let (lat, lon) = path.map(|Path(p)| p).unwrap_or_default();
    let query = query.map(|Query(q)| q).unwrap_or_default();

    let request = match parse_series_request(&lat, &lon, &query, Utc::now().date_naive()) {
        Ok(request) => request,
        Err(e) => {
            debug!(lat = %lat, lon = %lon, error = %e, "Unreadable series request");
            return detail(StatusCode::UNPROCESSABLE_ENTITY, e.to_string());
        }
    };

    let resolver = &state.resolver;
    match timeseries::band_series(resolver.provider(), resolver.dataset(), &request).await {
        Ok(Some(traces)) => Json(traces).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!(lat = request.lat, lon = request.lon, error = %e, "Point series failed");
            detail(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{} error: {}", resolver.provider().name(), e),
            )
        }
    }
}
