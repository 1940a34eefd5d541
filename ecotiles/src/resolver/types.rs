//! Request and outcome types for tile resolution.

use std::borrow::Cow;

use thiserror::Error;

use crate::coord::TileCoord;
use crate::dataset::Band;
use crate::fallback::{self, PlaceholderKind, TILE_CONTENT_TYPE};
use crate::provider::ProviderError;

/// A single tile request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRequest {
    pub tile: TileCoord,
    pub year: i32,
    pub band: Band,
}

impl TileRequest {
    pub fn new(tile: TileCoord, year: i32, band: Band) -> Self {
        Self { tile, year, band }
    }
}

/// Result of resolving a tile. Every variant renders to an image.
#[derive(Debug, Clone, PartialEq)]
pub enum TileOutcome {
    /// Imagery from the cache or the upstream provider.
    Success(Vec<u8>),
    /// A static placeholder.
    Placeholder(PlaceholderKind),
    /// An error tile carrying `message`.
    RenderedError { message: String, image: Vec<u8> },
}

impl TileOutcome {
    /// Render an error tile for `message`.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        let image = fallback::render_error(&message);
        Self::RenderedError { message, image }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TileOutcome::Success(_))
    }

    /// Image bytes and content type for the HTTP response.
    pub fn into_response_parts(self) -> (Cow<'static, [u8]>, &'static str) {
        let body = match self {
            TileOutcome::Success(bytes) => Cow::Owned(bytes),
            TileOutcome::Placeholder(kind) => Cow::Borrowed(fallback::placeholder(kind)),
            TileOutcome::RenderedError { image, .. } => Cow::Owned(image),
        };
        (body, TILE_CONTENT_TYPE)
    }
}

/// Upstream failures while resolving a tile.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("asset query failed: {0}")]
    Query(#[source] ProviderError),

    #[error("minting tile URL failed: {0}")]
    Mint(#[source] ProviderError),

    #[error("tile fetch failed: {0}")]
    Fetch(#[source] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parts_for_each_variant() {
        let (body, ct) = TileOutcome::Success(vec![1, 2, 3]).into_response_parts();
        assert_eq!(&*body, &[1, 2, 3]);
        assert_eq!(ct, "image/png");

        let (body, _) = TileOutcome::Placeholder(PlaceholderKind::NotFound).into_response_parts();
        assert_eq!(&*body, fallback::placeholder(PlaceholderKind::NotFound));

        let outcome = TileOutcome::error("Error: boom");
        let TileOutcome::RenderedError { message, image } = outcome.clone() else {
            panic!("expected rendered error");
        };
        assert_eq!(message, "Error: boom");
        let (body, _) = outcome.into_response_parts();
        assert_eq!(&*body, image.as_slice());
    }

    #[test]
    fn test_resolve_error_display() {
        let err = ResolveError::Fetch(ProviderError::HttpError("HTTP 500".into()));
        assert_eq!(err.to_string(), "tile fetch failed: HTTP error: HTTP 500");
    }
}
