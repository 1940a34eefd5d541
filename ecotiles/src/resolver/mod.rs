//! Tile resolution.
//!
//! [`TileResolver`] turns a [`TileRequest`] into a [`TileOutcome`], going
//! through the image tier, the URL tier and the upstream provider in that
//! order. Every outcome, including failures, renders to a PNG.

mod clock;
mod engine;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{
    ResolverConfig, TileKeys, TileResolver, DEFAULT_GEOCELL_PRECISION, DEFAULT_MAX_ZOOM,
    DEFAULT_MIN_ZOOM, DEFAULT_URL_TTL_HOURS, MAX_URL_TTL_HOURS,
};
pub use types::{ResolveError, TileOutcome, TileRequest};
