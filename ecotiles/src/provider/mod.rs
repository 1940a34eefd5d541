//! Upstream imagery provider abstraction
//!
//! The resolver talks to the upstream through [`ImageryProvider`]: count the
//! assets behind a bucket, mint a tile URL template for them, and fetch
//! individual tiles from an expanded template. The same trait reads point
//! time series and answers readiness checks. [`EarthEngineProvider`] is the
//! production implementation, generic over an [`AsyncHttpClient`].
//!
//! ```ignore
//! use ecotiles::provider::{AsyncReqwestClient, EarthEngineProvider};
//!
//! let http = AsyncReqwestClient::with_timeout(30)?;
//! let provider = EarthEngineProvider::new(http, "my-project", token);
//! ```

mod earth_engine;
mod http;
mod types;

pub use earth_engine::{EarthEngineProvider, DEFAULT_BASE_URL};
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use types::{
    expand_template, AssetQuery, ImageryProvider, MintRequest, PointSeriesQuery, ProviderError,
    SeriesSample,
};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
