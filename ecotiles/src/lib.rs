//! EcoTiles - XYZ tiles for Earth Engine imagery
//!
//! Serves slippy-map tiles for a yearly image collection, bucketing tiles by
//! geohash so that every tile in one geocell shares a single upstream URL
//! template. Both the templates and the fetched images are kept in a
//! cache-aside store; every request answers with a PNG, including failures.
//! A point time series route reads the same dataset at a single location.
//!
//! # High-Level API
//!
//! ```ignore
//! use ecotiles::app::{AppConfig, EcoTilesApp};
//! use ecotiles::config::ConfigFile;
//!
//! let file = ConfigFile::load_with_env(None)?;
//! let app = EcoTilesApp::start(AppConfig::from_config_file(&file)?).await?;
//! app.serve(tokio::signal::ctrl_c().map(|_| ())).await?;
//! app.shutdown().await;
//! ```

pub mod app;
pub mod cache;
pub mod capabilities;
pub mod config;
pub mod coord;
pub mod dataset;
pub mod fallback;
pub mod geocell;
pub mod logging;
pub mod provider;
pub mod resolver;
pub mod server;
pub mod timeseries;

/// Version of the EcoTiles library and CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
