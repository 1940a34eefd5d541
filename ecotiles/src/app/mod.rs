//! Application bootstrap and lifecycle management.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       EcoTilesApp                         │
//! │                                                           │
//! │  1. CacheService ───────► Arc<dyn Cache>                  │
//! │     └── memory or disk provider                           │
//! │                                                           │
//! │  2. EarthEngineProvider ─► AsyncReqwestClient             │
//! │                                                           │
//! │  3. TileResolver ───────► ServerState ──► axum Router     │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::{EarthEngine, EcoTilesApp};
pub use config::{AppConfig, EarthEngineConfig};
pub use error::AppError;
