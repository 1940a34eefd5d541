//! Application bootstrap implementation.
//!
//! `EcoTilesApp` starts the cache service before anything that depends on it,
//! wires the resolver to the upstream provider, and closes the cache store on
//! shutdown.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use super::config::AppConfig;
use super::error::AppError;
use crate::cache::CacheService;
use crate::capabilities::CapabilityTable;
use crate::provider::{AsyncReqwestClient, EarthEngineProvider, ImageryProvider};
use crate::resolver::TileResolver;
use crate::server::{self, ServerState};

/// The production provider stack.
pub type EarthEngine = EarthEngineProvider<AsyncReqwestClient>;

/// EcoTiles application with service lifecycle management.
///
/// # Example
///
/// ```ignore
/// use ecotiles::app::{AppConfig, EcoTilesApp};
///
/// let app = EcoTilesApp::start(config).await?;
/// app.serve(shutdown_signal()).await?;
/// app.shutdown().await;
/// ```
pub struct EcoTilesApp<P: ImageryProvider = EarthEngine> {
    cache_service: CacheService,
    state: Arc<ServerState<P>>,
    config: AppConfig,
}

impl EcoTilesApp<EarthEngine> {
    /// Start the application against Earth Engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the cache
    /// service fails to start.
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        let ee = &config.earth_engine;
        let client = AsyncReqwestClient::with_timeout(ee.timeout_secs)?;
        let provider = EarthEngineProvider::new(client, ee.project.clone(), ee.access_token.clone())
            .with_base_url(ee.base_url.clone());
        info!(project = %ee.project, base_url = %ee.base_url, "Earth Engine provider configured");
        Self::start_with_provider(config, Arc::new(provider)).await
    }
}

impl<P: ImageryProvider + 'static> EcoTilesApp<P> {
    /// Start the application with an explicit provider.
    pub async fn start_with_provider(config: AppConfig, provider: Arc<P>) -> Result<Self, AppError> {
        let cache_service = CacheService::start(config.cache.clone()).await?;

        let capabilities = CapabilityTable::default_table();
        let cache = cache_service.cache();
        let resolver = TileResolver::new(provider, Arc::clone(&cache), config.resolver.clone())
            .with_dataset(config.dataset.clone())
            .with_capabilities(capabilities.clone());

        info!(
            cache = cache_service.kind(),
            provider = resolver.provider().name(),
            dataset = %config.dataset.id,
            min_zoom = config.resolver.min_zoom,
            max_zoom = config.resolver.max_zoom,
            geocell_precision = config.resolver.geocell_precision,
            url_ttl_hours = config.resolver.url_ttl.num_hours(),
            "EcoTiles started"
        );

        Ok(Self {
            cache_service,
            state: Arc::new(ServerState {
                resolver,
                capabilities,
                cache,
            }),
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn resolver(&self) -> &TileResolver<P> {
        &self.state.resolver
    }

    /// Build the HTTP router over this application's state.
    pub fn router(&self) -> Router {
        server::router(Arc::clone(&self.state))
    }

    /// Bind to the configured address and serve until `shutdown` resolves.
    pub async fn serve<F>(&self, shutdown: F) -> Result<(), AppError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.config.bind).await?;
        self.serve_on(listener, shutdown).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_on<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), AppError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        server::serve(listener, self.router(), shutdown).await?;
        Ok(())
    }

    /// Shut down gracefully, closing the cache store.
    pub async fn shutdown(self) {
        info!("Shutting down EcoTiles");
        self.cache_service.shutdown().await;
    }
}
