//! Application error types.

use std::fmt;
use std::io;

use crate::cache::ServiceCacheError;
use crate::config::ConfigFileError;
use crate::provider::ProviderError;

/// Errors that can occur during application lifecycle.
#[derive(Debug)]
pub enum AppError {
    /// Failed to start the cache service.
    CacheStart(ServiceCacheError),

    /// Failed to build the upstream HTTP client.
    ProviderCreation(ProviderError),

    /// Configuration error.
    Config(String),

    /// Failed to load the configuration file.
    ConfigFile(ConfigFileError),

    /// Failed to bind or run the HTTP server.
    Server(io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::CacheStart(e) => write!(f, "Failed to start cache service: {}", e),
            AppError::ProviderCreation(e) => write!(f, "Failed to create provider: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::ConfigFile(e) => write!(f, "{}", e),
            AppError::Server(e) => write!(f, "Server error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::CacheStart(e) => Some(e),
            AppError::ProviderCreation(e) => Some(e),
            AppError::Config(_) => None,
            AppError::ConfigFile(e) => Some(e),
            AppError::Server(e) => Some(e),
        }
    }
}

impl From<ServiceCacheError> for AppError {
    fn from(e: ServiceCacheError) -> Self {
        AppError::CacheStart(e)
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::ProviderCreation(e)
    }
}

impl From<ConfigFileError> for AppError {
    fn from(e: ConfigFileError) -> Self {
        AppError::ConfigFile(e)
    }
}

impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        AppError::Server(e)
    }
}
