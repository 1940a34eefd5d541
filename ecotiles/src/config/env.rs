//! `ECOTILES_*` environment overrides.
//!
//! Applied after the INI file so deployments can inject secrets without
//! writing them to disk.

use std::str::FromStr;

use super::defaults::MAX_URL_TTL_HOURS;
use super::file::ConfigFileError;
use super::settings::{CacheBackend, ConfigFile, CACHE_BACKEND_CHOICES};

pub const ENV_ACCESS_TOKEN: &str = "ECOTILES_ACCESS_TOKEN";
pub const ENV_PROJECT: &str = "ECOTILES_PROJECT";
pub const ENV_BIND: &str = "ECOTILES_BIND";
pub const ENV_URL_TTL_HOURS: &str = "ECOTILES_URL_TTL_HOURS";
pub const ENV_CACHE_PROVIDER: &str = "ECOTILES_CACHE_PROVIDER";
pub const ENV_CACHE_URL: &str = "ECOTILES_CACHE_URL";

fn invalid_env(var: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl ConfigFile {
    /// Overlay environment values onto this configuration.
    ///
    /// `lookup` resolves a variable name; empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigFileError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(token) = get(ENV_ACCESS_TOKEN) {
            self.provider.access_token = Some(token.trim().to_string());
        }
        if let Some(project) = get(ENV_PROJECT) {
            self.provider.project = Some(project.trim().to_string());
        }
        if let Some(bind) = get(ENV_BIND) {
            self.server.bind = bind.trim().to_string();
        }
        if let Some(ttl) = get(ENV_URL_TTL_HOURS) {
            let hours: i64 = ttl
                .trim()
                .parse()
                .ok()
                .filter(|h| (1..=MAX_URL_TTL_HOURS).contains(h))
                .ok_or_else(|| {
                    invalid_env(
                        ENV_URL_TTL_HOURS,
                        &ttl,
                        &format!("must be between 1 and {} (hours)", MAX_URL_TTL_HOURS),
                    )
                })?;
            self.tiles.url_ttl_hours = hours;
        }
        if let Some(provider) = get(ENV_CACHE_PROVIDER) {
            self.cache.provider = CacheBackend::from_str(&provider)
                .map_err(|_| invalid_env(ENV_CACHE_PROVIDER, &provider, CACHE_BACKEND_CHOICES))?;
        }
        if let Some(url) = get(ENV_CACHE_URL) {
            self.cache.url = url.trim().to_string();
        }
        Ok(())
    }
}
