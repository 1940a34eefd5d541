//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::{CacheBackend, ConfigFile, CACHE_BACKEND_CHOICES};
use super::size::parse_size;
use super::defaults::MAX_URL_TTL_HOURS;
use crate::coord::MAX_ZOOM;
use crate::dataset::DatasetSpec;
use crate::geocell::MAX_PRECISION;

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(
    props: &Properties,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    match props.get(key) {
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(section, key, v, reason)),
        None => Ok(None),
    }
}

fn non_empty(props: &Properties, key: &str) -> Option<String> {
    props
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [server] section
    if let Some(section) = ini.section(Some("server")) {
        if let Some(v) = non_empty(section, "bind") {
            config.server.bind = v;
        }
    }

    // [tiles] section
    if let Some(section) = ini.section(Some("tiles")) {
        let zoom_reason = format!("must be an integer between 0 and {}", MAX_ZOOM);
        if let Some(v) = parse_number::<u8>(section, "tiles", "min_zoom", &zoom_reason)? {
            config.tiles.min_zoom = v;
        }
        if let Some(v) = parse_number::<u8>(section, "tiles", "max_zoom", &zoom_reason)? {
            config.tiles.max_zoom = v;
        }
        let precision_reason = format!("must be an integer between 0 and {}", MAX_PRECISION);
        if let Some(v) =
            parse_number::<usize>(section, "tiles", "geocell_precision", &precision_reason)?
        {
            config.tiles.geocell_precision = v;
        }
        if let Some(v) = parse_number::<i64>(
            section,
            "tiles",
            "url_ttl_hours",
            "must be a positive integer (hours)",
        )? {
            config.tiles.url_ttl_hours = v;
        }
        if let Some(v) = non_empty(section, "default_dataset") {
            config.tiles.default_dataset = v;
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("provider") {
            config.cache.provider = CacheBackend::from_str(v)
                .map_err(|_| invalid("cache", "provider", v, CACHE_BACKEND_CHOICES))?;
        }
        if let Some(v) = non_empty(section, "directory") {
            config.cache.directory = expand_tilde(&v);
        }
        if let Some(v) = non_empty(section, "url") {
            config.cache.url = v;
        }
        if let Some(v) = section.get("memory_size") {
            config.cache.memory_size = parse_size(v).map_err(|_| {
                invalid(
                    "cache",
                    "memory_size",
                    v,
                    "expected format like '2GB', '500MB', or '1024KB'",
                )
            })?;
        }
    }

    // [provider] section
    if let Some(section) = ini.section(Some("provider")) {
        if let Some(v) = non_empty(section, "project") {
            config.provider.project = Some(v);
        }
        if let Some(v) = non_empty(section, "base_url") {
            config.provider.base_url = v;
        }
        if let Some(v) = non_empty(section, "access_token") {
            config.provider.access_token = Some(v);
        }
        if let Some(v) = parse_number::<u64>(
            section,
            "provider",
            "timeout",
            "must be a positive integer (seconds)",
        )? {
            config.provider.timeout = v;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "directory") {
            config.logging.directory = expand_tilde(&v);
        }
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = v;
        }
    }

    validate(&config)?;
    Ok(config)
}

/// Check cross-field and range constraints.
pub(super) fn validate(config: &ConfigFile) -> Result<(), ConfigFileError> {
    let tiles = &config.tiles;
    if tiles.max_zoom > MAX_ZOOM {
        return Err(invalid(
            "tiles",
            "max_zoom",
            &tiles.max_zoom.to_string(),
            &format!("must not exceed {}", MAX_ZOOM),
        ));
    }
    if tiles.min_zoom > tiles.max_zoom {
        return Err(invalid(
            "tiles",
            "min_zoom",
            &tiles.min_zoom.to_string(),
            "must not exceed max_zoom",
        ));
    }
    if tiles.geocell_precision > MAX_PRECISION {
        return Err(invalid(
            "tiles",
            "geocell_precision",
            &tiles.geocell_precision.to_string(),
            &format!("must not exceed {}", MAX_PRECISION),
        ));
    }
    if !(1..=MAX_URL_TTL_HOURS).contains(&tiles.url_ttl_hours) {
        return Err(invalid(
            "tiles",
            "url_ttl_hours",
            &tiles.url_ttl_hours.to_string(),
            &format!("must be between 1 and {} (hours)", MAX_URL_TTL_HOURS),
        ));
    }
    if DatasetSpec::by_id(&tiles.default_dataset).is_none() {
        return Err(invalid(
            "tiles",
            "default_dataset",
            &tiles.default_dataset,
            "unknown dataset (available: open_buildings)",
        ));
    }
    if config.cache.memory_size == 0 {
        return Err(invalid("cache", "memory_size", "0", "must be greater than zero"));
    }
    if config.provider.timeout == 0 {
        return Err(invalid(
            "provider",
            "timeout",
            "0",
            "must be a positive integer (seconds)",
        ));
    }
    Ok(())
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
