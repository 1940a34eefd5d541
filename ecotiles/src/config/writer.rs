//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;
use super::size::format_size;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let project = config.provider.project.as_deref().unwrap_or("");
    let access_token = config.provider.access_token.as_deref().unwrap_or("");

    format!(
        r#"[server]
; Address the HTTP server listens on
bind = {}

[tiles]
; Zoom levels outside this range get the "zoom not supported" image
min_zoom = {}
max_zoom = {}
; Geohash length used to bucket tiles sharing one upstream URL template (0-12)
geocell_precision = {}
; How long a minted URL template stays valid, in hours
url_ttl_hours = {}
; Dataset served by the tile routes
default_dataset = {}

[cache]
; Cache store: memory, disk or valkey
provider = {}
; Directory for the disk store (only used when provider = disk)
directory = {}
; Memory store capacity (e.g. 512MB, 2GB)
memory_size = {}
; Valkey connection URL (only used when provider = valkey)
url = {}

[provider]
; Earth Engine Cloud project
project = {}
; Earth Engine REST endpoint
base_url = {}
; OAuth2 bearer token (ECOTILES_ACCESS_TOKEN overrides this)
access_token = {}
; Upstream request timeout in seconds
timeout = {}

[logging]
; Directory for log files
directory = {}
; Main log file; warnings also go to <name>_warning.log
file = {}
"#,
        config.server.bind,
        config.tiles.min_zoom,
        config.tiles.max_zoom,
        config.tiles.geocell_precision,
        config.tiles.url_ttl_hours,
        config.tiles.default_dataset,
        config.cache.provider,
        path_to_string(&config.cache.directory),
        format_size(config.cache.memory_size),
        config.cache.url,
        project,
        config.provider.base_url,
        access_token,
        config.provider.timeout,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Convert a path to string, replacing the home directory with ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
