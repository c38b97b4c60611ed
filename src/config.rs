use std::path::PathBuf;
use std::time::Duration;

use crate::collab::map::TileLayer;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub session: SessionConfig,
}

/// Settings the session controller reads.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub storage_key: String,
    pub zoom: u8,
    pub banner_ttl: Duration,
    pub form_reset_delay: Duration,
    pub tile_layer: TileLayer,
    pub validation: ValidationPolicy,
}

/// How strictly form values are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Accept zero or negative elevation for cycling, as long as it is finite.
    pub lenient_elevation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: PathBuf::from("data"),
            session: SessionConfig::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: "workouts".to_string(),
            zoom: 13,
            banner_ttl: Duration::from_secs(5),
            form_reset_delay: Duration::from_millis(1000),
            tile_layer: TileLayer::default(),
            validation: ValidationPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env_parse("PORT").unwrap_or(defaults.port);

        let data_dir = std::env::var("DATA_DIR")
            .ok()
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let storage_key = std::env::var("STORAGE_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.session.storage_key);

        let zoom = env_parse("MAP_ZOOM").unwrap_or(defaults.session.zoom);

        let banner_seconds = env_parse("ERROR_BANNER_SECONDS").unwrap_or(5);

        let form_reset_ms = env_parse("FORM_RESET_MS").unwrap_or(1000);

        let mut tile_layer = defaults.session.tile_layer;
        if let Ok(url) = std::env::var("TILE_URL") {
            tile_layer.url = url;
        }

        let lenient_elevation = std::env::var("LENIENT_ELEVATION")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            port,
            data_dir,
            session: SessionConfig {
                storage_key,
                zoom,
                banner_ttl: Duration::from_secs(banner_seconds),
                form_reset_delay: Duration::from_millis(form_reset_ms),
                tile_layer,
                validation: ValidationPolicy { lenient_elevation },
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}
