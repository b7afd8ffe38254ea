use crate::query::NameMatch;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub manifest_path: String,
    pub num_workers: usize,
    pub geocoder: String,
    pub geocode_timeout_ms: u64,
    pub geocode_max_distance_km: f64,
    pub name_match: NameMatch,
    pub log_level: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_dir("config")
    }

    /// Layers `default`, `$RUN_MODE` and `local` files from `dir` over the
    /// built-in defaults, then `PHOTO_INDEX_*` environment variables. Missing
    /// files are skipped; a file that exists but does not parse is an error.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let layer = |name: &str| File::with_name(&dir.join(name).to_string_lossy()).required(false);
        let defaults = Self::default();

        let s = Config::builder()
            .set_default("manifest_path", defaults.manifest_path)?
            .set_default("num_workers", defaults.num_workers as i64)?
            .set_default("geocoder", defaults.geocoder)?
            .set_default("geocode_timeout_ms", defaults.geocode_timeout_ms as i64)?
            .set_default("geocode_max_distance_km", defaults.geocode_max_distance_km)?
            .set_default("name_match", "contains")?
            .set_default("log_level", defaults.log_level)?
            .add_source(layer("default"))
            .add_source(layer(&env))
            .add_source(layer("local"))
            .add_source(Environment::with_prefix("PHOTO_INDEX"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            manifest_path: "dataset/index".into(),
            num_workers: 4,
            geocoder: "offline".into(),
            geocode_timeout_ms: 2_000,
            geocode_max_distance_km: 50.0,
            name_match: NameMatch::default(),
            log_level: "info".into(),
        }
    }
}
