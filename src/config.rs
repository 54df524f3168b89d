use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Environment variable that overrides the default config path.
pub const CONFIG_ENV: &str = "LANDLENS_CONFIG";

/// Default config file looked up in the working directory.
pub const CONFIG_FILE: &str = "landlens.json";

/// Remote raster statistics service settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the statistics endpoint.
    pub base_url: String,
    /// Asset identifier of the classified land-cover image.
    pub asset: String,
    /// Reduction scale in meters (the source rasters are 30 m).
    pub scale_m: f64,
    /// Upper bound on pixels per reduction, forwarded to the service.
    pub max_pixels: u64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8383".to_string(),
            asset: "landcover/collection9/integration".to_string(),
            scale_m: 30.0,
            max_pixels: 10_u64.pow(13),
            timeout_secs: 30,
        }
    }
}

/// Top-level configuration, deserialized from JSON.
///
/// Every field has a default so a partial file is fine; a missing file means
/// all defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    /// Optional catalog override (`.json` or `.csv`); built-in legend if unset.
    pub catalog_path: Option<PathBuf>,
    /// Optional region boundary override (GeoJSON); built-in boundary if unset.
    pub region_path: Option<PathBuf>,
    /// First year with a classification band.
    pub first_year: i32,
    /// Last year with a classification band.
    pub last_year: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            catalog_path: None,
            region_path: None,
            first_year: 1985,
            last_year: 2023,
        }
    }
}

impl AppConfig {
    /// Load configuration from `$LANDLENS_CONFIG`, falling back to
    /// `./landlens.json`, falling back to defaults when neither exists.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(p) => PathBuf::from(p),
            None => PathBuf::from(CONFIG_FILE),
        };
        if !path.exists() {
            log::info!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_path(&path)
    }

    /// Parse a config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// All years covered by the configured band range, ascending.
    pub fn years(&self) -> Vec<i32> {
        (self.first_year..=self.last_year).collect()
    }
}
