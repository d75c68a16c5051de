//! TOML configuration shared by the `serve` and `spots` binaries.
//!
//! Every section has defaults, so a missing file or a partial file is fine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::catalog::{Category, CategoryCatalog};

/// Main Overpass instance is frequently overloaded; the Kumi mirror is the default.
pub const DEFAULT_ENDPOINT: &str = "https://overpass.kumi.systems/api/interpreter";
pub const DEFAULT_USER_AGENT: &str = "DeepTourismMapApp/1.0";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub overpass: OverpassConfig,
    pub search_link: SearchLinkConfig,
    /// Replaces the built-in catalog when non-empty
    pub categories: Vec<Category>,
    pub regions: Vec<RegionPreset>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OverpassConfig {
    pub endpoint: String,
    pub user_agent: String,
    /// Client-side limit for the whole HTTP exchange
    pub request_timeout_secs: u64,
    /// `[timeout:N]` setting sent inside the query
    pub server_timeout_secs: u32,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 90,
            server_timeout_secs: 60,
        }
    }
}

/// External map search link attached to each spot.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchLinkConfig {
    pub maps_url: String,
    /// Appended to the spot name, "sightseeing" in the UI locale
    pub suffix: String,
}

impl Default for SearchLinkConfig {
    fn default() -> Self {
        Self {
            maps_url: "https://www.google.com/maps/search/".to_string(),
            suffix: "観光".to_string(),
        }
    }
}

/// Named initial map position offered to front ends.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RegionPreset {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub zoom: u8,
}

impl RegionPreset {
    fn new(name: &str, lat: f64, lon: f64, zoom: u8) -> Self {
        Self {
            name: name.to_string(),
            lat,
            lon,
            zoom,
        }
    }

    pub fn builtin() -> Vec<RegionPreset> {
        vec![
            Self::new("今いる場所 (デフォルト)", 34.9858, 135.7588, 13),
            Self::new("北海道 (札幌)", 43.0618, 141.3545, 10),
            Self::new("東北 (仙台)", 38.2682, 140.8694, 10),
            Self::new("関東 (東京)", 35.6895, 139.6917, 10),
            Self::new("中部 (名古屋)", 35.1815, 136.9066, 10),
            Self::new("近畿 (大阪)", 34.6937, 135.5023, 10),
            Self::new("中国 (広島)", 34.3853, 132.4553, 10),
            Self::new("四国 (高松)", 34.3428, 134.0466, 10),
            Self::new("九州 (福岡)", 33.5904, 130.4017, 10),
            Self::new("沖縄 (那覇)", 26.2124, 127.6809, 10),
        ]
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        if config.overpass.endpoint.trim().is_empty() {
            anyhow::bail!("overpass.endpoint must not be empty");
        }
        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn catalog(&self) -> CategoryCatalog {
        if self.categories.is_empty() {
            CategoryCatalog::builtin()
        } else {
            CategoryCatalog::new(self.categories.clone())
        }
    }

    pub fn region_presets(&self) -> Vec<RegionPreset> {
        if self.regions.is_empty() {
            RegionPreset::builtin()
        } else {
            self.regions.clone()
        }
    }
}
