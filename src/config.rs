use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::loader::{LoadOptions, DEFAULT_HOME_VALUE_COLUMN};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "city-affordability.toml";

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub map: MapConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// City table, relative to the working directory.
    pub path: PathBuf,
    pub home_value_column: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/merged_final_dataset.csv"),
            home_value_column: DEFAULT_HOME_VALUE_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    pub center_latitude: f64,
    pub center_longitude: f64,
    /// Web-map style zoom level; 4 frames the contiguous U.S.
    pub zoom: u8,
    pub marker_radius: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_latitude: 39.8283,
            center_longitude: -98.5795,
            zoom: 4,
            marker_radius: 5.0,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }

    /// Explicit file if given, else the default file if present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from_file(default_path)
                } else {
                    log::debug!("No {DEFAULT_CONFIG_FILE} found, using built-in defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            home_value_column: self.data.home_value_column.clone(),
        }
    }
}

impl MapConfig {
    /// `(min_lon, min_lat, max_lon, max_lat)` visible around the center.
    ///
    /// Tile maps show 360° of longitude at zoom 0 and halve per level.
    pub fn view_bounds(&self) -> (f64, f64, f64, f64) {
        let lon_span = 360.0 / 2f64.powi(i32::from(self.zoom));
        let lat_span = lon_span / 2.0;
        (
            self.center_longitude - lon_span / 2.0,
            (self.center_latitude - lat_span / 2.0).max(-90.0),
            self.center_longitude + lon_span / 2.0,
            (self.center_latitude + lat_span / 2.0).min(90.0),
        )
    }
}
