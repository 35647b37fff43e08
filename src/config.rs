use chrono::Weekday;
use chrono_tz::Tz;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::contrib::IntensityScale;
use crate::error::{Error, ErrorKind, Result};
use crate::layout::Metrics;
use crate::svg::Theme;

const CONFIG_PATH_ENV_VAR: &str = "SPRIG_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(config_dir) = dirs::config_dir() {
        locations.push(config_dir.join("sprig").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".sprig.toml"));
    }

    locations
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub span_months: u32,
    pub week_start: String,
    pub timezone: String,
    pub scheme: String,
    pub thresholds: Vec<u32>,
    pub cell_size: u32,
    pub cell_gap: u32,
    pub canvas_margin: u32,
    pub text_height: u32,
    pub weekday_width: u32,
}

impl Default for Config {
    fn default() -> Config {
        let metrics = Metrics::default();
        Config {
            span_months: 12,
            week_start: "sunday".to_owned(),
            timezone: "UTC".to_owned(),
            scheme: "light".to_owned(),
            thresholds: vec![0, 1, 10, 20, 30],
            cell_size: metrics.cell_size,
            cell_gap: metrics.cell_gap,
            canvas_margin: metrics.canvas_margin,
            text_height: metrics.text_height,
            weekday_width: metrics.weekday_width,
        }
    }
}

impl Config {
    pub fn from_str(input: &str) -> Result<Config> {
        toml::from_str(input)
            .map_err(|e| Error::new(ErrorKind::InvalidInput, &format!("bad config: {}", e)))
    }

    pub fn week_start_day(&self) -> Result<Weekday> {
        self.week_start.parse().map_err(|_| {
            Error::new(
                ErrorKind::InvalidInput,
                &format!("unknown week start day '{}'", self.week_start),
            )
        })
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|e: String| Error::new(ErrorKind::InvalidInput, &e))
    }

    pub fn theme(&self) -> Result<Theme> {
        self.scheme.parse()
    }

    pub fn scale(&self) -> Result<IntensityScale> {
        IntensityScale::new(self.thresholds.clone())
    }

    pub fn metrics(&self) -> Metrics {
        Metrics {
            cell_size: self.cell_size,
            cell_gap: self.cell_gap,
            canvas_margin: self.canvas_margin,
            text_height: self.text_height,
            weekday_width: self.weekday_width,
        }
    }
}

/// Loads an explicitly given config file, or the first one found in the
/// usual locations, or the built-in defaults.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_str(&fs::read_to_string(path)?);
    }

    for location in find_configfile_locations() {
        if location.exists() {
            log::debug!("loading config from {}", location.display());
            return Config::from_str(&fs::read_to_string(location)?);
        }
    }

    Ok(Config::default())
}
