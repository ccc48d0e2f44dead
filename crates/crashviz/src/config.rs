//! Configuration management for crashviz.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::render::{Layout, Margin};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "crashviz";

/// Date format of the `Date` column in the source data.
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CRASHVIZ_`, sections separated
///    by a double underscore, e.g. `CRASHVIZ_CHART__TOP_OPERATORS=5`)
/// 2. TOML config file at `~/.config/crashviz/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input data configuration.
    pub data: DataConfig,
    /// Chart geometry configuration.
    pub chart: ChartConfig,
    /// Fixed annotations drawn on the yearly chart.
    pub annotations: AnnotationConfig,
}

/// Input data configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the crash CSV file. Overridden by `--data`.
    pub path: Option<PathBuf>,
    /// `chrono` format string for the `Date` column.
    pub date_format: String,
}

/// Chart geometry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Total canvas width in pixels, margins included.
    pub width: f64,
    /// Total canvas height in pixels, margins included.
    pub height: f64,
    /// Space reserved around the drawing area.
    pub margin: Margin,
    /// Band padding, applied both between and around bars.
    pub padding: f64,
    /// Only years divisible by this are labelled on the yearly axis.
    pub year_tick_interval: i32,
    /// Number of ranked operators annotated on the drill-down chart.
    pub top_operators: usize,
}

/// Fixed annotations drawn on the yearly chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Year labelled as the start of the dataset.
    pub start_year: i32,
    /// Year labelled as the end of the dataset.
    pub end_year: i32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 500.0,
            margin: Margin::default(),
            padding: 0.1,
            year_tick_interval: 20,
            top_operators: 3,
        }
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            start_year: 1908,
            end_year: 2009,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("CRASHVIZ_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let layout = self.layout();
        if layout.width <= 0.0 || layout.height <= 0.0 {
            return Err(Error::config_validation(format!(
                "margins leave no drawing area ({}x{})",
                layout.width, layout.height
            )));
        }

        if !(0.0..1.0).contains(&self.chart.padding) {
            return Err(Error::config_validation(format!(
                "padding ({}) must be in [0, 1)",
                self.chart.padding
            )));
        }

        if self.chart.year_tick_interval <= 0 {
            return Err(Error::config_validation(
                "year_tick_interval must be greater than 0",
            ));
        }

        if self.chart.top_operators == 0 {
            return Err(Error::config_validation(
                "top_operators must be greater than 0",
            ));
        }

        if self.data.date_format.trim().is_empty() {
            return Err(Error::config_validation("date_format must not be empty"));
        }

        if self.annotations.start_year > self.annotations.end_year {
            return Err(Error::config_validation(format!(
                "annotation start_year ({}) cannot be after end_year ({})",
                self.annotations.start_year, self.annotations.end_year
            )));
        }

        Ok(())
    }

    /// Get the drawing layout derived from the chart configuration.
    #[must_use]
    pub fn layout(&self) -> Layout {
        Layout::new(
            self.chart.width,
            self.chart.height,
            self.chart.margin,
            self.chart.padding,
        )
    }

    /// Resolve the data file path, preferring an explicit override.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDataPath`] if neither is set.
    pub fn data_path(&self, explicit: Option<PathBuf>) -> Result<PathBuf> {
        explicit
            .or_else(|| self.data.path.clone())
            .ok_or(Error::MissingDataPath)
    }

    /// Load and validate the configuration layered over the file at `path`.
    ///
    /// Unlike [`Config::load_from`], a missing file is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be parsed, or
    /// yields invalid values.
    pub fn validate_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::config_validation(format!(
                "{} does not exist",
                path.display()
            )));
        }
        Self::load_from(Some(path.to_path_buf()))
    }
}
