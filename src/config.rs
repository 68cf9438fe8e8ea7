//! Configuration management for the viability analyzer
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ViabilityError;
use crate::models::MonthNames;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViabilityConfig {
    /// Thresholds and policies of the analysis pipeline
    pub analysis: AnalysisConfig,
    /// Meteomatics API settings
    pub meteomatics: MeteomaticsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// What to do with parameter identifiers outside the recognized set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownParameterPolicy {
    /// Write none of its values; the dates it reports still become days
    #[default]
    Ignore,
    /// Fail the run
    Reject,
}

/// What to do with a day lacking a measurement the analysis reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingValuePolicy {
    /// The value contributes nothing and cannot make the day viable
    #[default]
    Skip,
    /// Fail the run
    Reject,
}

/// Analysis thresholds and policies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Wind speed (m/s) from which a day is usable for wind generation
    pub wind_viable_ms: f64,
    /// Relative humidity (%) below which a dry day is usable for solar generation
    pub solar_humidity_max: f64,
    /// How much better one source must be to be recommended
    pub preference_ratio: f64,
    pub unknown_parameters: UnknownParameterPolicy,
    pub missing_values: MissingValuePolicy,
    /// Language of the `mes` field
    pub month_names: MonthNames,
}

/// Meteomatics API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteomaticsConfig {
    /// Base URL for the weather API
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// Weather model passed along with requests (API default when unset)
    pub model: Option<String>,
    /// Time step of the yearly timeseries request
    pub annual_step: String,
    /// How far back the yearly request reaches, in days
    pub days_back: u32,
    /// Half side of the grid box drawn around a point, in degrees
    pub grid_half_span: f64,
    /// Grid resolution in degrees
    pub grid_resolution: f64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_wind_viable_ms() -> f64 {
    5.0
}

fn default_solar_humidity_max() -> f64 {
    90.0
}

fn default_preference_ratio() -> f64 {
    1.15
}

fn default_base_url() -> String {
    "https://api.meteomatics.com".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_annual_step() -> String {
    "P1D".to_string()
}

fn default_days_back() -> u32 {
    365
}

fn default_grid_half_span() -> f64 {
    0.25
}

fn default_grid_resolution() -> f64 {
    0.02
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            wind_viable_ms: default_wind_viable_ms(),
            solar_humidity_max: default_solar_humidity_max(),
            preference_ratio: default_preference_ratio(),
            unknown_parameters: UnknownParameterPolicy::default(),
            missing_values: MissingValuePolicy::default(),
            month_names: MonthNames::default(),
        }
    }
}

impl AnalysisConfig {
    /// Strict variant: unknown parameters and missing values fail the run
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.unknown_parameters = UnknownParameterPolicy::Reject;
        self.missing_values = MissingValuePolicy::Reject;
        self
    }
}

impl Default for MeteomaticsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username: None,
            password: None,
            timeout_seconds: default_timeout(),
            model: None,
            annual_step: default_annual_step(),
            days_back: default_days_back(),
            grid_half_span: default_grid_half_span(),
            grid_resolution: default_grid_resolution(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ViabilityConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. VIABILITY_ANALYSIS__WIND_VIABLE_MS
        builder = builder.add_source(
            Environment::with_prefix("VIABILITY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ViabilityConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("viability").join("config.toml"))
    }

    /// Apply default values to empty string settings
    pub fn apply_defaults(&mut self) {
        if self.meteomatics.base_url.is_empty() {
            self.meteomatics.base_url = default_base_url();
        }
        if self.meteomatics.annual_step.is_empty() {
            self.meteomatics.annual_step = default_annual_step();
        }
        if self.meteomatics.timeout_seconds == 0 {
            self.meteomatics.timeout_seconds = default_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Fill missing credentials from the given fallbacks
    pub fn apply_credentials(&mut self, username: Option<String>, password: Option<String>) {
        if self.meteomatics.username.is_none() {
            self.meteomatics.username = username;
        }
        if self.meteomatics.password.is_none() {
            self.meteomatics.password = password;
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_analysis()?;
        self.validate_meteomatics()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_analysis(&self) -> Result<()> {
        let analysis = &self.analysis;

        if !(analysis.wind_viable_ms.is_finite() && analysis.wind_viable_ms > 0.0) {
            return Err(ViabilityError::config("Wind viability threshold must be positive").into());
        }

        if !(analysis.solar_humidity_max > 0.0 && analysis.solar_humidity_max <= 100.0) {
            return Err(ViabilityError::config(
                "Solar humidity threshold must be within (0, 100]",
            )
            .into());
        }

        if !(analysis.preference_ratio.is_finite() && analysis.preference_ratio >= 1.0) {
            return Err(ViabilityError::config("Preference ratio must be at least 1.0").into());
        }

        Ok(())
    }

    fn validate_meteomatics(&self) -> Result<()> {
        let mm = &self.meteomatics;

        if mm.timeout_seconds > 300 {
            return Err(
                ViabilityError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        if mm.days_back == 0 || mm.days_back > 3660 {
            return Err(ViabilityError::config("days_back must be between 1 and 3660").into());
        }

        if !(mm.grid_half_span > 0.0 && mm.grid_half_span <= 10.0) {
            return Err(ViabilityError::config("Grid half span must be within (0, 10]").into());
        }

        if !(mm.grid_resolution > 0.0 && mm.grid_resolution <= 5.0) {
            return Err(ViabilityError::config("Grid resolution must be within (0, 5]").into());
        }

        if let Some(username) = &mm.username {
            if username.is_empty() {
                return Err(ViabilityError::config(
                    "Meteomatics username cannot be empty if provided",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ViabilityError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ViabilityError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.meteomatics.base_url.starts_with("http://")
            && !self.meteomatics.base_url.starts_with("https://")
        {
            return Err(ViabilityError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
