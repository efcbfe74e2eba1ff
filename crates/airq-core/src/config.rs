//! Configuration for the airq processes.
//!
//! One TOML file shared by every binary: a fixed-location override for
//! machines without a platform location provider, the refresh cadence, the
//! WAQI token, and an optional cache path override.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cache::LocationCache;
use crate::monitor::{RefreshSchedule, DEFAULT_REFRESH_SECS, DEFAULT_RETRY_SECS};
use crate::types::Coordinates;

/// Configuration validation errors.
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning.
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors.
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Fixed location used when no platform location provider is wired in.
    #[serde(default)]
    pub location: LocationConfig,

    /// Refresh cadence.
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Secondary (WAQI) provider settings.
    #[serde(default)]
    pub waqi: WaqiConfig,

    /// Shared location-cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl LocationConfig {
    /// The configured fixed coordinates, when both components are present.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between scheduled refreshes.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Seconds before retrying after a failed fetch.
    #[serde(default = "default_retry_secs")]
    pub retry_secs: u64,
}

fn default_interval_secs() -> u64 {
    DEFAULT_REFRESH_SECS
}

fn default_retry_secs() -> u64 {
    DEFAULT_RETRY_SECS
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_REFRESH_SECS,
            retry_secs: DEFAULT_RETRY_SECS,
        }
    }
}

impl RefreshConfig {
    pub fn schedule(&self) -> RefreshSchedule {
        RefreshSchedule {
            interval: std::time::Duration::from_secs(self.interval_secs),
            retry: std::time::Duration::from_secs(self.retry_secs),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaqiConfig {
    /// API token from aqicn.org. Enables the provider comparison path.
    pub token: Option<String>,
}

impl WaqiConfig {
    /// Check if a real token is configured (not empty, not a placeholder).
    pub fn is_configured(&self) -> bool {
        self.token
            .as_deref()
            .is_some_and(|t| !t.is_empty() && !t.starts_with("YOUR_"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Overrides the shared location-cache file path.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default path, creating a default file
    /// if none exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it.
    ///
    /// Returns the config along with any validation warnings. Returns an
    /// error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("airq").join("config.toml"))
    }

    /// The shared location cache this configuration points at.
    pub fn location_cache(&self) -> Result<LocationCache> {
        match &self.cache.path {
            Some(path) => Ok(LocationCache::new(path)),
            None => LocationCache::open_default(),
        }
    }

    /// Validate all configuration values.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        match (self.location.latitude, self.location.longitude) {
            (Some(_), None) => {
                result.add_error("location.longitude", "latitude is set without longitude");
            }
            (None, Some(_)) => {
                result.add_error("location.latitude", "longitude is set without latitude");
            }
            (Some(lat), Some(lon)) => {
                if !Coordinates::new(lat, lon).is_valid() {
                    result.add_error("location", "coordinates are out of range");
                }
            }
            (None, None) => {}
        }

        if self.refresh.interval_secs == 0 {
            result.add_warning(
                "refresh.interval_secs",
                "zero interval disables scheduled refreshes",
            );
        }
        if self.refresh.retry_secs == 0 {
            result.add_warning("refresh.retry_secs", "failed fetches will retry immediately");
        }

        if self.waqi.token.is_some() && !self.waqi.is_configured() {
            result.add_warning("waqi.token", "token looks like a placeholder");
        }

        result
    }
}
