//! Core library for the airq air-quality utility.
//!
//! This crate provides:
//! - The US AQI severity classifier
//! - Clients for the pollution data providers (Open-Meteo, WAQI)
//! - The cross-process last-known-location cache
//! - Location tracking and refresh orchestration
//!
//! The process binaries (`airq-tracker`, `airq-widget`, `airq-verify`) are
//! thin shells over this crate.

pub mod cache;
pub mod config;
pub mod error;
pub mod geocode;
pub mod location;
pub mod monitor;
pub mod openmeteo;
pub mod severity;
pub mod types;
pub mod waqi;

pub use cache::LocationCache;
pub use config::{Config, ValidationResult};
pub use error::PollutionError;
pub use geocode::GeocodeClient;
pub use location::{LocationEvent, LocationTracker, PermissionStatus};
pub use monitor::{MonitorStatus, PollutionMonitor, RefreshSchedule};
pub use openmeteo::AirQualityClient;
pub use severity::{classify, Severity, SeverityColor, SeverityInfo};
pub use types::{CachedLocation, Coordinates, PollutionReading};
pub use waqi::WaqiClient;

use anyhow::Result;

/// Initialize logging for an airq process.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("airq core initialized");
    Ok(())
}
