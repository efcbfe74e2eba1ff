//! Primary pollution data client for the Open-Meteo air-quality API.
//!
//! Coordinates in, current AQI plus particulate concentrations out. No API
//! key required.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::error::PollutionError;
use crate::types::{Coordinates, PollutionReading};

const OPEN_METEO_BASE: &str = "https://air-quality-api.open-meteo.com";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Wire envelope: `{ "current": { "us_aqi": .., "pm10": .., "pm2_5": .. } }`.
///
/// The provider omits fields a station has no data for, so every metric is
/// optional on the wire.
#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    us_aqi: Option<i32>,
    pm10: Option<f64>,
    pm2_5: Option<f64>,
}

/// Client for the Open-Meteo air-quality endpoint.
#[derive(Debug, Clone)]
pub struct AirQualityClient {
    client: Client,
    base_url: String,
}

impl AirQualityClient {
    pub fn new() -> Result<Self, PollutionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: OPEN_METEO_BASE.to_string(),
        })
    }

    /// Create a client pointing at a custom base URL (for testing).
    #[cfg(test)]
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
        }
    }

    /// Fetch the current pollution reading for the given coordinates.
    ///
    /// Fields the provider omitted come back as zero. A body that does not
    /// match the envelope at all is a decode error, never a zeroed reading.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_pollution(
        &self,
        coords: Coordinates,
    ) -> Result<PollutionReading, PollutionError> {
        let url = format!("{}/v1/air-quality", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("current", "us_aqi,pm10,pm2_5".to_string()),
            ])
            .send()
            .await?;

        let body = response.text().await?;
        let parsed: AirQualityResponse = serde_json::from_str(&body)?;

        let reading = PollutionReading {
            aqi: parsed.current.us_aqi.unwrap_or(0),
            pm10: parsed.current.pm10.unwrap_or(0.0),
            pm2_5: parsed.current.pm2_5.unwrap_or(0.0),
        };

        tracing::debug!(aqi = reading.aqi, "Received pollution reading");
        Ok(reading)
    }
}
