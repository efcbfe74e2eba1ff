//! Secondary pollution data client for the WAQI (aqicn.org) feed API.
//!
//! Token-authenticated. Used to cross-check the primary provider, never as
//! the display path, so callers treat failures here as non-fatal.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::error::PollutionError;
use crate::types::Coordinates;

const WAQI_BASE: &str = "https://api.waqi.info";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Wire envelope: `{ "status": "ok", "data": { "aqi": .. } }`.
#[derive(Debug, Deserialize)]
struct WaqiResponse {
    status: String,
    data: WaqiData,
}

#[derive(Debug, Deserialize)]
struct WaqiData {
    aqi: i32,
}

/// Client for the WAQI geolocated feed endpoint.
#[derive(Debug, Clone)]
pub struct WaqiClient {
    client: Client,
    base_url: String,
}

impl WaqiClient {
    pub fn new() -> Result<Self, PollutionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: WAQI_BASE.to_string(),
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

    /// Fetch the AQI reported by the station nearest to the coordinates.
    ///
    /// A parseable body with `status != "ok"` (bad token, rate limit) is an
    /// upstream rejection, kept distinct from transport and decode failures.
    #[instrument(skip(self, token), level = "info")]
    pub async fn fetch_aqi(
        &self,
        coords: Coordinates,
        token: &str,
    ) -> Result<i32, PollutionError> {
        let url = format!(
            "{}/feed/geo:{};{}/?token={}",
            self.base_url, coords.latitude, coords.longitude, token
        );

        let response = self.client.get(&url).send().await?;
        let body = response.text().await?;
        let parsed: WaqiResponse = serde_json::from_str(&body)?;

        if parsed.status != "ok" {
            return Err(PollutionError::UpstreamRejected(parsed.status));
        }

        tracing::debug!(aqi = parsed.data.aqi, "Received station AQI");
        Ok(parsed.data.aqi)
    }
}
