//! Reverse geocoding: convert coordinates to a human-readable place name.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::PollutionError;
use crate::types::Coordinates;

const NOMINATIM_BASE: &str = "https://nominatim.openstreetmap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;

// Nominatim requires an identifying user agent.
const USER_AGENT: &str = "airq/0.1 (https://github.com/airq/airq)";

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

/// Nominatim reverse-geocoding client.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: String,
}

impl GeocodeClient {
    pub fn new() -> Result<Self, PollutionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: NOMINATIM_BASE.to_string(),
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

    /// Resolve coordinates to a place name.
    ///
    /// Prefers the city, falling back through smaller localities to the
    /// state and country. Returns `None` on any failure; callers keep going
    /// without a name.
    pub async fn city_name(&self, coords: Coordinates) -> Option<String> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1",
            self.base_url, coords.latitude, coords.longitude
        );

        debug!("Reverse geocoding: {}, {}", coords.latitude, coords.longitude);

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Reverse geocoding request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("Reverse geocoding returned status: {}", response.status());
            return None;
        }

        let data: NominatimResponse = match response.json().await {
            Ok(d) => d,
            Err(e) => {
                warn!("Failed to parse reverse geocoding response: {}", e);
                return None;
            }
        };

        let address = data.address?;

        let name = address
            .city
            .or(address.town)
            .or(address.village)
            .or(address.municipality)
            .or(address.state)
            .or(address.country);

        if let Some(ref n) = name {
            debug!("Reverse geocoded to: {}", n);
        }

        name
    }
}
