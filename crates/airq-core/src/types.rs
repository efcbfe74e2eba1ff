//! Shared domain types for the airq crates.

use serde::{Deserialize, Serialize};

/// A geographic coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components lie in the valid latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_meters(&self, other: Coordinates) -> f64 {
        let km = haversine::distance(
            haversine::Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            haversine::Location {
                latitude: other.latitude,
                longitude: other.longitude,
            },
            haversine::Units::Kilometers,
        );
        km * 1000.0
    }
}

/// A single air-quality observation from the primary provider.
///
/// Missing fields have already been defaulted to zero by the client, so a
/// reading is always complete.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutionReading {
    /// US AQI value.
    pub aqi: i32,
    /// PM10 concentration in ug/m3.
    pub pm10: f64,
    /// PM2.5 concentration in ug/m3.
    pub pm2_5: f64,
}

/// Last known location as stored in the shared cross-process cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedLocation {
    pub coordinates: Coordinates,
    /// Resolved place name, when reverse geocoding has caught up.
    pub city_name: Option<String>,
}
