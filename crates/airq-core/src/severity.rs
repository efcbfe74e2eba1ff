//! US AQI severity classification.
//!
//! Pure integer banding with no I/O. Display surfaces key off the band, so
//! the boundaries here are load-bearing: 0-50 Good, 51-100 Moderate,
//! 101-150 Unhealthy for Sensitive Groups, 151-200 Unhealthy, 201-300 Very
//! Unhealthy, everything else Hazardous.

use serde::{Deserialize, Serialize};

/// Severity band for a US AQI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

/// Display color paired with a severity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityColor {
    Green,
    Yellow,
    Orange,
    Red,
    Purple,
    Maroon,
}

impl Severity {
    /// Classify a US AQI value.
    ///
    /// Total over all of `i32`: values above 300 fall through to
    /// `Hazardous`, and so do negative values, which real providers do not
    /// send but a classifier must not choke on.
    pub fn from_aqi(aqi: i32) -> Self {
        match aqi {
            0..=50 => Self::Good,
            51..=100 => Self::Moderate,
            101..=150 => Self::UnhealthySensitive,
            151..=200 => Self::Unhealthy,
            201..=300 => Self::VeryUnhealthy,
            _ => Self::Hazardous,
        }
    }

    /// Human-readable band name.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }

    /// Color associated with the band.
    pub fn color(&self) -> SeverityColor {
        match self {
            Self::Good => SeverityColor::Green,
            Self::Moderate => SeverityColor::Yellow,
            Self::UnhealthySensitive => SeverityColor::Orange,
            Self::Unhealthy => SeverityColor::Red,
            Self::VeryUnhealthy => SeverityColor::Purple,
            Self::Hazardous => SeverityColor::Maroon,
        }
    }

    /// Symbol name for the menu-bar label. Coarser than the bands: only
    /// low, medium, and high variants exist.
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Good => "aqi.low",
            Self::Moderate => "aqi.medium",
            _ => "aqi.high",
        }
    }
}

impl SeverityColor {
    /// Color name for text surfaces.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Orange => "Orange",
            Self::Red => "Red",
            Self::Purple => "Purple",
            Self::Maroon => "Maroon",
        }
    }
}

/// Everything a display surface needs about one AQI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityInfo {
    pub band: Severity,
    pub color: SeverityColor,
    pub description: &'static str,
}

/// Classify an AQI value into its band, color, and description.
pub fn classify(aqi: i32) -> SeverityInfo {
    let band = Severity::from_aqi(aqi);
    SeverityInfo {
        band,
        color: band.color(),
        description: band.description(),
    }
}
