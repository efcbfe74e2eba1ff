//! Refresh orchestration: scheduled fetching, classification, and the
//! observable display state.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::openmeteo::AirQualityClient;
use crate::severity::{classify, SeverityInfo};
use crate::types::{Coordinates, PollutionReading};

/// Steady refresh interval in seconds.
pub const DEFAULT_REFRESH_SECS: u64 = 1800;
/// Retry interval in seconds, used only while the last fetch failed.
pub const DEFAULT_RETRY_SECS: u64 = 60;

/// Refresh cadence: a steady interval, and a shorter retry interval that
/// applies while the last fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    pub interval: Duration,
    pub retry: Duration,
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            retry: Duration::from_secs(DEFAULT_RETRY_SECS),
        }
    }
}

impl RefreshSchedule {
    /// Delay before the next fetch, given whether the last one failed.
    pub fn next_delay(&self, in_error: bool) -> Duration {
        if in_error {
            self.retry
        } else {
            self.interval
        }
    }
}

/// Outcome of the most recent refresh, as a display surface sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorStatus {
    /// No fetch has completed yet.
    Idle,
    /// The last fetch succeeded.
    Ready {
        reading: PollutionReading,
        severity: SeverityInfo,
        fetched_at: DateTime<Utc>,
    },
    /// The last fetch failed. `message` keeps the cause for logs,
    /// `user_message` is display-ready.
    Error {
        message: String,
        user_message: String,
    },
}

impl MonitorStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Drives the primary client on behalf of a display surface and records
/// every outcome, success or failure. A later refresh simply overwrites
/// the previous status.
pub struct PollutionMonitor {
    client: AirQualityClient,
    schedule: RefreshSchedule,
    status: MonitorStatus,
}

impl PollutionMonitor {
    pub fn new(client: AirQualityClient, schedule: RefreshSchedule) -> Self {
        Self {
            client,
            schedule,
            status: MonitorStatus::Idle,
        }
    }

    pub fn status(&self) -> &MonitorStatus {
        &self.status
    }

    /// Delay until the next scheduled refresh, given the current status.
    pub fn next_delay(&self) -> Duration {
        self.schedule.next_delay(self.status.is_error())
    }

    /// Fetch and classify the current reading for the coordinates.
    ///
    /// Nothing is retried here; the schedule decides when to call again.
    pub async fn refresh(&mut self, coords: Coordinates) -> &MonitorStatus {
        match self.client.fetch_pollution(coords).await {
            Ok(reading) => {
                let severity = classify(reading.aqi);
                info!(
                    aqi = reading.aqi,
                    band = severity.description,
                    "Refreshed pollution reading"
                );
                self.status = MonitorStatus::Ready {
                    reading,
                    severity,
                    fetched_at: Utc::now(),
                };
            }
            Err(e) => {
                warn!("Pollution fetch failed: {}", e);
                self.status = MonitorStatus::Error {
                    message: e.to_string(),
                    user_message: e.user_message(),
                };
            }
        }
        &self.status
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn monitor_for(server: &MockServer) -> PollutionMonitor {
        PollutionMonitor::new(
            AirQualityClient::with_base_url(&server.uri()),
            RefreshSchedule::default(),
        )
    }

    #[test]
    fn test_schedule_defaults() {
        let schedule = RefreshSchedule::default();
        assert_eq!(schedule.interval, Duration::from_secs(1800));
        assert_eq!(schedule.retry, Duration::from_secs(60));
        assert_eq!(schedule.next_delay(false), Duration::from_secs(1800));
        assert_eq!(schedule.next_delay(true), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_refresh_success_records_ready() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/air-quality"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "current": { "us_aqi": 165, "pm10": 80.0, "pm2_5": 60.0 }
            })))
            .mount(&server)
            .await;

        let mut monitor = monitor_for(&server);
        assert_eq!(*monitor.status(), MonitorStatus::Idle);

        monitor.refresh(Coordinates::new(13.0827, 80.2707)).await;

        match monitor.status() {
            MonitorStatus::Ready {
                reading, severity, ..
            } => {
                assert_eq!(reading.aqi, 165);
                assert_eq!(severity.description, "Unhealthy");
            }
            other => panic!("expected Ready, got {other:?}"),
        }
        assert_eq!(monitor.next_delay(), Duration::from_secs(1800));
    }

    #[tokio::test]
    async fn test_refresh_failure_records_error_and_shortens_delay() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/air-quality"))
            .respond_with(ResponseTemplate::new(200).set_body_string("oops"))
            .mount(&server)
            .await;

        let mut monitor = monitor_for(&server);
        monitor.refresh(Coordinates::new(1.0, 2.0)).await;

        match monitor.status() {
            MonitorStatus::Error {
                message,
                user_message,
            } => {
                assert!(message.starts_with("Decode error:"));
                assert!(!user_message.is_empty());
            }
            other => panic!("expected Error, got {other:?}"),
        }
        assert_eq!(monitor.next_delay(), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_refresh_recovers_after_error() {
        let server = MockServer::start().await;

        // First response is garbage, the second is a good reading.
        Mock::given(method("GET"))
            .and(path("/v1/air-quality"))
            .respond_with(ResponseTemplate::new(200).set_body_string("oops"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/air-quality"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "current": { "us_aqi": 12, "pm10": 4.0, "pm2_5": 2.0 }
            })))
            .mount(&server)
            .await;

        let mut monitor = monitor_for(&server);
        let coords = Coordinates::new(1.0, 2.0);

        monitor.refresh(coords).await;
        assert!(monitor.status().is_error());

        monitor.refresh(coords).await;
        match monitor.status() {
            MonitorStatus::Ready { severity, .. } => assert_eq!(severity.description, "Good"),
            other => panic!("expected Ready, got {other:?}"),
        }
        assert_eq!(monitor.next_delay(), Duration::from_secs(1800));
    }
}
