//! Live location tracking.
//!
//! `LocationTracker` accepts coordinate fixes from a platform provider,
//! writes them through to the shared cache, resolves place names at most
//! once per 500 m of movement, and publishes every change as a
//! `LocationEvent`. Display surfaces subscribe to the event stream instead
//! of polling tracker state.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cache::LocationCache;
use crate::geocode::GeocodeClient;
use crate::types::Coordinates;

/// Minimum movement before another reverse-geocode lookup is made.
const RESOLVE_THRESHOLD_METERS: f64 = 500.0;

/// Change published by a [`LocationTracker`].
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    /// A new coordinate fix was accepted.
    Fix(Coordinates),
    /// A place name was resolved for the latest fix.
    PlaceName(String),
    /// The platform permission state changed.
    Permission(PermissionStatus),
}

/// Platform location-permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    NotDetermined,
    Granted,
    Denied,
}

impl PermissionStatus {
    /// Message to show the user, when the state warrants one.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Denied => Some("Location access denied. Please enable in Settings."),
            _ => None,
        }
    }
}

/// Suppresses reverse-geocode lookups until the fix has moved far enough
/// from the last coordinate a lookup was attempted for. Marking on attempt
/// rather than on success keeps a flaky geocoder from being hammered while
/// the device sits still.
#[derive(Debug, Default)]
struct ResolveGate {
    last_attempted: Option<Coordinates>,
}

impl ResolveGate {
    fn should_resolve(&self, coords: Coordinates) -> bool {
        match self.last_attempted {
            None => true,
            Some(prev) => prev.distance_meters(coords) >= RESOLVE_THRESHOLD_METERS,
        }
    }

    fn mark(&mut self, coords: Coordinates) {
        self.last_attempted = Some(coords);
    }
}

/// Owns live location state for one process.
///
/// Single-task by construction: callers feed it fixes and permission
/// changes from one place, so no locking is involved.
pub struct LocationTracker {
    cache: LocationCache,
    geocoder: GeocodeClient,
    events: mpsc::UnboundedSender<LocationEvent>,
    gate: ResolveGate,
    permission: PermissionStatus,
    status: String,
}

impl LocationTracker {
    pub fn new(
        cache: LocationCache,
        geocoder: GeocodeClient,
        events: mpsc::UnboundedSender<LocationEvent>,
    ) -> Self {
        Self {
            cache,
            geocoder,
            events,
            gate: ResolveGate::default(),
            permission: PermissionStatus::NotDetermined,
            status: "Initializing...".to_string(),
        }
    }

    /// Latest human-readable tracker state, for display next to the reading.
    pub fn status_message(&self) -> &str {
        &self.status
    }

    pub fn permission(&self) -> PermissionStatus {
        self.permission
    }

    /// Record a permission change and publish it.
    pub fn set_permission(&mut self, status: PermissionStatus) {
        info!("Location permission: {:?}", status);
        self.permission = status;
        self.status = match status {
            PermissionStatus::Granted => "Authorized. Updating...".to_string(),
            PermissionStatus::Denied => "Location access denied".to_string(),
            PermissionStatus::NotDetermined => "Awaiting location permission".to_string(),
        };
        self.send(LocationEvent::Permission(status));
    }

    /// Accept a coordinate fix from the platform provider.
    ///
    /// The coordinates go to the shared cache immediately; the city name
    /// follows once resolved, so cache readers may briefly see the new pair
    /// with the previous name.
    pub async fn push_fix(&mut self, coords: Coordinates) {
        if !coords.is_valid() {
            warn!(
                lat = coords.latitude,
                lon = coords.longitude,
                "Ignoring out-of-range fix"
            );
            return;
        }

        match self.cache.write(coords, None) {
            Ok(()) => self.status = "Location received".to_string(),
            Err(e) => {
                warn!("Failed to write location cache: {e:#}");
                self.status = format!("Error: {e:#}");
            }
        }
        self.send(LocationEvent::Fix(coords));

        if !self.gate.should_resolve(coords) {
            debug!("Fix within resolve threshold, keeping current place name");
            return;
        }
        self.gate.mark(coords);

        match self.geocoder.city_name(coords).await {
            Some(city) => {
                if let Err(e) = self.cache.write(coords, Some(&city)) {
                    warn!("Failed to write city name to cache: {e:#}");
                }
                self.send(LocationEvent::PlaceName(city));
            }
            None => {
                self.status = "Place name unavailable".to_string();
            }
        }
    }

    fn send(&self, event: LocationEvent) {
        if self.events.send(event).is_err() {
            debug!("Location event receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use tempfile::TempDir;
    use tokio::sync::mpsc::UnboundedReceiver;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // 0.0036 degrees of latitude is roughly 400 m, 0.0054 roughly 600 m.
    const NEARBY: Coordinates = Coordinates {
        latitude: 0.0036,
        longitude: 0.0,
    };
    const DISTANT: Coordinates = Coordinates {
        latitude: 0.0054,
        longitude: 0.0,
    };

    fn tracker_with(
        server: &MockServer,
        dir: &TempDir,
    ) -> (LocationTracker, UnboundedReceiver<LocationEvent>) {
        let cache = LocationCache::new(dir.path().join("location.json"));
        let (tx, rx) = mpsc::unbounded_channel();
        let tracker = LocationTracker::new(cache, GeocodeClient::with_base_url(&server.uri()), tx);
        (tracker, rx)
    }

    async fn mount_city(server: &MockServer, city: &str, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "address": { "city": city }
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fix_writes_cache_and_emits_events() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        mount_city(&server, "Origin City", 1).await;

        let (mut tracker, mut rx) = tracker_with(&server, &dir);
        let origin = Coordinates::new(0.0, 0.0);
        tracker.push_fix(origin).await;

        assert_eq!(rx.try_recv().unwrap(), LocationEvent::Fix(origin));
        assert_eq!(
            rx.try_recv().unwrap(),
            LocationEvent::PlaceName("Origin City".to_string())
        );

        let cache = LocationCache::new(dir.path().join("location.json"));
        let stored = cache.read().unwrap().unwrap();
        assert_eq!(stored.coordinates, origin);
        assert_eq!(stored.city_name.as_deref(), Some("Origin City"));
    }

    #[tokio::test]
    async fn test_nearby_fix_skips_second_lookup() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        mount_city(&server, "Origin City", 1).await;

        let (mut tracker, mut rx) = tracker_with(&server, &dir);
        tracker.push_fix(Coordinates::new(0.0, 0.0)).await;
        tracker.push_fix(NEARBY).await;

        // Two fixes, one place name.
        let events: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        let names = events
            .iter()
            .filter(|e| matches!(e, LocationEvent::PlaceName(_)))
            .count();
        assert_eq!(names, 1);

        // The nearby coordinates still reached the cache.
        let cache = LocationCache::new(dir.path().join("location.json"));
        let stored = cache.read().unwrap().unwrap();
        assert_eq!(stored.coordinates, NEARBY);
        assert_eq!(stored.city_name.as_deref(), Some("Origin City"));
    }

    #[tokio::test]
    async fn test_distant_fix_triggers_second_lookup() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        mount_city(&server, "Origin City", 2).await;

        let (mut tracker, _rx) = tracker_with(&server, &dir);
        tracker.push_fix(Coordinates::new(0.0, 0.0)).await;
        tracker.push_fix(DISTANT).await;
    }

    #[tokio::test]
    async fn test_failed_lookup_is_not_retried_while_still() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let (mut tracker, mut rx) = tracker_with(&server, &dir);
        tracker.push_fix(Coordinates::new(0.0, 0.0)).await;
        assert_eq!(tracker.status_message(), "Place name unavailable");

        // Movement below the threshold does not retry the lookup.
        tracker.push_fix(NEARBY).await;

        let events: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert!(events
            .iter()
            .all(|e| !matches!(e, LocationEvent::PlaceName(_))));
    }

    #[tokio::test]
    async fn test_invalid_fix_is_dropped() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        mount_city(&server, "Nowhere", 0).await;

        let (mut tracker, mut rx) = tracker_with(&server, &dir);
        tracker.push_fix(Coordinates::new(95.0, 0.0)).await;
        tracker.push_fix(Coordinates::new(0.0, -200.0)).await;

        assert!(rx.try_recv().is_err());

        let cache = LocationCache::new(dir.path().join("location.json"));
        assert_eq!(cache.read().unwrap(), None);
    }

    #[tokio::test]
    async fn test_permission_change_is_published() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();

        let (mut tracker, mut rx) = tracker_with(&server, &dir);
        assert_eq!(tracker.permission(), PermissionStatus::NotDetermined);

        tracker.set_permission(PermissionStatus::Denied);

        assert_eq!(
            rx.try_recv().unwrap(),
            LocationEvent::Permission(PermissionStatus::Denied)
        );
        assert_eq!(tracker.status_message(), "Location access denied");
        assert_eq!(
            PermissionStatus::Denied.user_message(),
            Some("Location access denied. Please enable in Settings.")
        );
        assert_eq!(PermissionStatus::Granted.user_message(), None);
    }

    #[tokio::test]
    async fn test_dropped_receiver_does_not_block_fixes() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        mount_city(&server, "Origin City", 1).await;

        let (mut tracker, rx) = tracker_with(&server, &dir);
        drop(rx);

        tracker.push_fix(Coordinates::new(0.0, 0.0)).await;

        let cache = LocationCache::new(dir.path().join("location.json"));
        assert!(cache.read().unwrap().is_some());
    }

    #[test]
    fn test_resolve_gate_thresholds() {
        let mut gate = ResolveGate::default();
        let origin = Coordinates::new(0.0, 0.0);

        assert!(gate.should_resolve(origin));
        gate.mark(origin);

        assert!(!gate.should_resolve(NEARBY));
        assert!(gate.should_resolve(DISTANT));
    }
}
