//! Long-running tracker process.
//!
//! Owns the live location session and keeps the displayed reading fresh:
//! refreshes on every accepted fix, then on a steady schedule, dropping to
//! the short retry interval while the last fetch failed.

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::sleep;

use airq_core::{
    AirQualityClient, Config, GeocodeClient, LocationEvent, LocationTracker, MonitorStatus,
    PermissionStatus, PollutionMonitor,
};

#[tokio::main]
async fn main() -> Result<()> {
    airq_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    let cache = config.location_cache()?;
    tracing::info!("Location cache at {}", cache.path().display());

    let cached = match cache.read() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Unreadable location cache: {e:#}");
            None
        }
    };

    // Fix source: the configured fixed location wins, then the last cached
    // one. A platform location provider would feed push_fix the same way.
    let (seed, mut city) = match config.location.coordinates() {
        Some(coords) => (Some(coords), None),
        None => match cached {
            Some(loc) => (Some(loc.coordinates), loc.city_name),
            None => (None, None),
        },
    };

    let Some(mut coords) = seed else {
        anyhow::bail!(
            "No location available.\n\
             Hint: set [location] latitude/longitude in the airq config file."
        );
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut tracker = LocationTracker::new(cache, GeocodeClient::new()?, tx);
    let mut monitor = PollutionMonitor::new(AirQualityClient::new()?, config.refresh.schedule());

    tracker.set_permission(PermissionStatus::Granted);
    tracker.push_fix(coords).await;

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(LocationEvent::Fix(fix)) => {
                        coords = fix;
                        monitor.refresh(coords).await;
                        render(&monitor, city.as_deref(), tracker.status_message());
                    }
                    Some(LocationEvent::PlaceName(name)) => {
                        city = Some(name);
                        render(&monitor, city.as_deref(), tracker.status_message());
                    }
                    Some(LocationEvent::Permission(status)) => {
                        if let Some(message) = status.user_message() {
                            println!("{message}");
                        }
                    }
                    None => break,
                }
            }
            _ = sleep(monitor.next_delay()) => {
                monitor.refresh(coords).await;
                render(&monitor, city.as_deref(), tracker.status_message());
            }
        }
    }

    Ok(())
}

/// Print the menu-bar label line and the detail line below it.
fn render(monitor: &PollutionMonitor, city: Option<&str>, tracker_status: &str) {
    let place = city.unwrap_or("Current Location");

    match monitor.status() {
        MonitorStatus::Idle => {
            println!("-- ({place}: {tracker_status})");
        }
        MonitorStatus::Ready {
            reading,
            severity,
            fetched_at,
        } => {
            println!("{} {}", severity.band.icon_name(), reading.aqi);
            println!(
                "  {} ({}) | PM10 {:.1} | PM2.5 {:.1} | {} | updated {}",
                severity.description,
                severity.color.name(),
                reading.pm10,
                reading.pm2_5,
                place,
                fetched_at.format("%H:%M:%S"),
            );
        }
        MonitorStatus::Error { user_message, .. } => {
            println!("! --");
            println!("  {user_message} ({place}: {tracker_status})");
        }
    }
}
