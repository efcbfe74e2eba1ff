//! Widget process.
//!
//! Renders one air-quality snapshot without a live location session: reads
//! the location another process cached, falls back to a fixed city when the
//! cache is unset, fetches once, prints, and reports when the next snapshot
//! is due.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Parser;

use airq_core::{classify, AirQualityClient, Config, Coordinates, PollutionReading};

/// Render one air-quality snapshot from the shared location cache.
#[derive(Debug, Parser)]
#[command(name = "airq-widget", version, about = "Air quality snapshot")]
struct Args {
    /// Print the sample preview entry instead of fetching.
    #[arg(long)]
    preview: bool,
}

/// Coordinates used when no process has cached a location yet (Chennai).
const FALLBACK_COORDS: Coordinates = Coordinates {
    latitude: 13.0827,
    longitude: 80.2707,
};

/// One rendered snapshot. `reading` is absent when the fetch failed; the
/// widget shows a placeholder rather than an error trace.
struct SnapshotEntry {
    date: DateTime<Utc>,
    reading: Option<PollutionReading>,
    city: Option<String>,
}

impl SnapshotEntry {
    /// Sample entry shown on preview surfaces. Never fetched.
    fn placeholder() -> Self {
        Self {
            date: Utc::now(),
            reading: Some(PollutionReading {
                aqi: 27,
                pm10: 10.0,
                pm2_5: 5.0,
            }),
            city: Some("Current Location".to_string()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    airq_core::init()?;

    if args.preview {
        print_entry(&SnapshotEntry::placeholder());
        return Ok(());
    }

    let config = Config::load()?;
    let cache = config.location_cache()?;

    let cached = match cache.read() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Unreadable location cache: {e:#}");
            None
        }
    };

    let (coords, city) = match cached {
        Some(loc) => (loc.coordinates, loc.city_name),
        None => {
            tracing::info!("No cached location, using fallback city");
            (FALLBACK_COORDS, Some("Unknown".to_string()))
        }
    };

    let client = AirQualityClient::new()?;
    let reading = match client.fetch_pollution(coords).await {
        Ok(r) => Some(r),
        Err(e) => {
            tracing::warn!("Snapshot fetch failed: {}", e);
            None
        }
    };

    let entry = SnapshotEntry {
        date: Utc::now(),
        reading,
        city,
    };
    print_entry(&entry);

    let next = config.refresh.schedule().interval;
    println!("Next refresh in {}s", next.as_secs());

    Ok(())
}

fn print_entry(entry: &SnapshotEntry) {
    let place = entry.city.as_deref().unwrap_or("Current Location");

    match entry.reading {
        Some(reading) => {
            let info = classify(reading.aqi);
            println!(
                "{}  AQI {}  {}  [{}]",
                place,
                reading.aqi,
                info.description,
                entry.date.format("%H:%M"),
            );
        }
        None => {
            println!("{}  No Data  Check App  [{}]", place, entry.date.format("%H:%M"));
        }
    }
}
