//! Verification tool.
//!
//! Three checks against the live stack: the classifier's banding, the
//! primary provider, and a primary/secondary comparison when a WAQI token
//! is configured. The comparison is informational; a secondary failure is
//! reported but never fails the run.

use anyhow::Result;

use airq_core::{
    classify, AirQualityClient, Config, Coordinates, Severity, SeverityColor, WaqiClient,
};

const CHENNAI: Coordinates = Coordinates {
    latitude: 13.0827,
    longitude: 80.2707,
};

const SAN_FRANCISCO: Coordinates = Coordinates {
    latitude: 37.7749,
    longitude: -122.4194,
};

#[tokio::main]
async fn main() -> Result<()> {
    airq_core::init()?;

    println!("--- AIRQ VERIFICATION ---");

    println!("\n[1] Classifier");
    let info = classify(55);
    if info.band == Severity::Moderate && info.color == SeverityColor::Yellow {
        println!("ok: AQI 55 is Moderate / Yellow");
    } else {
        println!("FAILED: AQI 55 classified as {:?} / {:?}", info.band, info.color);
    }

    println!("\n[2] Primary provider (Chennai)");
    let client = AirQualityClient::new()?;
    match client.fetch_pollution(CHENNAI).await {
        Ok(reading) => println!(
            "ok: AQI {} ({}), PM10 {:.1}, PM2.5 {:.1}",
            reading.aqi,
            classify(reading.aqi).description,
            reading.pm10,
            reading.pm2_5,
        ),
        Err(e) => println!("FAILED: {e}"),
    }

    println!("\n[3] Provider comparison (San Francisco)");
    let config = Config::load()?;
    if config.waqi.is_configured() {
        let token = config.waqi.token.as_deref().unwrap_or_default();
        let waqi = WaqiClient::new()?;

        let (primary, secondary) = tokio::join!(
            client.fetch_pollution(SAN_FRANCISCO),
            waqi.fetch_aqi(SAN_FRANCISCO, token),
        );

        match (primary, secondary) {
            (Ok(reading), Ok(aqi)) => {
                println!("Open-Meteo AQI: {}", reading.aqi);
                println!("WAQI AQI:      {aqi}");
                println!("Difference:    {}", (reading.aqi - aqi).abs());
            }
            (Ok(reading), Err(e)) => {
                println!("Open-Meteo AQI: {}", reading.aqi);
                println!("WAQI unavailable (non-fatal): {e}");
            }
            (Err(e), _) => println!("FAILED: primary fetch: {e}"),
        }
    } else {
        println!("skipped: no WAQI token configured");
    }

    println!("\nVerification complete.");
    Ok(())
}
