//! Stream-Gauge Dashboard - Demo Driver
//!
//! Drives one full selection cascade against the live USGS and NWS APIs
//! and prints what the dashboard streams deliver:
//! 1. Loads the states collection
//! 2. Selects the given state and lists its counties
//! 3. Selects the given county and lists its monitoring locations
//! 4. Selects the given location and waits for gage height, streamflow,
//!    and the weather forecast to settle
//!
//! Usage:
//!   cargo run --release -- 17                      # list counties of Illinois
//!   cargo run --release -- 17 143                  # list locations in Peoria County
//!   cargo run --release -- 17 143 USGS-05568500    # full cascade with charts + weather
//!   cargo run --release -- --config dashboard.toml 17 143 USGS-05568500

use std::env;
use std::path::Path;
use std::sync::Arc;

use hydrodash_service::config::{self, DashboardConfig};
use hydrodash_service::dashboard::Dashboard;
use hydrodash_service::model::{CollectionResult, FetchState, TimeSeriesData};
use hydrodash_service::provider::nws::NwsWeatherClient;
use hydrodash_service::provider::usgs::UsgsWaterDataClient;
use hydrodash_service::stream::ReplayStream;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hydrodash_service=info")),
        )
        .init();

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<String> = None;
    let mut codes: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Usage: {} [--config PATH] STATE_FIPS [COUNTY_FIPS [LOCATION_ID]]", args[0]);
                std::process::exit(1);
            }
            code => {
                codes.push(code.to_string());
                i += 1;
            }
        }
    }

    if codes.is_empty() || codes.len() > 3 {
        eprintln!("Usage: {} [--config PATH] STATE_FIPS [COUNTY_FIPS [LOCATION_ID]]", args[0]);
        std::process::exit(1);
    }

    let config = match config_path {
        Some(path) => match config::load_config(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                std::process::exit(1);
            }
        },
        None => DashboardConfig::default(),
    };

    println!("🌊 Stream-Gauge Dashboard");
    println!("=========================\n");

    let hydrology = Arc::new(UsgsWaterDataClient::new(&config));
    let weather = Arc::new(NwsWeatherClient::new(&config));
    let dashboard = Dashboard::new(hydrology, weather);

    // States load immediately at construction.
    let mut states = dashboard.states();
    let loaded = wait_collection(&mut states).await;
    println!("✓ {} states loaded", loaded.items.len());

    dashboard.select_state(codes[0].clone());
    let mut counties = dashboard.counties();
    let loaded = wait_collection(&mut counties).await;
    println!("✓ {} counties in state {}", loaded.items.len(), codes[0]);

    let Some(county_code) = codes.get(1) else {
        for county in &loaded.items {
            println!("   {} - {}", county.code, county.name);
        }
        return;
    };

    dashboard.select_county(county_code.clone());
    let mut locations = dashboard.locations();
    let loaded = wait_collection(&mut locations).await;
    println!("✓ {} monitoring locations in county {}", loaded.items.len(), county_code);

    let Some(location_id) = codes.get(2) else {
        for location in &loaded.items {
            println!("   {} - {}", location.id, location.name);
        }
        return;
    };

    dashboard.select_location(location_id.clone());

    let mut gage_height = dashboard.gage_height();
    let mut streamflow = dashboard.streamflow();
    let mut weather_stream = dashboard.weather();

    let gage = wait_fetch(&mut gage_height).await;
    print_series("Gage height", gage);

    let flow = wait_fetch(&mut streamflow).await;
    print_series("Streamflow", flow);

    let weather = wait_fetch(&mut weather_stream).await;
    match weather.result.and_then(|data| {
        data.current_forecast.map(|forecast| (data.location, forecast))
    }) {
        Some((location, forecast)) => {
            println!(
                "✓ Weather near {}, {}: {} - {}°{}, wind {} {}",
                location.city,
                location.state,
                forecast.name,
                forecast.temperature,
                forecast.temperature_unit,
                forecast.wind_direction,
                forecast.wind_speed
            );
        }
        None => println!("✗ Weather: no forecast available"),
    }
}

fn print_series(label: &str, state: FetchState<TimeSeriesData>) {
    match state.result {
        Some(series) if series.has_data => match series.points.last() {
            Some(latest) => println!(
                "✓ {}: {} daily values, latest {} {} on {}",
                series.parameter_name,
                series.points.len(),
                latest.value,
                series.unit,
                latest.time
            ),
            None => println!("✗ {}: no data available", label),
        },
        _ => println!("✗ {}: no data available", label),
    }
}

/// Waits until a collection stream settles (loading cleared).
async fn wait_collection<T: Clone>(stream: &mut ReplayStream<CollectionResult<T>>) -> CollectionResult<T> {
    // Give the trigger a moment to propagate into the engine.
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    loop {
        let current = stream.current();
        if !current.loading {
            return current;
        }
        if stream.changed().await.is_none() {
            return stream.current();
        }
    }
}

/// Waits until a derived stream settles.
async fn wait_fetch<T: Clone>(stream: &mut ReplayStream<FetchState<T>>) -> FetchState<T> {
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    loop {
        let current = stream.current();
        if !current.loading {
            return current;
        }
        if stream.changed().await.is_none() {
            return stream.current();
        }
    }
}
