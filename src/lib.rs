/// hydrodash_service: reactive core for a stream-gauge monitoring dashboard.
///
/// # Module structure
///
/// ```text
/// hydrodash_service
/// ├── model      — shared domain types (State, County, MonitoringLocation,
/// │                TimeSeriesData, WeatherData, selector states, …)
/// ├── error      — provider error classification (four fixed categories)
/// ├── config     — provider endpoint configuration loader (dashboard.toml)
/// ├── selection  — cascading state → county → location selection with
/// │                synchronous downstream reset rules
/// ├── stream
/// │   ├── replay   — retained-value multicast cell
/// │   ├── cascade  — dependent collection fetches with supersession
/// │   ├── derived  — terminal keyed fetches with supersession
/// │   └── resolver — location-id → entity recombination
/// ├── provider
/// │   ├── usgs   — USGS Water Data OGC API: URLs + GeoJSON parsing
/// │   ├── nws    — NWS API: point metadata + gridpoint forecast
/// │   └── fixtures (test only) — representative API response payloads
/// └── dashboard  — facade wiring the whole dependency graph
/// ```

/// Public modules
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod provider;
pub mod selection;
pub mod stream;
