/// Data provider interfaces.
///
/// The dashboard core never talks to a transport directly; it is handed
/// collaborator instances implementing these traits at construction time.
/// Production implementations live in this module (`usgs`, `nws`); tests
/// substitute in-memory fakes.
///
/// ```text
/// provider
/// ├── usgs     — USGS Water Data OGC API: URL construction + GeoJSON parsing
/// ├── nws      — National Weather Service API: point metadata + forecast
/// └── fixtures (test only) — representative API response payloads
/// ```

pub mod fixtures;
pub mod nws;
pub mod usgs;

use async_trait::async_trait;
use tracing::warn;

use crate::error::ProviderError;
use crate::model::{
    County, GridCell, MonitoringLocation, State, TimeSeriesData, TimeSeriesRequest, WeatherData,
    WeatherForecast, WeatherLocation, WeatherPoint,
};

/// Source of the cascading collections and the daily time series.
#[async_trait]
pub trait HydrologyProvider: Send + Sync {
    /// All US states, sorted alphabetically by name.
    async fn fetch_states(&self) -> Result<Vec<State>, ProviderError>;

    /// Counties of one state, sorted alphabetically by name.
    async fn fetch_counties(&self, state_code: &str) -> Result<Vec<County>, ProviderError>;

    /// Stream monitoring locations of one county.
    async fn fetch_locations(
        &self,
        state_code: &str,
        county_code: &str,
    ) -> Result<Vec<MonitoringLocation>, ProviderError>;

    /// Daily values for one parameter at one location, points in ascending
    /// chronological order.
    async fn fetch_time_series(
        &self,
        request: &TimeSeriesRequest,
    ) -> Result<TimeSeriesData, ProviderError>;
}

/// Source of forecasts. Two sequentially dependent requests: the point
/// lookup resolves coordinates to a grid cell, and only then can the
/// forecast for that cell be requested.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Resolves coordinates to the containing grid cell and place name.
    async fn fetch_point(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherPoint, ProviderError>;

    /// Forecast periods for a grid cell, current period first.
    async fn fetch_forecast(
        &self,
        grid_cell: &GridCell,
    ) -> Result<Vec<WeatherForecast>, ProviderError>;
}

/// Runs the two-step weather lookup for a set of coordinates.
///
/// A failure of either request collapses to the terminal failure value
/// ([`WeatherData::unavailable`]); the error is logged and never escapes.
pub async fn weather_for_location(
    provider: &dyn WeatherProvider,
    latitude: f64,
    longitude: f64,
) -> WeatherData {
    match try_weather(provider, latitude, longitude).await {
        Ok(weather) => weather,
        Err(err) => {
            warn!(
                error = %err,
                detail = err.detail().unwrap_or(""),
                latitude,
                longitude,
                "weather lookup failed"
            );
            WeatherData::unavailable()
        }
    }
}

async fn try_weather(
    provider: &dyn WeatherProvider,
    latitude: f64,
    longitude: f64,
) -> Result<WeatherData, ProviderError> {
    let point = provider.fetch_point(latitude, longitude).await?;
    let periods = provider.fetch_forecast(&point.grid_cell).await?;

    // Only the first period is shown: it is the current/next one.
    let current = periods.into_iter().next();

    Ok(WeatherData {
        location: WeatherLocation { city: point.city, state: point.state },
        has_data: current.is_some(),
        current_forecast: current,
    })
}
