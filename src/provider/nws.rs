/// National Weather Service API client.
///
/// Retrieves forecasts from the NWS public API in two sequentially
/// dependent requests:
///   1. `GET /points/{lat},{lon}` — resolves coordinates to a forecast
///      grid cell and a place name.
///   2. `GET /gridpoints/{office}/{x},{y}/forecast` — the forecast periods
///      for that cell.
///
/// API documentation: https://www.weather.gov/documentation/services-web-api

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::DashboardConfig;
use crate::error::ProviderError;
use crate::model::{GridCell, WeatherForecast, WeatherPoint};
use crate::provider::WeatherProvider;

// ---------------------------------------------------------------------------
// Serde structures for NWS responses
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PointResponse {
    properties: PointProperties,
}

#[derive(Deserialize)]
struct PointProperties {
    #[serde(rename = "relativeLocation")]
    relative_location: RelativeLocation,
    #[serde(rename = "gridId")]
    grid_id: String,
    #[serde(rename = "gridX")]
    grid_x: u32,
    #[serde(rename = "gridY")]
    grid_y: u32,
}

#[derive(Deserialize)]
struct RelativeLocation {
    properties: RelativeLocationProperties,
}

#[derive(Deserialize)]
struct RelativeLocationProperties {
    city: String,
    state: String,
}

#[derive(Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Deserialize)]
struct ForecastProperties {
    periods: Vec<ForecastPeriod>,
}

#[derive(Deserialize)]
struct ForecastPeriod {
    name: String,
    temperature: f64,
    #[serde(rename = "temperatureUnit")]
    temperature_unit: String,
    #[serde(rename = "windSpeed")]
    wind_speed: String,
    #[serde(rename = "windDirection")]
    wind_direction: String,
    icon: String,
    #[serde(rename = "shortForecast")]
    short_forecast: String,
    #[serde(rename = "detailedForecast")]
    detailed_forecast: String,
    #[serde(rename = "probabilityOfPrecipitation", default)]
    probability_of_precipitation: Option<PrecipitationProbability>,
}

#[derive(Deserialize)]
struct PrecipitationProbability {
    value: Option<f64>,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds the point-metadata URL. Coordinates are rounded to 4 decimal
/// places to match API expectations.
pub fn build_point_url(base_url: &str, latitude: f64, longitude: f64) -> String {
    format!("{}/points/{:.4},{:.4}", base_url, latitude, longitude)
}

/// Builds the forecast URL for a grid cell obtained from a point lookup.
pub fn build_forecast_url(base_url: &str, grid_cell: &GridCell) -> String {
    format!(
        "{}/gridpoints/{}/{},{}/forecast",
        base_url, grid_cell.grid_id, grid_cell.grid_x, grid_cell.grid_y
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a point-metadata response into the place name and grid cell.
///
/// # Errors
/// `ProviderError::Other` — malformed or unexpected JSON structure.
pub fn parse_point_response(json: &str) -> Result<WeatherPoint, ProviderError> {
    let response: PointResponse = serde_json::from_str(json)
        .map_err(|e| ProviderError::other(format!("JSON deserialization failed: {}", e)))?;

    let props = response.properties;
    Ok(WeatherPoint {
        city: props.relative_location.properties.city,
        state: props.relative_location.properties.state,
        grid_cell: GridCell {
            grid_id: props.grid_id,
            grid_x: props.grid_x,
            grid_y: props.grid_y,
        },
    })
}

/// Parses a forecast response into its period list, response order
/// preserved (the first period is the current one). A null precipitation
/// probability becomes 0.
///
/// # Errors
/// `ProviderError::Other` — malformed or unexpected JSON structure.
pub fn parse_forecast_response(json: &str) -> Result<Vec<WeatherForecast>, ProviderError> {
    let response: ForecastResponse = serde_json::from_str(json)
        .map_err(|e| ProviderError::other(format!("JSON deserialization failed: {}", e)))?;

    let periods = response
        .properties
        .periods
        .into_iter()
        .map(|p| WeatherForecast {
            name: p.name,
            temperature: p.temperature,
            temperature_unit: p.temperature_unit,
            wind_speed: p.wind_speed,
            wind_direction: p.wind_direction,
            icon: p.icon,
            probability_of_precipitation: p
                .probability_of_precipitation
                .and_then(|p| p.value)
                .unwrap_or(0.0),
            short_forecast: p.short_forecast,
            detailed_forecast: p.detailed_forecast,
        })
        .collect();

    Ok(periods)
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Production [`WeatherProvider`] backed by api.weather.gov.
pub struct NwsWeatherClient {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl NwsWeatherClient {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.weather_base_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    async fn get_json_text(&self, url: &str) -> Result<String, ProviderError> {
        let response = self
            .http
            .get(url)
            .header("Accept", "application/geo+json")
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::from_status(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl WeatherProvider for NwsWeatherClient {
    async fn fetch_point(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherPoint, ProviderError> {
        let url = build_point_url(&self.base_url, latitude, longitude);
        let body = self.get_json_text(&url).await?;
        parse_point_response(&body)
    }

    async fn fetch_forecast(
        &self,
        grid_cell: &GridCell,
    ) -> Result<Vec<WeatherForecast>, ProviderError> {
        let url = build_forecast_url(&self.base_url, grid_cell);
        let body = self.get_json_text(&url).await?;
        parse_forecast_response(&body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::fixtures::*;

    const BASE: &str = "https://api.weather.gov";

    #[test]
    fn test_point_url_rounds_coordinates_to_four_decimals() {
        let url = build_point_url(BASE, 40.56139999, -89.99561111);
        assert_eq!(url, "https://api.weather.gov/points/40.5614,-89.9956");
    }

    #[test]
    fn test_point_url_pads_short_coordinates() {
        let url = build_point_url(BASE, 40.5, -89.9);
        assert_eq!(
            url, "https://api.weather.gov/points/40.5000,-89.9000",
            "API expects exactly four decimal places"
        );
    }

    #[test]
    fn test_forecast_url_embeds_grid_cell() {
        let cell = GridCell { grid_id: "ILX".to_string(), grid_x: 42, grid_y: 73 };
        let url = build_forecast_url(BASE, &cell);
        assert_eq!(url, "https://api.weather.gov/gridpoints/ILX/42,73/forecast");
    }

    #[test]
    fn test_parse_point_extracts_place_name_and_grid_cell() {
        let point = parse_point_response(fixture_weather_point_json())
            .expect("valid fixture should parse without error");

        assert_eq!(point.city, "Peoria");
        assert_eq!(point.state, "IL");
        assert_eq!(point.grid_cell.grid_id, "ILX");
        assert_eq!(point.grid_cell.grid_x, 42);
        assert_eq!(point.grid_cell.grid_y, 73);
    }

    #[test]
    fn test_parse_forecast_preserves_period_order() {
        let periods = parse_forecast_response(fixture_weather_forecast_json())
            .expect("valid fixture should parse");

        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].name, "This Afternoon", "current period must come first");
        assert_eq!(periods[1].name, "Tonight");
        assert!((periods[0].temperature - 68.0).abs() < f64::EPSILON);
        assert_eq!(periods[0].temperature_unit, "F");
    }

    #[test]
    fn test_parse_forecast_null_precipitation_becomes_zero() {
        let periods = parse_forecast_response(fixture_weather_forecast_json())
            .expect("should parse");

        let tonight = &periods[1];
        assert_eq!(
            tonight.probability_of_precipitation, 0.0,
            "null precipitation probability should default to 0"
        );
    }

    #[test]
    fn test_parse_point_malformed_json_returns_generic_error() {
        let result = parse_point_response("not json at all");
        assert!(matches!(result, Err(ProviderError::Other { .. })));
    }
}
