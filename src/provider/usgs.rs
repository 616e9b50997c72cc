/// USGS Water Data OGC API client.
///
/// Handles URL construction and GeoJSON response parsing for the USGS
/// Water Data API:
///   https://api.waterdata.usgs.gov/ogcapi/v0
///
/// Four collections are queried: `states`, `counties`,
/// `monitoring-locations`, and `daily`. Every response is a GeoJSON
/// feature collection; the per-collection shape differs only in the
/// `properties` object, so deserialization is generic over it. See
/// `fixtures.rs` for annotated examples of the response structures.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::config::DashboardConfig;
use crate::error::ProviderError;
use crate::model::{
    County, MonitoringLocation, State, TimeSeriesData, TimeSeriesPoint, TimeSeriesRequest,
    STAT_DAILY_MEAN,
};
use crate::provider::HydrologyProvider;

// ---------------------------------------------------------------------------
// Serde structures for GeoJSON deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct FeatureCollection<P> {
    #[serde(default)]
    features: Vec<Feature<P>>,
    #[serde(rename = "numberReturned")]
    number_returned: Option<u64>,
}

#[derive(Deserialize)]
struct Feature<P> {
    #[serde(default)]
    id: Option<String>,
    properties: P,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Deserialize, Default)]
struct Geometry {
    /// GeoJSON order: [longitude, latitude].
    coordinates: Vec<f64>,
}

#[derive(Deserialize, Default)]
struct StateProperties {
    state_fips_code: String,
    state_name: String,
}

#[derive(Deserialize, Default)]
struct CountyProperties {
    county_fips_code: String,
    county_name: String,
    state_fips_code: String,
}

#[derive(Deserialize, Default)]
struct LocationProperties {
    monitoring_location_name: String,
    #[serde(default)]
    site_type: Option<String>,
    #[serde(default)]
    monitoring_location_type: Option<String>,
    #[serde(default)]
    county_name: String,
}

#[derive(Deserialize, Default)]
struct DailyProperties {
    time: String,
    /// Null when the observation exists but no value was recorded.
    value: Option<f64>,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds the URL for the full US states collection.
pub fn build_states_url(base_url: &str, limit: u32) -> String {
    format!(
        "{}/collections/states/items?f=json&country_code=US&limit={}",
        base_url, limit
    )
}

/// Builds the URL for the counties of one state.
pub fn build_counties_url(base_url: &str, state_fips_code: &str, limit: u32) -> String {
    format!(
        "{}/collections/counties/items?f=json&country_code=US&state_fips_code={}&limit={}",
        base_url, state_fips_code, limit
    )
}

/// Builds the URL for the active USGS stream monitoring locations of one
/// county.
pub fn build_locations_url(
    base_url: &str,
    state_code: &str,
    county_code: &str,
    limit: u32,
) -> String {
    format!(
        "{}/collections/monitoring-locations/items?f=json&country_code=US&state_code={}&county_code={}&agency_code=USGS&site_type=Stream&limit={}",
        base_url, state_code, county_code, limit
    )
}

/// Builds the URL for one daily time series. The date range is passed as a
/// `start/end` interval of calendar dates, and the statistic is always the
/// daily mean.
pub fn build_daily_url(base_url: &str, request: &TimeSeriesRequest, limit: u32) -> String {
    format!(
        "{}/collections/daily/items?f=json&monitoring_location_id={}&parameter_code={}&statistic_id={}&datetime={}/{}&limit={}",
        base_url,
        request.location_id,
        request.parameter.code(),
        STAT_DAILY_MEAN,
        request.start_date.format("%Y-%m-%d"),
        request.end_date.format("%Y-%m-%d"),
        limit
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses the states collection, sorted alphabetically by name.
///
/// # Errors
/// `ProviderError::Other` — malformed or unexpected JSON structure.
pub fn parse_states_response(json: &str) -> Result<Vec<State>, ProviderError> {
    let response: FeatureCollection<StateProperties> = serde_json::from_str(json)
        .map_err(|e| ProviderError::other(format!("JSON deserialization failed: {}", e)))?;

    let mut states: Vec<State> = response
        .features
        .into_iter()
        .map(|f| State {
            code: f.properties.state_fips_code,
            name: f.properties.state_name,
        })
        .collect();

    states.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(states)
}

/// Parses the counties collection, sorted alphabetically by name.
///
/// # Errors
/// `ProviderError::Other` — malformed or unexpected JSON structure.
pub fn parse_counties_response(json: &str) -> Result<Vec<County>, ProviderError> {
    let response: FeatureCollection<CountyProperties> = serde_json::from_str(json)
        .map_err(|e| ProviderError::other(format!("JSON deserialization failed: {}", e)))?;

    let mut counties: Vec<County> = response
        .features
        .into_iter()
        .map(|f| County {
            code: f.properties.county_fips_code,
            name: f.properties.county_name,
            state_code: f.properties.state_fips_code,
        })
        .collect();

    counties.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(counties)
}

/// Parses the monitoring-locations collection. Missing geometry yields
/// 0.0/0.0 coordinates rather than dropping the location; a missing type
/// defaults to "Stream" (the only site type queried).
///
/// # Errors
/// `ProviderError::Other` — malformed or unexpected JSON structure.
pub fn parse_locations_response(json: &str) -> Result<Vec<MonitoringLocation>, ProviderError> {
    let response: FeatureCollection<LocationProperties> = serde_json::from_str(json)
        .map_err(|e| ProviderError::other(format!("JSON deserialization failed: {}", e)))?;

    let locations = response
        .features
        .into_iter()
        .map(|f| {
            let geometry = f.geometry.unwrap_or_default();
            let longitude = geometry.coordinates.first().copied().unwrap_or(0.0);
            let latitude = geometry.coordinates.get(1).copied().unwrap_or(0.0);

            MonitoringLocation {
                id: f.id.unwrap_or_default(),
                name: f.properties.monitoring_location_name,
                location_type: f
                    .properties
                    .site_type
                    .or(f.properties.monitoring_location_type)
                    .unwrap_or_else(|| "Stream".to_string()),
                county_name: f.properties.county_name,
                latitude,
                longitude,
            }
        })
        .collect();

    Ok(locations)
}

/// Parses one daily time series. Observations with a null value are
/// skipped; the remaining points are sorted into ascending chronological
/// order regardless of how the provider returned them.
///
/// `has_data` is true only if the provider reported a nonzero
/// `numberReturned` AND at least one point survived parsing.
///
/// # Errors
/// `ProviderError::Other` — malformed or unexpected JSON structure.
pub fn parse_daily_response(
    json: &str,
    request: &TimeSeriesRequest,
) -> Result<TimeSeriesData, ProviderError> {
    let response: FeatureCollection<DailyProperties> = serde_json::from_str(json)
        .map_err(|e| ProviderError::other(format!("JSON deserialization failed: {}", e)))?;

    let number_returned = response.number_returned.unwrap_or(0);

    let mut points: Vec<TimeSeriesPoint> = response
        .features
        .into_iter()
        .filter_map(|f| {
            f.properties
                .value
                .map(|value| TimeSeriesPoint { time: f.properties.time, value })
        })
        .collect();

    points.sort_by(|a, b| observation_instant(&a.time).cmp(&observation_instant(&b.time)));

    let has_data = number_returned > 0 && !points.is_empty();

    Ok(TimeSeriesData {
        location_id: request.location_id.clone(),
        parameter_code: request.parameter.code().to_string(),
        parameter_name: request.parameter.display_name().to_string(),
        unit: request.parameter.unit().to_string(),
        points,
        has_data,
    })
}

/// Sort key for observation timestamps. The daily collection reports plain
/// calendar dates, but full RFC 3339 timestamps are accepted too.
/// Unparseable timestamps sort first rather than failing the whole series.
fn observation_instant(time: &str) -> NaiveDateTime {
    DateTime::parse_from_rfc3339(time)
        .map(|dt| dt.naive_utc())
        .or_else(|_| {
            NaiveDate::parse_from_str(time, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .unwrap_or(NaiveDateTime::MIN)
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Production [`HydrologyProvider`] backed by the USGS Water Data API.
pub struct UsgsWaterDataClient {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
    collection_page_limit: u32,
    location_page_limit: u32,
    daily_page_limit: u32,
}

impl UsgsWaterDataClient {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.usgs_base_url.clone(),
            user_agent: config.user_agent.clone(),
            collection_page_limit: config.collection_page_limit,
            location_page_limit: config.location_page_limit,
            daily_page_limit: config.daily_page_limit,
        }
    }

    async fn get_json_text(&self, url: &str) -> Result<String, ProviderError> {
        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
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
impl HydrologyProvider for UsgsWaterDataClient {
    async fn fetch_states(&self) -> Result<Vec<State>, ProviderError> {
        let url = build_states_url(&self.base_url, self.collection_page_limit);
        let body = self.get_json_text(&url).await?;
        parse_states_response(&body)
    }

    async fn fetch_counties(&self, state_code: &str) -> Result<Vec<County>, ProviderError> {
        let url = build_counties_url(&self.base_url, state_code, self.collection_page_limit);
        let body = self.get_json_text(&url).await?;
        parse_counties_response(&body)
    }

    async fn fetch_locations(
        &self,
        state_code: &str,
        county_code: &str,
    ) -> Result<Vec<MonitoringLocation>, ProviderError> {
        let url =
            build_locations_url(&self.base_url, state_code, county_code, self.location_page_limit);
        let body = self.get_json_text(&url).await?;
        parse_locations_response(&body)
    }

    async fn fetch_time_series(
        &self,
        request: &TimeSeriesRequest,
    ) -> Result<TimeSeriesData, ProviderError> {
        let url = build_daily_url(&self.base_url, request, self.daily_page_limit);
        let body = self.get_json_text(&url).await?;
        parse_daily_response(&body, request)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
