/// Shared domain types for the monitoring dashboard.
///
/// Value records returned by the data providers (states, counties,
/// monitoring locations, time series, weather) plus the small state types
/// the stream engines publish (collection results, fetch states, selector
/// control states). All records are immutable once created; a stream
/// replaces its current value wholesale on each settle rather than
/// mutating it in place.

// ---------------------------------------------------------------------------
// USGS parameter codes
// ---------------------------------------------------------------------------

/// Gage height, feet. USGS parameter code.
pub const PARAM_GAGE_HEIGHT: &str = "00065";

/// Streamflow (discharge), cubic feet per second. USGS parameter code.
pub const PARAM_STREAMFLOW: &str = "00060";

/// Daily mean statistic code used for all daily-values requests.
pub const STAT_DAILY_MEAN: &str = "00003";

/// The two physical quantities charted for a monitoring location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    GageHeight,
    Streamflow,
}

impl Parameter {
    /// USGS parameter code for URL construction.
    pub fn code(&self) -> &'static str {
        match self {
            Parameter::GageHeight => PARAM_GAGE_HEIGHT,
            Parameter::Streamflow => PARAM_STREAMFLOW,
        }
    }

    /// Human-readable parameter name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Parameter::GageHeight => "Gage Height",
            Parameter::Streamflow => "Streamflow",
        }
    }

    /// Measurement unit as reported on charts.
    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::GageHeight => "ft",
            Parameter::Streamflow => "ft³/s",
        }
    }
}

// ---------------------------------------------------------------------------
// Collection entities (state → county → monitoring location)
// ---------------------------------------------------------------------------

/// A US state, identified by its FIPS code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub code: String,
    pub name: String,
}

/// A county within a state, identified by its FIPS code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct County {
    pub code: String,
    pub name: String,
    pub state_code: String,
}

/// A USGS stream monitoring location.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitoringLocation {
    pub id: String,
    pub name: String,
    pub location_type: String,
    pub county_name: String,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Snapshot of the current cascading selection.
///
/// A non-null `county_code` is only meaningful while the counties
/// collection loaded for `state_code` is current, and likewise for
/// `location_id` against the locations collection. Changing an upstream
/// field nulls out everything below it before any new fetch is issued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub state_code: Option<String>,
    pub county_code: Option<String>,
    pub location_id: Option<String>,
}

/// County choice paired with the state it was selected under.
///
/// The locations query needs both FIPS codes; capturing them together at
/// selection time guarantees a new state can never be paired with a county
/// chosen under the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountySelection {
    pub state_code: String,
    pub county_code: String,
}

/// Explicit state of one selector control.
///
/// `Disabled` while the level above is unsettled, `EnabledEmpty` once the
/// level's collection has settled, `EnabledWithSelection` once a value has
/// been chosen from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorControl {
    Disabled,
    EnabledEmpty,
    EnabledWithSelection,
}

// ---------------------------------------------------------------------------
// Stream output slots
// ---------------------------------------------------------------------------

/// One cascade level's published collection plus its loading flag.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionResult<T> {
    pub items: Vec<T>,
    pub loading: bool,
}

impl<T> CollectionResult<T> {
    /// The idle/empty value: nothing loaded, nothing loading. Also the
    /// published value after a failed fetch.
    pub fn empty() -> Self {
        Self { items: Vec::new(), loading: false }
    }

    /// A fresh collection that has finished loading.
    pub fn ready(items: Vec<T>) -> Self {
        Self { items, loading: false }
    }
}

impl<T> Default for CollectionResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// A derived stream's published result plus its loading flag.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub result: Option<T>,
    pub loading: bool,
}

impl<T> FetchState<T> {
    pub fn idle() -> Self {
        Self { result: None, loading: false }
    }

    pub fn ready(result: Option<T>) -> Self {
        Self { result, loading: false }
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// A single daily observation.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    /// Observation date as reported by the provider (ISO 8601 calendar date).
    pub time: String,
    pub value: f64,
}

/// Daily time series for one parameter at one monitoring location.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesData {
    pub location_id: String,
    pub parameter_code: String,
    pub parameter_name: String,
    pub unit: String,
    /// Points in ascending chronological order regardless of provider order.
    pub points: Vec<TimeSeriesPoint>,
    /// True only if the provider reported a nonzero result count AND at
    /// least one point was parsed. An empty-but-successful response and a
    /// failed response are otherwise indistinguishable downstream.
    pub has_data: bool,
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// The city/state the forecast office resolved the coordinates to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeatherLocation {
    pub city: String,
    pub state: String,
}

/// Spatial grid cell identifying where a forecast applies. Obtained from
/// the point-metadata lookup; required before the forecast itself can be
/// requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub grid_id: String,
    pub grid_x: u32,
    pub grid_y: u32,
}

/// Point-metadata lookup result: the resolved place name plus the grid
/// cell for the follow-up forecast request.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherPoint {
    pub city: String,
    pub state: String,
    pub grid_cell: GridCell,
}

/// A single forecast period.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherForecast {
    pub name: String,
    pub temperature: f64,
    pub temperature_unit: String,
    pub wind_speed: String,
    pub wind_direction: String,
    pub icon: String,
    pub probability_of_precipitation: f64,
    pub short_forecast: String,
    pub detailed_forecast: String,
}

/// Weather summary for a monitoring location. `current_forecast` holds the
/// first (current) period of the forecast sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherData {
    pub location: WeatherLocation,
    pub current_forecast: Option<WeatherForecast>,
    pub has_data: bool,
}

impl WeatherData {
    /// Terminal failure value: published when either weather request fails.
    pub fn unavailable() -> Self {
        Self {
            location: WeatherLocation::default(),
            current_forecast: None,
            has_data: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Time series request
// ---------------------------------------------------------------------------

/// Everything needed to request one daily time series.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesRequest {
    pub location_id: String,
    pub parameter: Parameter,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_codes_are_distinct() {
        assert_eq!(Parameter::GageHeight.code(), "00065");
        assert_eq!(Parameter::Streamflow.code(), "00060");
        assert_ne!(Parameter::GageHeight.unit(), Parameter::Streamflow.unit());
    }

    #[test]
    fn test_empty_collection_result_is_not_loading() {
        let empty: CollectionResult<State> = CollectionResult::empty();
        assert!(empty.items.is_empty());
        assert!(!empty.loading);
    }

    #[test]
    fn test_unavailable_weather_has_blank_location() {
        let weather = WeatherData::unavailable();
        assert_eq!(weather.location.city, "");
        assert_eq!(weather.location.state, "");
        assert!(weather.current_forecast.is_none());
        assert!(!weather.has_data);
    }
}
