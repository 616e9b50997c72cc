/// Dashboard facade: wires the whole dependency graph.
///
/// Data flows strictly downward:
///
/// ```text
/// SelectionState ──▶ counties cascade ──▶ locations cascade ──▶ resolver
///                                             │                    │
///                         gage height ◀───────┤                    ▼
///                         streamflow  ◀───────┘                 weather
/// ```
///
/// Control flows upward only through the explicit selection calls, which
/// reset and disable everything downstream before a new fetch can start.
/// Every stream is multicast with replay: attach as many consumers as
/// needed, late ones get the latest value without re-fetching.

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use tracing::warn;

use crate::error::ProviderError;
use crate::model::{
    CollectionResult, County, CountySelection, FetchState, MonitoringLocation, Parameter,
    Selection, SelectorControl, State, TimeSeriesData, TimeSeriesRequest, WeatherData,
};
use crate::provider::{self, HydrologyProvider, WeatherProvider};
use crate::selection::SelectionState;
use crate::stream::{spawn_cascade, spawn_derived, spawn_resolver, ReplayCache, ReplayStream};

/// Days of history requested for the chart series, counted back from
/// today. The window is inclusive on both ends.
pub const DAILY_LOOKBACK_DAYS: i64 = 90;

/// Inclusive calendar-date window for a daily time-series request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Computes the chart window for the given "today", in whatever timezone
/// the caller derived it from.
pub fn daily_window(today: NaiveDate) -> DateWindow {
    DateWindow { start: today - Duration::days(DAILY_LOOKBACK_DAYS), end: today }
}

/// The assembled dashboard core. Construct inside a tokio runtime: the
/// stream engines are spawned as tasks and the states collection starts
/// loading immediately.
pub struct Dashboard {
    selection: SelectionState,
    states: ReplayStream<CollectionResult<State>>,
    counties: ReplayStream<CollectionResult<County>>,
    locations: ReplayStream<CollectionResult<MonitoringLocation>>,
    selected_location: ReplayStream<Option<MonitoringLocation>>,
    gage_height: ReplayStream<FetchState<TimeSeriesData>>,
    streamflow: ReplayStream<FetchState<TimeSeriesData>>,
    weather: ReplayStream<FetchState<WeatherData>>,
}

impl Dashboard {
    pub fn new(
        hydrology: Arc<dyn HydrologyProvider>,
        weather_provider: Arc<dyn WeatherProvider>,
    ) -> Self {
        let selection = SelectionState::new();

        // The states collection has no parent; it loads exactly once, at
        // startup, and replays to every consumer afterwards.
        let states_cache = ReplayCache::new(CollectionResult { items: Vec::new(), loading: true });
        let states = states_cache.subscribe();
        {
            let hydrology = Arc::clone(&hydrology);
            tokio::spawn(async move {
                match hydrology.fetch_states().await {
                    Ok(items) => states_cache.publish(CollectionResult::ready(items)),
                    Err(err) => {
                        warn!(
                            stream = "states",
                            error = %err,
                            detail = err.detail().unwrap_or(""),
                            "states fetch failed"
                        );
                        states_cache.publish(CollectionResult::empty());
                    }
                }
            });
        }

        let counties = {
            let hydrology = Arc::clone(&hydrology);
            spawn_cascade(
                selection.state_stream(),
                selection.county_control_publisher(),
                move |state_code: String| {
                    let hydrology = Arc::clone(&hydrology);
                    async move { hydrology.fetch_counties(&state_code).await }
                },
                "counties",
            )
        };

        let locations = {
            let hydrology = Arc::clone(&hydrology);
            spawn_cascade(
                selection.county_stream(),
                selection.location_control_publisher(),
                move |county: CountySelection| {
                    let hydrology = Arc::clone(&hydrology);
                    async move {
                        hydrology.fetch_locations(&county.state_code, &county.county_code).await
                    }
                },
                "locations",
            )
        };

        let selected_location = spawn_resolver(selection.location_stream(), locations.clone());

        let gage_height = spawn_time_series(
            Arc::clone(&hydrology),
            selection.location_stream(),
            Parameter::GageHeight,
            "gage_height",
        );
        let streamflow = spawn_time_series(
            Arc::clone(&hydrology),
            selection.location_stream(),
            Parameter::Streamflow,
            "streamflow",
        );

        let weather = {
            let provider = Arc::clone(&weather_provider);
            spawn_derived(
                selected_location.clone(),
                move |location: MonitoringLocation| {
                    let provider = Arc::clone(&provider);
                    async move {
                        let weather = provider::weather_for_location(
                            provider.as_ref(),
                            location.latitude,
                            location.longitude,
                        )
                        .await;
                        Ok::<_, ProviderError>(Some(weather))
                    }
                },
                "weather",
            )
        };

        Self {
            selection,
            states,
            counties,
            locations,
            selected_location,
            gage_height,
            streamflow,
            weather,
        }
    }

    // --- Selection operations ----------------------------------------------

    pub fn select_state(&self, state_code: impl Into<String>) {
        self.selection.select_state(state_code);
    }

    pub fn select_county(&self, county_code: impl Into<String>) {
        self.selection.select_county(county_code);
    }

    pub fn select_location(&self, location_id: impl Into<String>) {
        self.selection.select_location(location_id);
    }

    pub fn reset(&self) {
        self.selection.reset();
    }

    pub fn selection(&self) -> Selection {
        self.selection.snapshot()
    }

    // --- Selector control states --------------------------------------------

    pub fn state_control(&self) -> ReplayStream<SelectorControl> {
        self.selection.state_control()
    }

    pub fn county_control(&self) -> ReplayStream<SelectorControl> {
        self.selection.county_control()
    }

    pub fn location_control(&self) -> ReplayStream<SelectorControl> {
        self.selection.location_control()
    }

    // --- Data streams --------------------------------------------------------

    pub fn states(&self) -> ReplayStream<CollectionResult<State>> {
        self.states.clone()
    }

    pub fn counties(&self) -> ReplayStream<CollectionResult<County>> {
        self.counties.clone()
    }

    pub fn locations(&self) -> ReplayStream<CollectionResult<MonitoringLocation>> {
        self.locations.clone()
    }

    pub fn selected_location(&self) -> ReplayStream<Option<MonitoringLocation>> {
        self.selected_location.clone()
    }

    pub fn gage_height(&self) -> ReplayStream<FetchState<TimeSeriesData>> {
        self.gage_height.clone()
    }

    pub fn streamflow(&self) -> ReplayStream<FetchState<TimeSeriesData>> {
        self.streamflow.clone()
    }

    pub fn weather(&self) -> ReplayStream<FetchState<WeatherData>> {
        self.weather.clone()
    }
}

/// Wires one chart series: keyed on the raw location id, windowed to the
/// last [`DAILY_LOOKBACK_DAYS`] days ending today (local time).
fn spawn_time_series(
    hydrology: Arc<dyn HydrologyProvider>,
    location: ReplayStream<Option<String>>,
    parameter: Parameter,
    stream_name: &'static str,
) -> ReplayStream<FetchState<TimeSeriesData>> {
    spawn_derived(
        location,
        move |location_id: String| {
            let hydrology = Arc::clone(&hydrology);
            async move {
                let window = daily_window(Local::now().date_naive());
                let request = TimeSeriesRequest {
                    location_id,
                    parameter,
                    start_date: window.start,
                    end_date: window.end,
                };
                hydrology.fetch_time_series(&request).await.map(Some)
            }
        },
        stream_name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_window_spans_91_inclusive_days() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let window = daily_window(today);

        assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 3, 17).unwrap());
        assert_eq!(window.end, today);
        // 90 days between the endpoints; 91 calendar days inclusive.
        assert_eq!((window.end - window.start).num_days(), 90);
    }

    #[test]
    fn test_daily_window_crosses_year_boundaries() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let window = daily_window(today);
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2023, 10, 17).unwrap());
    }

    #[test]
    fn test_date_window_formats_as_calendar_dates() {
        let window = daily_window(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        assert_eq!(window.start.format("%Y-%m-%d").to_string(), "2024-03-17");
        assert_eq!(window.end.format("%Y-%m-%d").to_string(), "2024-06-15");
    }
}
