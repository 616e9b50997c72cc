/// Test fixtures: representative JSON payloads from the USGS Water Data
/// and National Weather Service APIs.
///
/// These fixtures are structurally complete but truncated to the minimum
/// needed to exercise the parsers.
///
/// USGS OGC API response shape (all four collections):
///   response.features[]
///     .id           — feature identifier (monitoring location id)
///     .properties   — per-collection attribute object
///     .geometry.coordinates — [longitude, latitude]
///   response.numberReturned — rows in this page
///
/// NWS response shapes:
///   /points: properties.relativeLocation.properties.{city,state}
///            properties.{gridId,gridX,gridY}
///   /gridpoints .../forecast: properties.periods[] — current period first

/// Three states, deliberately NOT in alphabetical order. The parser is
/// responsible for sorting by name.
#[cfg(test)]
pub(crate) fn fixture_states_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "features": [
        {
          "id": "55",
          "properties": { "state_fips_code": "55", "state_name": "Wisconsin" }
        },
        {
          "id": "06",
          "properties": { "state_fips_code": "06", "state_name": "California" }
        },
        {
          "id": "17",
          "properties": { "state_fips_code": "17", "state_name": "Illinois" }
        }
      ],
      "numberReturned": 3
    }"#
}

/// Three California counties, shuffled so the alphabetical sort is
/// observable.
#[cfg(test)]
pub(crate) fn fixture_counties_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "features": [
        {
          "id": "06113",
          "properties": { "county_fips_code": "113", "county_name": "Yolo County", "state_fips_code": "06" }
        },
        {
          "id": "06001",
          "properties": { "county_fips_code": "001", "county_name": "Alameda County", "state_fips_code": "06" }
        },
        {
          "id": "06055",
          "properties": { "county_fips_code": "055", "county_name": "Napa County", "state_fips_code": "06" }
        }
      ],
      "numberReturned": 3
    }"#
}

/// Two monitoring locations: one fully populated, one degenerate (no id,
/// no geometry, no site type) to exercise the fallback paths.
#[cfg(test)]
pub(crate) fn fixture_locations_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "features": [
        {
          "id": "USGS-05568500",
          "properties": {
            "monitoring_location_name": "Illinois River at Kingston Mines, IL",
            "site_type": "Stream",
            "county_name": "Peoria County"
          },
          "geometry": { "type": "Point", "coordinates": [-89.9956, 40.5614] }
        },
        {
          "properties": {
            "monitoring_location_name": "Unnamed Tributary Site",
            "county_name": "Peoria County"
          }
        }
      ],
      "numberReturned": 2
    }"#
}

/// Four daily gage-height observations, out of chronological order, one of
/// them with a null value (observation exists, measurement missing).
#[cfg(test)]
pub(crate) fn fixture_daily_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "features": [
        {
          "id": "obs-3",
          "properties": { "time": "2024-06-14", "value": 18.42 }
        },
        {
          "id": "obs-1",
          "properties": { "time": "2024-06-12", "value": 17.95 }
        },
        {
          "id": "obs-0",
          "properties": { "time": "2024-06-11", "value": null }
        },
        {
          "id": "obs-2",
          "properties": { "time": "2024-06-13", "value": 18.10 }
        }
      ],
      "numberReturned": 4
    }"#
}

/// A successful response with zero rows, as returned for a location that
/// records the other parameter only. Must yield has_data = false.
#[cfg(test)]
pub(crate) fn fixture_daily_empty_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "features": [],
      "numberReturned": 0
    }"#
}

/// Nonzero numberReturned but every value null — still has_data = false.
#[cfg(test)]
pub(crate) fn fixture_daily_all_null_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "features": [
        {
          "id": "obs-0",
          "properties": { "time": "2024-06-11", "value": null }
        },
        {
          "id": "obs-1",
          "properties": { "time": "2024-06-12", "value": null }
        }
      ],
      "numberReturned": 2
    }"#
}

/// Point-metadata response for coordinates near Peoria, IL.
#[cfg(test)]
pub(crate) fn fixture_weather_point_json() -> &'static str {
    r#"{
      "properties": {
        "gridId": "ILX",
        "gridX": 42,
        "gridY": 73,
        "relativeLocation": {
          "properties": {
            "city": "Peoria",
            "state": "IL"
          }
        }
      }
    }"#
}

/// Two forecast periods. The second has a null precipitation probability,
/// which the parser must turn into 0.
#[cfg(test)]
pub(crate) fn fixture_weather_forecast_json() -> &'static str {
    r#"{
      "properties": {
        "periods": [
          {
            "number": 1,
            "name": "This Afternoon",
            "temperature": 68,
            "temperatureUnit": "F",
            "windSpeed": "10 mph",
            "windDirection": "SW",
            "icon": "https://api.weather.gov/icons/land/day/few?size=medium",
            "shortForecast": "Mostly Sunny",
            "detailedForecast": "Mostly sunny, with a high near 68.",
            "probabilityOfPrecipitation": { "value": 20 }
          },
          {
            "number": 2,
            "name": "Tonight",
            "temperature": 47,
            "temperatureUnit": "F",
            "windSpeed": "5 mph",
            "windDirection": "S",
            "icon": "https://api.weather.gov/icons/land/night/few?size=medium",
            "shortForecast": "Mostly Clear",
            "detailedForecast": "Mostly clear, with a low around 47.",
            "probabilityOfPrecipitation": { "value": null }
          }
        ]
      }
    }"#
}
