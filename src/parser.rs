//! JSON decoders for the surf-forecast and weather provider responses.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::error::Result;
use crate::models::{
    Coordinate, DailyPeriod, ForecastRecord, GridForecast, HourlyPeriod, Spot, WeatherSnapshot,
};

/// Decodes the forecast provider's spot listing.
///
/// # Errors
///
/// Returns [`SurfError::Decode`](crate::error::SurfError::Decode) if the bytes are
/// not a JSON array of spots.
pub fn parse_spots(bytes: &[u8]) -> Result<Vec<Spot>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Decodes one spot's hourly surf forecast.
pub fn parse_spot_forecast(bytes: &[u8]) -> Result<Vec<ForecastRecord>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Decodes the weather provider's point lookup into a [`WeatherSnapshot`].
pub fn parse_weather_point(bytes: &[u8]) -> Result<WeatherSnapshot> {
    let point: PointResponse = serde_json::from_slice(bytes)?;
    Ok(point.into())
}

/// Decodes the weather provider's hourly forecast into its periods.
pub fn parse_hourly_periods(bytes: &[u8]) -> Result<Vec<HourlyPeriod>> {
    let forecast: HourlyResponse = serde_json::from_slice(bytes)?;
    Ok(forecast
        .properties
        .periods
        .into_iter()
        .map(HourlyPeriod::from)
        .collect())
}

/// Decodes the weather provider's 7-day forecast into its half-day periods.
pub fn parse_daily_forecast(bytes: &[u8]) -> Result<Vec<DailyPeriod>> {
    let forecast: DailyResponse = serde_json::from_slice(bytes)?;
    Ok(forecast
        .properties
        .periods
        .into_iter()
        .map(DailyPeriod::from)
        .collect())
}

/// Decodes the weather provider's gridded forecast data.
///
/// # Errors
///
/// Returns [`SurfError::Decode`](crate::error::SurfError::Decode) for malformed
/// JSON, including a `validTime` that is not `<start>/<duration>`.
pub fn parse_grid_data(bytes: &[u8]) -> Result<GridForecast> {
    let grid: GridResponse = serde_json::from_slice(bytes)?;
    Ok(grid.properties)
}

#[derive(Deserialize)]
struct PointResponse {
    #[serde(default)]
    geometry: Option<PointGeometry>,
    properties: PointProperties,
}

#[derive(Deserialize)]
struct PointGeometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointProperties {
    #[serde(default)]
    grid_id: String,
    #[serde(default)]
    grid_x: i64,
    #[serde(default)]
    grid_y: i64,
    #[serde(default)]
    forecast: String,
    #[serde(default)]
    forecast_hourly: String,
    #[serde(default)]
    forecast_grid_data: String,
    #[serde(default)]
    time_zone: String,
    #[serde(default)]
    relative_location: Option<RelativeLocation>,
}

#[derive(Deserialize)]
struct RelativeLocation {
    properties: RelativeLocationProperties,
}

#[derive(Deserialize)]
struct RelativeLocationProperties {
    city: Option<String>,
    state: Option<String>,
}

impl From<PointResponse> for WeatherSnapshot {
    fn from(point: PointResponse) -> Self {
        let props = point.properties;
        let position = point
            .geometry
            .and_then(|g| match g.coordinates.as_slice() {
                [longitude, latitude, ..] => Some(Coordinate {
                    latitude: *latitude,
                    longitude: *longitude,
                }),
                _ => None,
            });
        let (city, state) = props
            .relative_location
            .map(|loc| (loc.properties.city, loc.properties.state))
            .unwrap_or_default();

        WeatherSnapshot {
            grid_id: props.grid_id,
            grid_x: props.grid_x,
            grid_y: props.grid_y,
            forecast_url: props.forecast,
            forecast_hourly_url: props.forecast_hourly,
            forecast_grid_data_url: props.forecast_grid_data,
            time_zone: props.time_zone,
            city,
            state,
            position,
        }
    }
}

#[derive(Deserialize)]
struct HourlyResponse {
    properties: HourlyProperties,
}

#[derive(Deserialize)]
struct HourlyProperties {
    #[serde(default)]
    periods: Vec<WirePeriod>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePeriod {
    #[serde(default)]
    number: u32,
    start_time: DateTime<FixedOffset>,
    end_time: DateTime<FixedOffset>,
    #[serde(default)]
    is_daytime: bool,
    temperature: f64,
    #[serde(default)]
    temperature_unit: String,
    #[serde(default)]
    probability_of_precipitation: Option<QuantValue>,
    #[serde(default)]
    relative_humidity: Option<QuantValue>,
    #[serde(default)]
    wind_speed: String,
    #[serde(default)]
    wind_direction: String,
    #[serde(default)]
    short_forecast: String,
}

#[derive(Deserialize)]
struct QuantValue {
    value: Option<f64>,
}

impl From<WirePeriod> for HourlyPeriod {
    fn from(p: WirePeriod) -> Self {
        HourlyPeriod {
            number: p.number,
            start_time: p.start_time,
            end_time: p.end_time,
            is_daytime: p.is_daytime,
            temperature: p.temperature,
            temperature_unit: p.temperature_unit,
            precipitation_chance: p.probability_of_precipitation.and_then(|q| q.value),
            relative_humidity: p.relative_humidity.and_then(|q| q.value),
            wind_speed: p.wind_speed,
            wind_direction: p.wind_direction,
            short_forecast: p.short_forecast,
        }
    }
}

#[derive(Deserialize)]
struct DailyResponse {
    properties: DailyProperties,
}

#[derive(Deserialize)]
struct DailyProperties {
    #[serde(default)]
    periods: Vec<WireDailyPeriod>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDailyPeriod {
    #[serde(default)]
    number: u32,
    #[serde(default)]
    name: String,
    start_time: DateTime<FixedOffset>,
    end_time: DateTime<FixedOffset>,
    #[serde(default)]
    is_daytime: bool,
    temperature: f64,
    #[serde(default)]
    temperature_unit: String,
    #[serde(default)]
    temperature_trend: Option<String>,
    #[serde(default)]
    probability_of_precipitation: Option<QuantValue>,
    #[serde(default)]
    wind_speed: String,
    #[serde(default)]
    wind_direction: String,
    #[serde(default)]
    short_forecast: String,
    #[serde(default)]
    detailed_forecast: String,
}

impl From<WireDailyPeriod> for DailyPeriod {
    fn from(p: WireDailyPeriod) -> Self {
        DailyPeriod {
            number: p.number,
            name: p.name,
            start_time: p.start_time,
            end_time: p.end_time,
            is_daytime: p.is_daytime,
            temperature: p.temperature,
            temperature_unit: p.temperature_unit,
            temperature_trend: p.temperature_trend,
            precipitation_chance: p.probability_of_precipitation.and_then(|q| q.value),
            wind_speed: p.wind_speed,
            wind_direction: p.wind_direction,
            short_forecast: p.short_forecast,
            detailed_forecast: p.detailed_forecast,
        }
    }
}

#[derive(Deserialize)]
struct GridResponse {
    properties: GridForecast,
}
