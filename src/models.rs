//! Domain records shared by the ingestion layer and the aggregation pipeline.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SurfError};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A surf spot as listed by the forecast provider.
///
/// `coordinates` keeps the provider's GeoJSON order, `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    #[serde(rename = "_id")]
    pub spot_id: i64,
    pub spot_name: String,
    /// Free-text location code (e.g. `"newport-point"`) used for filtering.
    #[serde(rename = "spot_id_char", default)]
    pub location_code: String,
    #[serde(default)]
    pub coordinates: Vec<f64>,
    #[serde(default)]
    pub county_id: Option<i64>,
    #[serde(default)]
    pub street_address: Option<String>,
}

impl Spot {
    /// Returns the spot position, or `None` when the provider sent fewer than two values.
    pub fn position(&self) -> Option<Coordinate> {
        match self.coordinates.as_slice() {
            [longitude, latitude, ..] => Some(Coordinate {
                latitude: *latitude,
                longitude: *longitude,
            }),
            _ => None,
        }
    }
}

/// Calendar breakdown sent alongside each forecast timestamp (24-hour clock).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts {
    #[serde(rename = "yy", default)]
    pub year: i32,
    #[serde(rename = "mm", default)]
    pub month: u32,
    #[serde(rename = "dd", default)]
    pub day: u32,
    #[serde(rename = "hh", default)]
    pub hour: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeComponent {
    #[serde(default)]
    pub influence: i64,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeComponent {
    #[serde(default)]
    pub shape: f64,
    #[serde(default)]
    pub size_meters: f64,
}

/// One hourly surf forecast for a spot.
///
/// Spot name, position and weather are empty as decoded and are filled in by
/// the join stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub spot_id: i64,
    #[serde(rename = "_id", default)]
    pub id: String,
    pub timestamp: i64,
    #[serde(default)]
    pub date_gmt: DateParts,
    #[serde(default)]
    pub date_local: DateParts,
    #[serde(default)]
    pub is_dom: bool,
    /// Wave quality score.
    #[serde(default)]
    pub shape: f64,
    #[serde(default)]
    pub shape_list: Vec<ShapeComponent>,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub size_ft: f64,
    #[serde(default)]
    pub size_list: Vec<SizeComponent>,
    #[serde(default)]
    pub warnings: Vec<String>,

    #[serde(default)]
    pub spot_name: Option<String>,
    #[serde(default)]
    pub position: Option<Coordinate>,
    #[serde(default)]
    pub weather: Option<WeatherSnapshot>,
    #[serde(default)]
    pub periods: Vec<HourlyPeriod>,
    #[serde(default)]
    pub swell: Option<SwellReading>,
}

impl ForecastRecord {
    /// `floor(timestamp / 3600)`.
    pub fn hour_bucket(&self) -> i64 {
        self.timestamp.div_euclid(3600)
    }

    /// The weather period used for wind and temperature, if any matched.
    pub fn first_period(&self) -> Option<&HourlyPeriod> {
        self.periods.first()
    }
}

/// The weather provider's grid association for a spot position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub grid_id: String,
    pub grid_x: i64,
    pub grid_y: i64,
    pub forecast_url: String,
    pub forecast_hourly_url: String,
    pub forecast_grid_data_url: String,
    pub time_zone: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub position: Option<Coordinate>,
}

impl WeatherSnapshot {
    /// A snapshot without an hourly link cannot be joined with periods.
    pub fn has_hourly_link(&self) -> bool {
        !self.forecast_hourly_url.trim().is_empty()
    }
}

/// One half-day period of the weather provider's 7-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPeriod {
    pub number: u32,
    /// Provider label such as `"Tonight"` or `"Saturday"`.
    pub name: String,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub is_daytime: bool,
    pub temperature: f64,
    pub temperature_unit: String,
    pub temperature_trend: Option<String>,
    pub precipitation_chance: Option<f64>,
    pub wind_speed: String,
    pub wind_direction: String,
    pub short_forecast: String,
    pub detailed_forecast: String,
}

/// Validity window of a gridded value, written `<start>/<duration>`,
/// e.g. `"2025-12-27T15:00:00+00:00/PT1H"`.
///
/// Durations accept weeks, days, hours, minutes and seconds
/// (`P1W`, `P1DT6H`, `PT30M`). Years and months have no fixed length and
/// are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeInterval {
    pub start: DateTime<FixedOffset>,
    /// The duration exactly as sent.
    pub duration: String,
    span: TimeDelta,
}

impl TimeInterval {
    pub fn span(&self) -> TimeDelta {
        self.span
    }

    /// Whether `timestamp` (UNIX seconds) falls in `[start, start + span)`.
    pub fn contains(&self, timestamp: i64) -> bool {
        let start = self.start.timestamp();
        timestamp >= start && timestamp - start < self.span.num_seconds()
    }
}

impl FromStr for TimeInterval {
    type Err = SurfError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SurfError::InvalidInterval(s.to_string());

        let (start, duration) = s.trim().split_once('/').ok_or_else(invalid)?;
        let start = DateTime::parse_from_rfc3339(start).map_err(|_| invalid())?;
        let span = parse_duration_secs(duration)
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(invalid)?;

        Ok(TimeInterval {
            start,
            duration: duration.to_string(),
            span,
        })
    }
}

impl TryFrom<String> for TimeInterval {
    type Error = SurfError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TimeInterval> for String {
    fn from(interval: TimeInterval) -> Self {
        format!("{}/{}", interval.start.to_rfc3339(), interval.duration)
    }
}

/// Seconds in an ISO-8601 duration of fixed-length units. `None` when empty,
/// malformed, or using years/months.
fn parse_duration_secs(duration: &str) -> Option<i64> {
    let rest = duration.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((_, "")) => return None,
        Some((date, time)) => (date, time),
        None => (rest, ""),
    };

    let days = sum_components(date_part, &[('W', 7 * 86_400), ('D', 86_400)])?;
    let time = sum_components(time_part, &[('H', 3600), ('M', 60), ('S', 1)])?;

    match (days, time) {
        (None, None) => None,
        (days, time) => days.unwrap_or(0).checked_add(time.unwrap_or(0)),
    }
}

/// Sums `<digits><unit>` components. `Some(None)` for an empty part.
fn sum_components(part: &str, units: &[(char, i64)]) -> Option<Option<i64>> {
    let mut total: Option<i64> = None;
    let mut digits = String::new();

    for c in part.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let (_, unit_secs) = units.iter().find(|(unit, _)| *unit == c)?;
        let value: i64 = digits.parse().ok()?;
        let secs = value.checked_mul(*unit_secs)?;
        total = Some(total.unwrap_or(0).checked_add(secs)?);
        digits.clear();
    }

    if !digits.is_empty() {
        return None;
    }
    Some(total)
}

/// One timed value of a gridded forecast parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridValue {
    pub valid_time: TimeInterval,
    pub value: Option<f64>,
}

/// A gridded forecast parameter: a unit and its timed values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridParameter {
    /// Unit code such as `"wmoUnit:m"` or `"wmoUnit:degC"`.
    #[serde(default)]
    pub uom: Option<String>,
    #[serde(default)]
    pub values: Vec<GridValue>,
}

impl GridParameter {
    /// The first finite value whose window contains `timestamp`.
    pub fn value_at(&self, timestamp: i64) -> Option<f64> {
        self.values
            .iter()
            .find(|v| v.valid_time.contains(timestamp))
            .and_then(|v| v.value)
            .filter(|value| value.is_finite())
    }

    /// Like [`value_at`](Self::value_at), converted to feet when the unit is metres.
    pub fn feet_at(&self, timestamp: i64) -> Option<f64> {
        let value = self.value_at(timestamp)?;
        match self.uom.as_deref() {
            Some("wmoUnit:m") => Some(value * FEET_PER_METRE),
            _ => Some(value),
        }
    }
}

pub const FEET_PER_METRE: f64 = 3.28084;

/// The weather provider's gridded forecast for one grid cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridForecast {
    pub grid_id: String,
    pub grid_x: i64,
    pub grid_y: i64,
    pub update_time: String,

    pub temperature: GridParameter,
    pub dewpoint: GridParameter,
    pub relative_humidity: GridParameter,
    pub sky_cover: GridParameter,
    pub wind_direction: GridParameter,
    pub wind_speed: GridParameter,
    pub wind_gust: GridParameter,
    pub probability_of_precipitation: GridParameter,
    pub pressure: GridParameter,

    pub wave_height: GridParameter,
    pub wave_period: GridParameter,
    pub wave_direction: GridParameter,
    pub primary_swell_height: GridParameter,
    pub primary_swell_direction: GridParameter,
    pub secondary_swell_height: GridParameter,
    pub secondary_swell_direction: GridParameter,
    pub wind_wave_height: GridParameter,
}

/// Swell conditions from the gridded forecast for one forecast hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwellReading {
    pub height_ft: Option<f64>,
    pub period_secs: Option<f64>,
    pub direction_degrees: Option<f64>,
}

/// One hour of the weather provider's hourly forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPeriod {
    pub number: u32,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub is_daytime: bool,
    pub temperature: f64,
    pub temperature_unit: String,
    pub precipitation_chance: Option<f64>,
    pub relative_humidity: Option<f64>,
    /// Free text such as `"5 mph"` or `"5 to 10 mph"`.
    pub wind_speed: String,
    /// Compass label, 8 or 16 point (`"NW"`, `"WNW"`).
    pub wind_direction: String,
    pub short_forecast: String,
}

impl HourlyPeriod {
    /// `floor(start_time / 3600)` in UNIX seconds.
    pub fn hour_bucket(&self) -> i64 {
        self.start_time.timestamp().div_euclid(3600)
    }

    /// Numeric value of the leading token of the wind-speed text.
    ///
    /// `"5 to 10 mph"` yields `5.0`, `"12mph"` yields `12.0`.
    pub fn wind_speed_value(&self) -> Result<f64> {
        let invalid = || SurfError::WindSpeed {
            raw: self.wind_speed.clone(),
        };

        let token = self.wind_speed.split_whitespace().next().ok_or_else(invalid)?;
        // `parse` also accepts "NaN" and "inf".
        if let Ok(value) = token.parse::<f64>() {
            return if value.is_finite() { Ok(value) } else { Err(invalid()) };
        }

        let numeric_len = token
            .char_indices()
            .take_while(|(_, c)| c.is_ascii_digit() || *c == '.')
            .map(|(i, c)| i + c.len_utf8())
            .last()
            .unwrap_or(0);

        token[..numeric_len]
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(invalid)
    }
}

/// The 8 canonical compass bearings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassBearing {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassBearing {
    /// Table order is the tie-break order for nearest-bearing resolution.
    pub const TABLE: [(CompassBearing, f64); 8] = [
        (CompassBearing::N, 0.0),
        (CompassBearing::NE, 45.0),
        (CompassBearing::E, 90.0),
        (CompassBearing::SE, 135.0),
        (CompassBearing::S, 180.0),
        (CompassBearing::SW, 225.0),
        (CompassBearing::W, 270.0),
        (CompassBearing::NW, 315.0),
    ];

    pub fn degrees(self) -> f64 {
        Self::TABLE
            .iter()
            .find(|(bearing, _)| *bearing == self)
            .map(|(_, degrees)| *degrees)
            .unwrap_or(0.0)
    }

    pub fn label(self) -> &'static str {
        match self {
            CompassBearing::N => "N",
            CompassBearing::NE => "NE",
            CompassBearing::E => "E",
            CompassBearing::SE => "SE",
            CompassBearing::S => "S",
            CompassBearing::SW => "SW",
            CompassBearing::W => "W",
            CompassBearing::NW => "NW",
        }
    }

    /// Case-insensitive lookup of an 8-point label.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::TABLE
            .iter()
            .map(|(bearing, _)| *bearing)
            .find(|bearing| bearing.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for CompassBearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One hour of wind that went into a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindReading {
    pub time: DateTime<FixedOffset>,
    pub direction: String,
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindSummary {
    pub direction: CompassBearing,
    pub mean_degrees: f64,
    /// `None` when no wind-speed text in the group could be parsed.
    pub speed: Option<f64>,
    pub readings: Vec<WindReading>,
}

/// Aggregate conditions for one spot over one bucket of hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotSummary {
    pub spot_id: i64,
    pub spot_name: String,
    pub avg_wave_height: f64,
    pub quality: f64,
    pub wind: WindSummary,
    pub air_temp: f64,
    /// Average gridded swell height in feet, `None` without grid data.
    pub swell_height: Option<f64>,
    /// Average gridded wave period in seconds, `None` without grid data.
    pub swell_period: Option<f64>,
    /// Records that carried weather data for wind and temperature.
    pub samples: usize,
}

/// Morning and afternoon summaries for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub am: Vec<SpotSummary>,
    pub pm: Vec<SpotSummary>,
}
