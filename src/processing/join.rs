//! Joins forecast records with spot metadata and weather data.
//!
//! Each function consumes a record and returns the joined copy. A failed join
//! is logged and leaves the record's weather fields empty.

use tracing::{debug, warn};

use crate::error::SurfError;
use crate::models::{
    ForecastRecord, GridForecast, HourlyPeriod, Spot, SwellReading, WeatherSnapshot,
};

/// Copies spot name and position onto every record with a matching spot id.
pub fn attach_spot(records: Vec<ForecastRecord>, spots: &[Spot]) -> Vec<ForecastRecord> {
    records
        .into_iter()
        .map(|mut record| {
            match spots.iter().find(|spot| spot.spot_id == record.spot_id) {
                Some(spot) => {
                    record.spot_name = Some(spot.spot_name.clone());
                    record.position = spot.position();
                }
                None => debug!(spot_id = record.spot_id, "No spot metadata for record"),
            }
            record
        })
        .collect()
}

/// Embeds a copy of `weather` in the record.
///
/// Skipped when the record has no position or the snapshot has no grid
/// identity or hourly link.
pub fn attach_weather(mut record: ForecastRecord, weather: &WeatherSnapshot) -> ForecastRecord {
    let reason = if record.position.is_none() {
        Some("record has no coordinates")
    } else if weather.grid_id.trim().is_empty() {
        Some("snapshot has no grid id")
    } else if !weather.has_hourly_link() {
        Some("snapshot has no hourly forecast link")
    } else {
        None
    };

    match reason {
        Some(reason) => {
            let gap = SurfError::JoinGap {
                spot_id: record.spot_id,
                reason: reason.to_string(),
            };
            warn!(error = %gap, timestamp = record.timestamp, "Weather join skipped");
            record.weather = None;
        }
        None => record.weather = Some(weather.clone()),
    }

    record
}

/// Appends every candidate period that starts in the same hour as the record.
///
/// Existing periods are kept; matches are added, never overwritten.
pub fn attach_hourly_periods(
    mut record: ForecastRecord,
    candidates: &[HourlyPeriod],
) -> ForecastRecord {
    let bucket = record.hour_bucket();
    let matched: Vec<HourlyPeriod> = candidates
        .iter()
        .filter(|period| period.hour_bucket() == bucket)
        .cloned()
        .collect();

    if matched.is_empty() {
        debug!(
            spot_id = record.spot_id,
            timestamp = record.timestamp,
            candidates = candidates.len(),
            "No hourly period in record hour"
        );
    }

    record.periods.extend(matched);
    record
}

/// Sets the record's swell from the grid values valid at its timestamp.
///
/// Height prefers the primary swell and falls back to the combined wave
/// height. A record no grid window covers keeps `swell` unset.
pub fn attach_grid(mut record: ForecastRecord, grid: &GridForecast) -> ForecastRecord {
    let at = record.timestamp;
    let reading = SwellReading {
        height_ft: grid
            .primary_swell_height
            .feet_at(at)
            .or_else(|| grid.wave_height.feet_at(at)),
        period_secs: grid.wave_period.value_at(at),
        direction_degrees: grid.primary_swell_direction.value_at(at),
    };

    if reading.height_ft.is_none() && reading.period_secs.is_none() {
        debug!(spot_id = record.spot_id, timestamp = at, "No grid swell for record hour");
        return record;
    }

    record.swell = Some(reading);
    record
}
