use std::collections::HashMap;
use tracing::{debug, warn};

use crate::models::{ForecastRecord, SpotSummary, WindReading, WindSummary};
use crate::processing::bearing::mean_bearing;
use crate::processing::utility::{mean, round_to_tenth};

/// Reduces records to one [`SpotSummary`] per spot, in first-seen spot order.
///
/// Wave height, quality and gridded swell average over every record of a
/// spot that carries them. Wind and air
/// temperature come from the first hourly period of each record that has one;
/// a spot with no such record is left out. Wind-speed text that cannot be
/// parsed is logged and skipped. Averages are rounded to one decimal.
pub fn summarize(records: &[ForecastRecord]) -> Vec<SpotSummary> {
    let mut spot_order: Vec<i64> = Vec::new();
    let mut groups: HashMap<i64, Vec<&ForecastRecord>> = HashMap::new();

    for record in records {
        let group = groups.entry(record.spot_id).or_insert_with(|| {
            spot_order.push(record.spot_id);
            Vec::new()
        });
        group.push(record);
    }

    spot_order
        .into_iter()
        .filter_map(|spot_id| summarize_spot(spot_id, &groups[&spot_id]))
        .collect()
}

fn summarize_spot(spot_id: i64, group: &[&ForecastRecord]) -> Option<SpotSummary> {
    let wave_heights: Vec<f64> = group.iter().map(|r| r.size_ft).collect();
    let qualities: Vec<f64> = group.iter().map(|r| r.shape).collect();
    let swell_heights: Vec<f64> = group
        .iter()
        .filter_map(|r| r.swell.and_then(|s| s.height_ft))
        .collect();
    let swell_periods: Vec<f64> = group
        .iter()
        .filter_map(|r| r.swell.and_then(|s| s.period_secs))
        .collect();

    let mut speeds = Vec::new();
    let mut directions = Vec::new();
    let mut temperatures = Vec::new();
    let mut readings = Vec::new();

    for period in group.iter().filter_map(|r| r.first_period()) {
        let speed = match period.wind_speed_value() {
            Ok(speed) => {
                speeds.push(speed);
                Some(speed)
            }
            Err(e) => {
                warn!(spot_id, error = %e, "Skipping wind speed contribution");
                None
            }
        };

        directions.push(period.wind_direction.as_str());
        temperatures.push(period.temperature);
        readings.push(WindReading {
            time: period.start_time,
            direction: period.wind_direction.clone(),
            speed,
        });
    }

    // No weather basis: averaging would divide by zero.
    let Some(air_temp) = mean(&temperatures) else {
        debug!(
            spot_id,
            records = group.len(),
            "No record with weather data, spot omitted from summary"
        );
        return None;
    };

    let spot_name = group
        .iter()
        .find_map(|r| r.spot_name.clone())
        .unwrap_or_default();

    let direction = mean_bearing(&directions);

    Some(SpotSummary {
        spot_id,
        spot_name,
        avg_wave_height: round_to_tenth(mean(&wave_heights)?),
        quality: round_to_tenth(mean(&qualities)?),
        wind: WindSummary {
            direction: direction.bearing,
            mean_degrees: direction.degrees,
            speed: mean(&speeds).map(round_to_tenth),
            readings,
        },
        air_temp: round_to_tenth(air_temp),
        swell_height: mean(&swell_heights).map(round_to_tenth),
        swell_period: mean(&swell_periods).map(round_to_tenth),
        samples: temperatures.len(),
    })
}
