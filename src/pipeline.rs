//! Wires the providers to the processing stages.
//!
//! [`collect_inputs`] is the only part that talks to the network; everything
//! after it is a pure function of the collected [`SpotInputs`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::slice;
use tracing::{debug, info, warn};

use crate::error::SurfError;
use crate::models::{
    DailyPeriod, DailyReport, ForecastRecord, GridForecast, HourlyPeriod, Spot, WeatherSnapshot,
};
use crate::processing::{
    ZonePolicy, attach_grid, attach_hourly_periods, attach_spot, attach_weather, filter_spots,
    select_today, split_am_pm, summarize,
};
use crate::services::{SurfForecastApi, WeatherApi};

/// Everything fetched for one spot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotInputs {
    pub spot: Spot,
    pub forecast: Vec<ForecastRecord>,
    pub weather: Option<WeatherSnapshot>,
    #[serde(default)]
    pub periods: Vec<HourlyPeriod>,
    #[serde(default)]
    pub grid: Option<GridForecast>,
}

/// Today's joined records, split into morning and afternoon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBuckets {
    pub date: NaiveDate,
    pub am: Vec<ForecastRecord>,
    pub pm: Vec<ForecastRecord>,
}

impl DayBuckets {
    pub fn summarize(&self) -> DailyReport {
        DailyReport {
            date: self.date,
            am: summarize(&self.am),
            pm: summarize(&self.pm),
        }
    }
}

/// Fetches spots matching `keyword` and everything needed to summarize them.
#[tracing::instrument(skip(forecast_api, weather_api))]
pub async fn fetch_inputs<F, W>(
    forecast_api: &F,
    weather_api: &W,
    keyword: &str,
    date: NaiveDate,
) -> anyhow::Result<Vec<SpotInputs>>
where
    F: SurfForecastApi + ?Sized,
    W: WeatherApi + ?Sized,
{
    let spots = forecast_api.list_spots().await?;
    let matched = filter_spots(&spots, keyword);
    info!(
        total = spots.len(),
        matched = matched.len(),
        "Spots filtered by location"
    );

    Ok(collect_inputs(forecast_api, weather_api, &matched, date).await)
}

/// Fetches forecast and weather data for each spot in turn.
///
/// A spot whose forecast cannot be fetched is skipped. A spot whose weather
/// cannot be fetched keeps its forecast with no weather attached, and a
/// missing grid only leaves the swell fields empty.
pub async fn collect_inputs<F, W>(
    forecast_api: &F,
    weather_api: &W,
    spots: &[Spot],
    date: NaiveDate,
) -> Vec<SpotInputs>
where
    F: SurfForecastApi + ?Sized,
    W: WeatherApi + ?Sized,
{
    let mut inputs = Vec::with_capacity(spots.len());

    for spot in spots {
        let forecast = match forecast_api.spot_forecast(spot.spot_id, date).await {
            Ok(forecast) => forecast,
            Err(e) => {
                warn!(spot_id = spot.spot_id, error = %e, "Forecast fetch failed, spot skipped");
                continue;
            }
        };

        let mut input = SpotInputs {
            spot: spot.clone(),
            forecast,
            weather: None,
            periods: Vec::new(),
            grid: None,
        };
        fetch_weather(weather_api, &mut input).await;
        inputs.push(input);
    }

    inputs
}

async fn fetch_weather<W: WeatherApi + ?Sized>(weather_api: &W, input: &mut SpotInputs) {
    let spot_id = input.spot.spot_id;
    let Some(position) = input.spot.position() else {
        warn!(spot_id, "Spot has no coordinates, weather not fetched");
        return;
    };

    let snapshot = match weather_api.weather_point(position).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(spot_id, error = %e, "Weather point fetch failed");
            return;
        }
    };

    match weather_api.hourly_periods(&snapshot).await {
        Ok(periods) => input.periods = periods,
        Err(e) => warn!(spot_id, error = %e, "Hourly weather fetch failed"),
    }

    match weather_api.grid_forecast(&snapshot).await {
        Ok(grid) => input.grid = Some(grid),
        Err(e) => warn!(spot_id, error = %e, "Grid data fetch failed, swell left empty"),
    }

    input.weather = Some(snapshot);
}

/// A spot's 7-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotOutlook {
    pub spot: Spot,
    pub periods: Vec<DailyPeriod>,
}

/// Fetches the 7-day forecast for each spot matching `keyword`.
///
/// Spots without coordinates or whose lookups fail are logged and left out.
#[tracing::instrument(skip(forecast_api, weather_api))]
pub async fn fetch_outlook<F, W>(
    forecast_api: &F,
    weather_api: &W,
    keyword: &str,
) -> anyhow::Result<Vec<SpotOutlook>>
where
    F: SurfForecastApi + ?Sized,
    W: WeatherApi + ?Sized,
{
    let spots = forecast_api.list_spots().await?;
    let matched = filter_spots(&spots, keyword);
    let mut outlooks = Vec::with_capacity(matched.len());

    for spot in matched {
        let Some(position) = spot.position() else {
            warn!(spot_id = spot.spot_id, "Spot has no coordinates, outlook skipped");
            continue;
        };

        let periods = match weather_api.weather_point(position).await {
            Ok(snapshot) => weather_api.daily_forecast(&snapshot).await,
            Err(e) => Err(e),
        };

        match periods {
            Ok(periods) => outlooks.push(SpotOutlook { spot, periods }),
            Err(e) => warn!(spot_id = spot.spot_id, error = %e, "Outlook fetch failed"),
        }
    }

    Ok(outlooks)
}

/// Joins each spot's forecast with its metadata, weather snapshot,
/// hour-matched periods and gridded swell.
pub fn join_inputs(inputs: &[SpotInputs]) -> Vec<ForecastRecord> {
    inputs
        .iter()
        .flat_map(|input| {
            attach_spot(input.forecast.clone(), slice::from_ref(&input.spot))
                .into_iter()
                .map(move |record| join_record(record, input))
        })
        .collect()
}

fn join_record(record: ForecastRecord, input: &SpotInputs) -> ForecastRecord {
    let record = match &input.grid {
        Some(grid) => attach_grid(record, grid),
        None => record,
    };

    let Some(weather) = &input.weather else {
        let gap = SurfError::JoinGap {
            spot_id: record.spot_id,
            reason: "no weather snapshot".to_string(),
        };
        debug!(error = %gap, timestamp = record.timestamp, "Record left without weather");
        return record;
    };

    let record = attach_weather(record, weather);
    if record.weather.is_some() {
        attach_hourly_periods(record, &input.periods)
    } else {
        record
    }
}

/// Joins, keeps `today`'s records that have weather periods, and splits them
/// into AM/PM buckets.
pub fn build_buckets(inputs: &[SpotInputs], today: NaiveDate, zone: ZonePolicy) -> DayBuckets {
    let joined = join_inputs(inputs);
    let joined_count = joined.len();

    let todays = select_today(joined, today, zone);
    let todays_count = todays.len();

    let with_weather: Vec<ForecastRecord> = todays
        .into_iter()
        .filter(|record| !record.periods.is_empty())
        .collect();

    info!(
        joined = joined_count,
        today = todays_count,
        with_weather = with_weather.len(),
        date = %today,
        zone = %zone,
        "Records prepared"
    );

    let (am, pm) = split_am_pm(with_weather);

    DayBuckets {
        date: today,
        am,
        pm,
    }
}

/// Builds the AM and PM summaries for `today`.
pub fn build_report(inputs: &[SpotInputs], today: NaiveDate, zone: ZonePolicy) -> DailyReport {
    build_buckets(inputs, today, zone).summarize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompassBearing, Coordinate, DateParts, GridParameter, GridValue};
    use anyhow::{Result, anyhow};
    use chrono::{DateTime, Duration};

    // 2025-12-27T00:00:00-08:00
    const LOCAL_MIDNIGHT: i64 = 1_766_822_400;

    #[test]
    fn test_build_report_splits_and_summarizes() {
        let inputs = vec![create_inputs(1, &[6, 7, 13, 14], true)];

        let report = build_report(&inputs, today(), zone());

        assert_eq!(report.date, today());
        assert_eq!(report.am.len(), 1);
        assert_eq!(report.pm.len(), 1);
        assert_eq!(report.am[0].samples, 2);
        assert_eq!(report.am[0].spot_name, "Spot 1");
        assert_eq!(report.am[0].wind.direction, CompassBearing::W);
    }

    #[test]
    fn test_build_report_drops_other_days() {
        let mut input = create_inputs(1, &[8], true);
        let mut yesterday = input.forecast[0].clone();
        yesterday.timestamp -= 24 * 3600;
        input.forecast.push(yesterday);

        let buckets = build_buckets(&[input], today(), zone());

        assert_eq!(buckets.am.len(), 1);
        assert!(buckets.pm.is_empty());
    }

    #[test]
    fn test_build_report_omits_spot_without_weather() {
        let inputs = vec![create_inputs(1, &[8], false), create_inputs(2, &[8], true)];

        let report = build_report(&inputs, today(), zone());

        assert_eq!(report.am.len(), 1);
        assert_eq!(report.am[0].spot_id, 2);
    }

    #[test]
    fn test_join_inputs_without_snapshot_keeps_records() {
        let inputs = vec![create_inputs(1, &[8, 9], false)];

        let joined = join_inputs(&inputs);

        assert_eq!(joined.len(), 2);
        assert!(joined.iter().all(|r| r.weather.is_none() && r.periods.is_empty()));
        assert!(joined.iter().all(|r| r.spot_name.as_deref() == Some("Spot 1")));
    }

    #[test]
    fn test_build_report_is_repeatable() {
        let inputs = vec![create_inputs(1, &[6, 13], true), create_inputs(2, &[9, 15], true)];

        assert_eq!(
            build_report(&inputs, today(), zone()),
            build_report(&inputs, today(), zone())
        );
    }

    #[tokio::test]
    async fn test_collect_inputs_degrades_on_failures() {
        let spots = vec![
            create_spot(1),
            create_spot(2),
            Spot {
                coordinates: vec![],
                ..create_spot(3)
            },
        ];
        let forecast_api = FakeForecast { failing_spot: 2 };
        let weather_api = FakeWeather { failing: true };

        let inputs = collect_inputs(&forecast_api, &weather_api, &spots, today()).await;

        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].spot.spot_id, 1);
        assert!(inputs[0].weather.is_some());
        assert!(inputs[0].periods.is_empty());
        assert!(inputs[0].grid.is_none());
        assert_eq!(inputs[1].spot.spot_id, 3);
        assert!(inputs[1].weather.is_none());
    }

    #[tokio::test]
    async fn test_fetch_inputs_filters_spots() {
        let forecast_api = FakeForecast { failing_spot: -1 };
        let weather_api = FakeWeather { failing: false };

        let inputs = fetch_inputs(&forecast_api, &weather_api, "SPOT-2", today())
            .await
            .unwrap();

        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].spot.spot_id, 2);
        assert_eq!(inputs[0].periods.len(), 24);

        assert!(inputs[0].grid.is_some());

        let report = build_report(&inputs, today(), zone());
        assert_eq!(report.am.len(), 1);
        assert_eq!(report.pm.len(), 1);
        // 1.5 m
        assert_eq!(report.am[0].swell_height, Some(4.9));
        assert_eq!(report.pm[0].swell_period, Some(15.0));
    }

    #[test]
    fn test_join_inputs_attaches_grid_without_weather() {
        let mut input = create_inputs(1, &[8], false);
        input.grid = Some(create_grid());

        let joined = join_inputs(&[input]);

        assert!(joined[0].weather.is_none());
        assert_eq!(joined[0].swell.and_then(|s| s.period_secs), Some(15.0));
    }

    #[tokio::test]
    async fn test_fetch_outlook_filters_spots() {
        let forecast_api = FakeForecast { failing_spot: -1 };
        let weather_api = FakeWeather { failing: false };

        let outlooks = fetch_outlook(&forecast_api, &weather_api, "spot-3")
            .await
            .unwrap();

        assert_eq!(outlooks.len(), 1);
        assert_eq!(outlooks[0].spot.spot_id, 3);
        assert_eq!(outlooks[0].periods.len(), 2);
        assert_eq!(outlooks[0].periods[1].name, "Tonight");
    }

    #[tokio::test]
    async fn test_fetch_outlook_skips_failed_spots() {
        let forecast_api = FakeForecast { failing_spot: -1 };
        let weather_api = FakeWeather { failing: true };

        let outlooks = fetch_outlook(&forecast_api, &weather_api, "spot")
            .await
            .unwrap();

        assert!(outlooks.is_empty());
    }

    // Helper functions for tests
    struct FakeForecast {
        failing_spot: i64,
    }

    #[async_trait::async_trait]
    impl SurfForecastApi for FakeForecast {
        async fn list_spots(&self) -> Result<Vec<Spot>> {
            Ok((1..=3).map(create_spot).collect())
        }

        async fn spot_forecast(&self, spot_id: i64, _date: NaiveDate) -> Result<Vec<ForecastRecord>> {
            if spot_id == self.failing_spot {
                return Err(anyhow!("forecast unavailable"));
            }
            Ok(create_forecast(spot_id, &[6, 13]))
        }
    }

    /// `failing` makes every lookup after the point lookup fail.
    struct FakeWeather {
        failing: bool,
    }

    #[async_trait::async_trait]
    impl WeatherApi for FakeWeather {
        async fn weather_point(&self, position: Coordinate) -> Result<WeatherSnapshot> {
            Ok(create_snapshot(position))
        }

        async fn hourly_periods(&self, _snapshot: &WeatherSnapshot) -> Result<Vec<HourlyPeriod>> {
            if self.failing {
                return Err(anyhow!("hourly unavailable"));
            }
            Ok((0..24).map(create_period).collect())
        }

        async fn daily_forecast(&self, _snapshot: &WeatherSnapshot) -> Result<Vec<DailyPeriod>> {
            if self.failing {
                return Err(anyhow!("forecast unavailable"));
            }
            Ok(vec![
                create_daily_period("This Afternoon", 12),
                create_daily_period("Tonight", 18),
            ])
        }

        async fn grid_forecast(&self, _snapshot: &WeatherSnapshot) -> Result<GridForecast> {
            if self.failing {
                return Err(anyhow!("grid unavailable"));
            }
            Ok(create_grid())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 27).unwrap()
    }

    fn zone() -> ZonePolicy {
        "-08:00".parse().unwrap()
    }

    fn create_spot(spot_id: i64) -> Spot {
        Spot {
            spot_id,
            spot_name: format!("Spot {spot_id}"),
            location_code: format!("spot-{spot_id}"),
            coordinates: vec![-117.93, 33.607],
            county_id: None,
            street_address: None,
        }
    }

    fn create_snapshot(position: Coordinate) -> WeatherSnapshot {
        WeatherSnapshot {
            grid_id: "SGX".to_string(),
            grid_x: 46,
            grid_y: 44,
            forecast_hourly_url: "https://api.weather.gov/gridpoints/SGX/46,44/forecast/hourly"
                .to_string(),
            position: Some(position),
            ..Default::default()
        }
    }

    fn create_forecast(spot_id: i64, hours: &[u32]) -> Vec<ForecastRecord> {
        hours
            .iter()
            .map(|&hour| ForecastRecord {
                spot_id,
                id: String::new(),
                timestamp: LOCAL_MIDNIGHT + hour as i64 * 3600,
                date_gmt: DateParts::default(),
                date_local: DateParts {
                    year: 2025,
                    month: 12,
                    day: 27,
                    hour,
                },
                is_dom: false,
                shape: 0.6,
                shape_list: vec![],
                size: 0.9,
                size_ft: 3.0,
                size_list: vec![],
                warnings: vec![],
                spot_name: None,
                position: None,
                weather: None,
                periods: vec![],
                swell: None,
            })
            .collect()
    }

    fn create_period(hour: i64) -> HourlyPeriod {
        let offset = chrono::FixedOffset::west_opt(8 * 3600).unwrap();
        let start = DateTime::from_timestamp(LOCAL_MIDNIGHT + hour * 3600, 0)
            .unwrap()
            .with_timezone(&offset);
        HourlyPeriod {
            number: hour as u32 + 1,
            start_time: start,
            end_time: start + Duration::hours(1),
            is_daytime: (6..18).contains(&hour),
            temperature: 60.0,
            temperature_unit: "F".to_string(),
            precipitation_chance: Some(0.0),
            relative_humidity: None,
            wind_speed: "6 mph".to_string(),
            wind_direction: "W".to_string(),
            short_forecast: "Sunny".to_string(),
        }
    }

    fn create_inputs(spot_id: i64, hours: &[u32], with_weather: bool) -> SpotInputs {
        let spot = create_spot(spot_id);
        let (weather, periods) = if with_weather {
            (
                spot.position().map(create_snapshot),
                (0..24).map(create_period).collect(),
            )
        } else {
            (None, vec![])
        };

        SpotInputs {
            spot,
            forecast: create_forecast(spot_id, hours),
            weather,
            periods,
            grid: None,
        }
    }

    fn create_grid() -> GridForecast {
        let window = |value: f64| GridParameter {
            uom: None,
            values: vec![GridValue {
                valid_time: "2025-12-27T00:00:00-08:00/P1D".parse().unwrap(),
                value: Some(value),
            }],
        };
        GridForecast {
            grid_id: "SGX".to_string(),
            primary_swell_height: GridParameter {
                uom: Some("wmoUnit:m".to_string()),
                ..window(1.5)
            },
            wave_period: window(15.0),
            ..Default::default()
        }
    }

    fn create_daily_period(name: &str, start_hour: i64) -> DailyPeriod {
        let offset = chrono::FixedOffset::west_opt(8 * 3600).unwrap();
        let start = DateTime::from_timestamp(LOCAL_MIDNIGHT + start_hour * 3600, 0)
            .unwrap()
            .with_timezone(&offset);
        DailyPeriod {
            number: 1,
            name: name.to_string(),
            start_time: start,
            end_time: start + Duration::hours(6),
            is_daytime: start_hour < 18,
            temperature: 62.0,
            temperature_unit: "F".to_string(),
            temperature_trend: None,
            precipitation_chance: None,
            wind_speed: "10 mph".to_string(),
            wind_direction: "W".to_string(),
            short_forecast: "Sunny".to_string(),
            detailed_forecast: String::new(),
        }
    }
}
