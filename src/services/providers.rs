//! Traits for the two upstream data sources.

use anyhow::Result;
use chrono::NaiveDate;

use crate::models::{
    Coordinate, DailyPeriod, ForecastRecord, GridForecast, HourlyPeriod, Spot, WeatherSnapshot,
};

/// Abstraction over a surf-forecast provider (e.g. Spitcast).
#[async_trait::async_trait]
pub trait SurfForecastApi: Send + Sync {
    /// Returns every spot the provider knows about.
    async fn list_spots(&self) -> Result<Vec<Spot>>;

    /// Returns the hourly forecast for one spot on `date`.
    async fn spot_forecast(&self, spot_id: i64, date: NaiveDate) -> Result<Vec<ForecastRecord>>;
}

/// Abstraction over a weather provider (e.g. the National Weather Service).
#[async_trait::async_trait]
pub trait WeatherApi: Send + Sync {
    /// Resolves a position to the provider's forecast grid.
    async fn weather_point(&self, position: Coordinate) -> Result<WeatherSnapshot>;

    /// Returns the hourly periods linked from `snapshot`.
    async fn hourly_periods(&self, snapshot: &WeatherSnapshot) -> Result<Vec<HourlyPeriod>>;

    /// Returns the half-day periods of the 7-day forecast linked from `snapshot`.
    async fn daily_forecast(&self, snapshot: &WeatherSnapshot) -> Result<Vec<DailyPeriod>>;

    /// Returns the raw gridded forecast linked from `snapshot`.
    async fn grid_forecast(&self, snapshot: &WeatherSnapshot) -> Result<GridForecast>;
}
