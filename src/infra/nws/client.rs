use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::fetch::{HttpClient, UserAgent, fetch_bytes};
use crate::models::{Coordinate, DailyPeriod, GridForecast, HourlyPeriod, WeatherSnapshot};
use crate::parser::{
    parse_daily_forecast, parse_grid_data, parse_hourly_periods, parse_weather_point,
};
use crate::services::WeatherApi;

/// National Weather Service client. Every request carries the configured
/// `User-Agent`.
pub struct NwsClient<C> {
    http: UserAgent<C>,
    config: ProviderConfig,
}

impl<C: HttpClient> NwsClient<C> {
    pub fn new(http: C, config: ProviderConfig) -> Self {
        let agent = config.user_agent.clone();
        Self {
            http: UserAgent::new(http, agent),
            config,
        }
    }
}

#[async_trait]
impl<C: HttpClient> WeatherApi for NwsClient<C> {
    async fn weather_point(&self, position: Coordinate) -> Result<WeatherSnapshot> {
        let url = self.config.weather_points_url(position);
        let bytes = fetch_bytes(&self.http, &url)
            .await
            .with_context(|| format!("Failed to fetch weather point {url}"))?;
        let snapshot = parse_weather_point(&bytes).context("Failed to decode weather point")?;

        debug!(grid_id = %snapshot.grid_id, grid_x = snapshot.grid_x, grid_y = snapshot.grid_y, "Weather point resolved");
        Ok(snapshot)
    }

    async fn hourly_periods(&self, snapshot: &WeatherSnapshot) -> Result<Vec<HourlyPeriod>> {
        if !snapshot.has_hourly_link() {
            bail!("Weather point {} has no hourly forecast link", snapshot.grid_id);
        }

        let url = &snapshot.forecast_hourly_url;
        let bytes = fetch_bytes(&self.http, url)
            .await
            .with_context(|| format!("Failed to fetch hourly forecast {url}"))?;
        let periods = parse_hourly_periods(&bytes).context("Failed to decode hourly forecast")?;

        debug!(count = periods.len(), "Hourly periods decoded");
        Ok(periods)
    }

    async fn daily_forecast(&self, snapshot: &WeatherSnapshot) -> Result<Vec<DailyPeriod>> {
        let url = snapshot.forecast_url.trim();
        if url.is_empty() {
            bail!("Weather point {} has no forecast link", snapshot.grid_id);
        }

        let bytes = fetch_bytes(&self.http, url)
            .await
            .with_context(|| format!("Failed to fetch forecast {url}"))?;
        let periods = parse_daily_forecast(&bytes).context("Failed to decode forecast")?;

        debug!(count = periods.len(), "Forecast periods decoded");
        Ok(periods)
    }

    async fn grid_forecast(&self, snapshot: &WeatherSnapshot) -> Result<GridForecast> {
        let url = snapshot.forecast_grid_data_url.trim();
        if url.is_empty() {
            bail!("Weather point {} has no grid data link", snapshot.grid_id);
        }

        let bytes = fetch_bytes(&self.http, url)
            .await
            .with_context(|| format!("Failed to fetch grid data {url}"))?;
        let grid = parse_grid_data(&bytes).context("Failed to decode grid data")?;

        debug!(
            grid_id = %grid.grid_id,
            swell_values = grid.primary_swell_height.values.len(),
            "Grid data decoded"
        );
        Ok(grid)
    }
}
