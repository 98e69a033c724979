use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::fetch::{HttpClient, fetch_bytes};
use crate::models::{ForecastRecord, Spot};
use crate::parser::{parse_spot_forecast, parse_spots};
use crate::services::SurfForecastApi;

pub struct SpitcastClient<C> {
    http: C,
    config: ProviderConfig,
}

impl<C: HttpClient> SpitcastClient<C> {
    pub fn new(http: C, config: ProviderConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl<C: HttpClient> SurfForecastApi for SpitcastClient<C> {
    async fn list_spots(&self) -> Result<Vec<Spot>> {
        let url = &self.config.spot_list_url;
        let bytes = fetch_bytes(&self.http, url)
            .await
            .with_context(|| format!("Failed to fetch spot list from {url}"))?;
        let spots = parse_spots(&bytes).context("Failed to decode spot list")?;

        debug!(count = spots.len(), "Spot list decoded");
        Ok(spots)
    }

    async fn spot_forecast(&self, spot_id: i64, date: NaiveDate) -> Result<Vec<ForecastRecord>> {
        let url = self.config.forecast_url(spot_id, date);
        let bytes = fetch_bytes(&self.http, &url)
            .await
            .with_context(|| format!("Failed to fetch forecast for spot {spot_id}"))?;
        let records = parse_spot_forecast(&bytes)
            .with_context(|| format!("Failed to decode forecast for spot {spot_id}"))?;

        debug!(spot_id, count = records.len(), "Spot forecast decoded");
        Ok(records)
    }
}
