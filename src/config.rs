//! Provider endpoints and HTTP settings.
//!
//! URL templates use `{name}` placeholders:
//! - forecast: `{spot_id}`, `{year}`, `{month}`, `{day}`
//! - weather points: `{lat}`, `{lon}`

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::models::Coordinate;

pub const DEFAULT_SPOT_LIST_URL: &str = "https://api.spitcast.com/api/spot";
pub const DEFAULT_FORECAST_URL: &str =
    "https://api.spitcast.com/api/spot_forecast/{spot_id}/{year}/{month}/{day}";
pub const DEFAULT_WEATHER_POINTS_URL: &str = "https://api.weather.gov/points/{lat},{lon}";
pub const DEFAULT_USER_AGENT: &str = concat!("surf_report/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub spot_list_url: String,
    pub forecast_url_template: String,
    pub weather_points_url_template: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            spot_list_url: DEFAULT_SPOT_LIST_URL.to_string(),
            forecast_url_template: DEFAULT_FORECAST_URL.to_string(),
            weather_points_url_template: DEFAULT_WEATHER_POINTS_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl ProviderConfig {
    /// Defaults overridden by `SURF_*` environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("SURF_SPOT_URL") {
            config.spot_list_url = url;
        }
        if let Some(url) = lookup("SURF_FORECAST_URL") {
            config.forecast_url_template = url;
        }
        if let Some(url) = lookup("SURF_WEATHER_POINTS_URL") {
            config.weather_points_url_template = url;
        }
        if let Some(agent) = lookup("SURF_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(secs) = parse_secs(&lookup, "SURF_HTTP_TIMEOUT_SECS") {
            config.request_timeout_secs = secs;
        }
        if let Some(secs) = parse_secs(&lookup, "SURF_HTTP_CONNECT_TIMEOUT_SECS") {
            config.connect_timeout_secs = secs;
        }

        config
    }

    /// Forecast URL for one spot on one date.
    pub fn forecast_url(&self, spot_id: i64, date: NaiveDate) -> String {
        self.forecast_url_template
            .replace("{spot_id}", &spot_id.to_string())
            .replace("{year}", &date.year().to_string())
            .replace("{month}", &date.month().to_string())
            .replace("{day}", &date.day().to_string())
    }

    /// Weather point lookup URL. Coordinates are written latitude first.
    pub fn weather_points_url(&self, position: Coordinate) -> String {
        self.weather_points_url_template
            .replace("{lat}", &format!("{:.4}", position.latitude))
            .replace("{lon}", &format!("{:.4}", position.longitude))
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(secs) => Some(secs),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "Ignoring invalid timeout");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_forecast_url() {
        let config = ProviderConfig::default();
        let date = NaiveDate::from_ymd_opt(2026, 10, 6).unwrap();

        assert_eq!(
            config.forecast_url(603, date),
            "https://api.spitcast.com/api/spot_forecast/603/2026/10/6"
        );
    }

    #[test]
    fn test_weather_points_url_is_latitude_first() {
        let config = ProviderConfig::default();
        let position = Coordinate {
            latitude: 33.607,
            longitude: -117.93,
        };

        assert_eq!(
            config.weather_points_url(position),
            "https://api.weather.gov/points/33.6070,-117.9300"
        );
    }

    #[test]
    fn test_from_lookup_overrides() {
        let env: HashMap<&str, &str> = [
            ("SURF_SPOT_URL", "http://localhost/spots"),
            ("SURF_USER_AGENT", "tester"),
            ("SURF_HTTP_TIMEOUT_SECS", "5"),
            ("SURF_HTTP_CONNECT_TIMEOUT_SECS", "soon"),
        ]
        .into_iter()
        .collect();

        let config = ProviderConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.spot_list_url, "http://localhost/spots");
        assert_eq!(config.user_agent, "tester");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.forecast_url_template, DEFAULT_FORECAST_URL);
    }
}
