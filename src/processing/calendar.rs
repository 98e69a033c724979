//! Calendar stages: keeping today's records and splitting them into morning
//! and afternoon buckets.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::SurfError;
use crate::models::ForecastRecord;

/// Last hour (inclusive) of the morning bucket. Afternoon starts at the next hour.
pub const LAST_AM_HOUR: u32 = 11;

/// Which timezone a UNIX timestamp is read in when deciding its calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZonePolicy {
    Utc,
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl ZonePolicy {
    /// Calendar date of `timestamp` under this policy. `None` if out of range.
    pub fn date_of(&self, timestamp: i64) -> Option<NaiveDate> {
        let utc = DateTime::<Utc>::from_timestamp(timestamp, 0)?;
        Some(match self {
            ZonePolicy::Utc => utc.date_naive(),
            ZonePolicy::Local => utc.with_timezone(&Local).date_naive(),
            ZonePolicy::Fixed(offset) => utc.with_timezone(offset).date_naive(),
        })
    }

    /// Today's date under this policy.
    pub fn today(&self) -> NaiveDate {
        let now = Utc::now();
        match self {
            ZonePolicy::Utc => now.date_naive(),
            ZonePolicy::Local => now.with_timezone(&Local).date_naive(),
            ZonePolicy::Fixed(offset) => now.with_timezone(offset).date_naive(),
        }
    }
}

impl FromStr for ZonePolicy {
    type Err = SurfError;

    /// Accepts `utc`, `local`, or an offset such as `-08:00`, `+0530`, `+9`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "utc" | "z" => return Ok(ZonePolicy::Utc),
            "local" => return Ok(ZonePolicy::Local),
            _ => {}
        }

        let invalid = || SurfError::InvalidZone(s.to_string());

        let (sign, rest) = match trimmed.as_bytes().first() {
            Some(b'+') => (1, &trimmed[1..]),
            Some(b'-') => (-1, &trimmed[1..]),
            _ => return Err(invalid()),
        };

        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let (hours, minutes) = match digits.len() {
            1 | 2 => (digits.parse::<i32>().map_err(|_| invalid())?, 0),
            4 => (
                digits[..2].parse::<i32>().map_err(|_| invalid())?,
                digits[2..].parse::<i32>().map_err(|_| invalid())?,
            ),
            _ => return Err(invalid()),
        };

        if minutes >= 60 {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(ZonePolicy::Fixed)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for ZonePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZonePolicy::Utc => f.write_str("utc"),
            ZonePolicy::Local => f.write_str("local"),
            ZonePolicy::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

/// Keeps the records whose timestamp falls on `today` under `zone`.
pub fn select_today(
    records: Vec<ForecastRecord>,
    today: NaiveDate,
    zone: ZonePolicy,
) -> Vec<ForecastRecord> {
    records
        .into_iter()
        .filter(|record| zone.date_of(record.timestamp) == Some(today))
        .collect()
}

/// Splits records into morning (hours 0-11) and afternoon (hours 12-23)
/// buckets using the provider's local hour.
///
/// Records with an hour outside 0-23 are dropped.
pub fn split_am_pm(records: Vec<ForecastRecord>) -> (Vec<ForecastRecord>, Vec<ForecastRecord>) {
    let mut am = Vec::new();
    let mut pm = Vec::new();

    for record in records {
        match record.date_local.hour {
            0..=LAST_AM_HOUR => am.push(record),
            12..=23 => pm.push(record),
            hour => warn!(
                spot_id = record.spot_id,
                hour,
                "Forecast hour out of range, dropped from AM/PM split"
            ),
        }
    }

    (am, pm)
}
