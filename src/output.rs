//! Output formatting and persistence for daily reports.
//!
//! Supports pretty-printing to the log and writing indented JSON files.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::DailyReport;

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &DailyReport) {
    debug!("{:#?}", report);
}

/// Logs a report as pretty-printed JSON.
pub fn print_json(report: &DailyReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes `value` as indented JSON to `{dir}/{name}.json`, replacing any
/// existing file.
///
/// Creates `dir` if it does not already exist. Returns the written path.
pub fn write_json(dir: &Path, name: &str, value: &impl Serialize) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(format!("{name}.json"));
    debug!(path = %path.display(), "Writing JSON");

    let file =
        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompassBearing, SpotSummary, WindSummary};
    use chrono::NaiveDate;
    use std::env;

    fn temp_dir(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&create_report());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&create_report()).unwrap();
    }

    #[test]
    fn test_write_json_creates_directory_and_file() {
        let dir = temp_dir("surf_report_test_create");
        let _ = fs::remove_dir_all(&dir); // clean up any prior run

        let path = write_json(&dir, "am_summary", &vec![create_summary()]).unwrap();

        assert_eq!(path, dir.join("am_summary.json"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  {"), "output should be indented");
        assert!(content.contains("\"direction\": \"SW\""));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_json_reads_back() {
        let dir = temp_dir("surf_report_test_read_back");
        let _ = fs::remove_dir_all(&dir);

        let summaries = vec![create_summary()];
        let path = write_json(&dir, "pm_summary", &summaries).unwrap();
        let parsed: Vec<SpotSummary> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(parsed, summaries);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_json_overwrites() {
        let dir = temp_dir("surf_report_test_overwrite");
        let _ = fs::remove_dir_all(&dir);

        write_json(&dir, "report", &vec![create_summary(), create_summary()]).unwrap();
        let path = write_json(&dir, "report", &Vec::<SpotSummary>::new()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");

        fs::remove_dir_all(&dir).unwrap();
    }

    // Helper functions for tests
    fn create_summary() -> SpotSummary {
        SpotSummary {
            spot_id: 603,
            spot_name: "Blackies".to_string(),
            avg_wave_height: 2.5,
            quality: 0.6,
            wind: WindSummary {
                direction: CompassBearing::SW,
                mean_degrees: 225.0,
                speed: Some(6.0),
                readings: vec![],
            },
            air_temp: 61.3,
            swell_height: Some(3.3),
            swell_period: None,
            samples: 4,
        }
    }

    fn create_report() -> DailyReport {
        DailyReport {
            date: NaiveDate::from_ymd_opt(2025, 12, 27).unwrap(),
            am: vec![create_summary()],
            pm: vec![],
        }
    }
}
