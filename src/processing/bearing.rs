//! Circular mean of compass-label wind directions.
//!
//! Labels are averaged as unit vectors rather than as raw degree values, so
//! `NW` and `NE` average to `N` instead of `S`.

use crate::models::CompassBearing;

/// Resultant vectors shorter than this have no prevailing direction.
const DEGENERATE_RESULTANT: f64 = 1e-9;

/// Circular distances closer than this count as a tie.
const TIE_TOLERANCE: f64 = 1e-9;

/// 16-point labels accepted as input, in 22.5 degree steps from north.
const SIXTEEN_POINT: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanBearing {
    /// Nearest of the 8 canonical bearings.
    pub bearing: CompassBearing,
    /// Mean direction in `[0, 360)`.
    pub degrees: f64,
}

impl MeanBearing {
    const NORTH: MeanBearing = MeanBearing {
        bearing: CompassBearing::N,
        degrees: 0.0,
    };
}

/// Degree value of an 8- or 16-point compass label, case-insensitive.
pub fn label_degrees(label: &str) -> Option<f64> {
    let label = label.trim();
    if let Some(bearing) = CompassBearing::from_label(label) {
        return Some(bearing.degrees());
    }
    SIXTEEN_POINT
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(label))
        .map(|index| index as f64 * 22.5)
}

/// Averages compass labels into a single direction.
///
/// Empty or unrecognised labels are skipped. When nothing is left, or the
/// directions cancel out (`N` and `S`), the result is `N` at 0 degrees.
pub fn mean_bearing<S: AsRef<str>>(labels: &[S]) -> MeanBearing {
    let (sum_sin, sum_cos) = labels
        .iter()
        .filter_map(|label| label_degrees(label.as_ref()))
        .map(f64::to_radians)
        .fold((0.0, 0.0), |(sin, cos), theta| {
            (sin + theta.sin(), cos + theta.cos())
        });

    if sum_sin.hypot(sum_cos) < DEGENERATE_RESULTANT {
        return MeanBearing::NORTH;
    }

    let degrees = normalize_degrees(sum_sin.atan2(sum_cos).to_degrees());

    MeanBearing {
        bearing: nearest_bearing(degrees),
        degrees,
    }
}

/// Maps any angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    ((degrees % 360.0) + 360.0) % 360.0
}

/// Shortest angular distance between two directions, in `[0, 180]`.
pub fn circular_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    diff.min(360.0 - diff)
}

/// Nearest canonical bearing. Ties go to the earlier entry of
/// [`CompassBearing::TABLE`], which is also the lower degree value.
pub fn nearest_bearing(degrees: f64) -> CompassBearing {
    let mut best = CompassBearing::N;
    let mut best_distance = f64::INFINITY;

    for (bearing, value) in CompassBearing::TABLE {
        let distance = circular_distance(degrees, value);
        if distance < best_distance - TIE_TOLERANCE {
            best = bearing;
            best_distance = distance;
        }
    }

    best
}
