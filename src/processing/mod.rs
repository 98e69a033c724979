//! Pure transformations that turn joined forecast records into daily summaries.
//!
//! Nothing in here performs I/O. Every stage takes its input by value or by
//! reference and returns a new collection, so repeated runs over the same
//! input produce the same output.

pub mod bearing;
pub mod calendar;
pub mod filter;
pub mod join;
pub mod summary;
pub mod utility;

pub use bearing::{MeanBearing, mean_bearing};
pub use calendar::{ZonePolicy, select_today, split_am_pm};
pub use filter::filter_spots;
pub use join::{attach_grid, attach_hourly_periods, attach_spot, attach_weather};
pub use summary::summarize;
