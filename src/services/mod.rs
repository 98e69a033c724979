pub mod providers;

pub use providers::{SurfForecastApi, WeatherApi};
