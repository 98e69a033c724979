pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod models;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod processing;
pub mod services;

pub use error::{Result, SurfError};
