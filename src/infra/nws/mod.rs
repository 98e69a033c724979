pub mod client;

pub use client::NwsClient;
