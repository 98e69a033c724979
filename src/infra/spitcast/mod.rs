pub mod client;

pub use client::SpitcastClient;
