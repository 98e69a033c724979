//! HTTP implementations of the provider traits in [`crate::services`].

pub mod nws;
pub mod spitcast;

pub use nws::NwsClient;
pub use spitcast::SpitcastClient;
