use thiserror::Error;

pub type Result<T> = std::result::Result<T, SurfError>;

#[derive(Error, Debug)]
pub enum SurfError {
    #[error("Failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} returned status {status}")]
    Status { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Wind speed '{raw}' has no numeric value")]
    WindSpeed { raw: String },

    #[error("No weather join for spot {spot_id}: {reason}")]
    JoinGap { spot_id: i64, reason: String },

    #[error("Invalid validTime interval '{0}' (expected <RFC 3339 start>/<ISO-8601 duration>)")]
    InvalidInterval(String),

    #[error("Invalid zone policy '{0}' (expected utc, local or +HH:MM)")]
    InvalidZone(String),
}
