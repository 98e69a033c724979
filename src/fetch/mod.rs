mod basic;
mod client;
mod user_agent;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use user_agent::UserAgent;

use tracing::debug;

use crate::error::{Result, SurfError};

/// Issues a GET for `url` and returns the response body.
///
/// # Errors
///
/// Fails on an unparseable URL, a transport error, or a non-2xx status.
#[tracing::instrument(skip(client))]
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse()
            .map_err(|e| SurfError::InvalidUrl(format!("{url}: {e}")))?,
    );

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(SurfError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let bytes = resp.bytes().await?.to_vec();
    debug!(bytes = bytes.len(), "Response received");
    Ok(bytes)
}
