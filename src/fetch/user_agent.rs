use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, USER_AGENT};
use tracing::warn;

/// An [`HttpClient`] wrapper that sets the `User-Agent` header on every request.
///
/// The weather provider rejects requests without one; it asks for an
/// application name and a contact address, e.g. `"surf_report (me@example.com)"`.
pub struct UserAgent<C> {
    pub inner: C,
    pub agent: String,
}

impl<C> UserAgent<C> {
    pub fn new(inner: C, agent: impl Into<String>) -> Self {
        Self {
            inner,
            agent: agent.into(),
        }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for UserAgent<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        match HeaderValue::from_str(&self.agent) {
            Ok(value) => {
                req.headers_mut().insert(USER_AGENT, value);
            }
            Err(e) => warn!(agent = %self.agent, error = %e, "Invalid User-Agent, sending request without it"),
        }
        self.inner.execute(req).await
    }
}
