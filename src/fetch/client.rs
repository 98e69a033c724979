use async_trait::async_trait;
use reqwest::{Request, Response};

/// The transport seam used by the provider clients.
///
/// Wrappers such as [`UserAgent`](super::UserAgent) decorate another client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
