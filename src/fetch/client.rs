use async_trait::async_trait;
use reqwest::{Method, Request, RequestBuilder, Response};

/// Transport used for every outbound HTTP call.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;

    /// Starts a request carrying this client's defaults (timeouts, headers).
    fn request(&self, method: Method, url: &str) -> RequestBuilder;
}
