use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Request, RequestBuilder, Response, StatusCode};

use super::client::HttpClient;

/// What a [`MockClient`] saw of one executed request.
#[derive(Debug, Clone)]
pub struct SentRequest {
    pub method: Method,
    pub url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Answers every request with a canned status and body, keeping a copy of
/// each request it was given.
pub struct MockClient {
    inner: reqwest::Client,
    status: StatusCode,
    body: &'static str,
    sent: Mutex<Vec<SentRequest>>,
}

impl MockClient {
    pub fn responding(status: StatusCode, body: &'static str) -> Self {
        Self {
            inner: reqwest::Client::new(),
            status,
            body,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn execute(&self, mut req: Request) -> reqwest::Result<Response> {
        let body = match req.body_mut().take() {
            Some(body) => body.collect().await?.to_bytes(),
            None => Bytes::new(),
        };
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        self.sent.lock().unwrap().push(SentRequest {
            method: req.method().clone(),
            url: req.url().to_string(),
            content_type,
            body,
        });

        let resp = http::Response::builder()
            .status(self.status)
            .body(self.body)
            .unwrap();
        Ok(Response::from(resp))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.inner.request(method, url)
    }
}
