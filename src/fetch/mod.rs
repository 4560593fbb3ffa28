mod basic;
mod client;
#[cfg(test)]
pub(crate) mod mock;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = client.request(reqwest::Method::GET, url).build()?;

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Loads a scan file from a local path, or over HTTP when `source` is a URL.
#[tracing::instrument(skip(client))]
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        fetch_bytes(client, source)
            .await
            .with_context(|| format!("Failed to fetch {source}"))?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("Failed to read {source}"))?
    };
    debug!(bytes = bytes.len(), "Scan source loaded");
    Ok(bytes)
}
