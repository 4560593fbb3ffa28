//! Runtime settings read from the environment (and `.env`, loaded by the binary).

use std::time::Duration;

use anyhow::{Context, Result};

use crate::merge::DEFAULT_MERGE_ENDPOINT;

pub const DEFAULT_LOG_FILE: &str = "logs/wifi_scan_rater.log";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Rolling JSON log file; the directory part is created on demand.
    pub log_file_path: String,
    pub merge_endpoint: String,
    pub http_timeout: Duration,
}

impl Settings {
    /// Reads `LOG_FILE_PATH`, `MERGE_ENDPOINT` and `HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let http_timeout_secs = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("HTTP_TIMEOUT_SECS must be whole seconds, got {raw:?}"))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Settings {
            log_file_path: lookup("LOG_FILE_PATH").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            merge_endpoint: lookup("MERGE_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_MERGE_ENDPOINT.to_string()),
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }
}
