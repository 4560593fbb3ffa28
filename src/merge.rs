//! Client for the external KML + CSV merge service.
//!
//! The service takes a KML track and a scan CSV as multipart form data and
//! answers with the merged CSV as the raw response body.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::{debug, info};

use crate::fetch::HttpClient;

pub const DEFAULT_MERGE_ENDPOINT: &str = "https://flask-app-dd1q.onrender.com/process";

/// Largest file accepted for upload.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub const DEFAULT_MERGED_FILE: &str = "merged_output.csv";

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("{field} not found: {}", .path.display())]
    Missing { field: &'static str, path: PathBuf },
    #[error("{field} is empty: {}", .path.display())]
    Empty { field: &'static str, path: PathBuf },
    #[error("{field} is {size} bytes, over the {limit} byte limit: {}", .path.display(), limit = MAX_UPLOAD_BYTES)]
    TooLarge {
        field: &'static str,
        path: PathBuf,
        size: u64,
    },
    #[error("merge service responded with {0}")]
    Status(reqwest::StatusCode),
}

/// The two files submitted to the merge service.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub kml: PathBuf,
    pub csv: PathBuf,
}

impl MergeRequest {
    pub fn new(kml: impl Into<PathBuf>, csv: impl Into<PathBuf>) -> Self {
        Self {
            kml: kml.into(),
            csv: csv.into(),
        }
    }

    /// Checks that both files exist, are non-empty and fit the upload limit.
    pub fn validate(&self) -> Result<(), MergeError> {
        check_upload("kmlFile", &self.kml)?;
        check_upload("csvFile", &self.csv)?;
        Ok(())
    }

    async fn form(&self) -> Result<Form> {
        let kml = file_part(&self.kml, "application/vnd.google-earth.kml+xml").await?;
        let csv = file_part(&self.csv, "text/csv").await?;
        Ok(Form::new().part("kmlFile", kml).part("csvFile", csv))
    }
}

fn check_upload(field: &'static str, path: &Path) -> Result<(), MergeError> {
    let size = match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => meta.len(),
        _ => {
            return Err(MergeError::Missing {
                field,
                path: path.to_path_buf(),
            });
        }
    };

    if size == 0 {
        return Err(MergeError::Empty {
            field,
            path: path.to_path_buf(),
        });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(MergeError::TooLarge {
            field,
            path: path.to_path_buf(),
            size,
        });
    }
    Ok(())
}

async fn file_part(path: &Path, mime: &str) -> Result<Part> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Part::bytes(data).file_name(name).mime_str(mime)?)
}

/// Uploads both files and returns the merged document.
///
/// # Errors
///
/// Fails on validation errors, transport errors and non-success statuses.
#[tracing::instrument(skip(client, request), fields(kml = %request.kml.display(), csv = %request.csv.display()))]
pub async fn request_merge<C: HttpClient>(
    client: &C,
    endpoint: &str,
    request: &MergeRequest,
) -> Result<Bytes> {
    request.validate()?;

    let req = client
        .request(Method::POST, endpoint)
        .multipart(request.form().await?)
        .build()?;

    debug!("Submitting merge request");
    let resp = client.execute(req).await?;
    if !resp.status().is_success() {
        return Err(MergeError::Status(resp.status()).into());
    }

    let body = resp.bytes().await?;
    info!(bytes = body.len(), "Merged file received");
    Ok(body)
}
