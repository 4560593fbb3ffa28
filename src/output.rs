//! Output formatting and persistence for scan reports.
//!
//! Supports pretty-printing, JSON reports, CSV history append, and the
//! marker export used for map pin placement.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::classify::{classify_device, classify_signal};
use crate::analyzers::types::{Bucket, SignalBucket, WifiRecord};
use crate::stats::{ScanReport, ScanSummary};
use csv::WriterBuilder;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

/// Map pin color for a signal bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PinColor {
    Red,
    Yellow,
    Green,
    Unknown,
}

impl PinColor {
    /// Green from -60 dBm up, yellow from -90 dBm, red below that.
    pub fn for_signal(bucket: Option<SignalBucket>) -> Self {
        match bucket {
            Some(SignalBucket::Strong | SignalBucket::Good) => PinColor::Green,
            Some(SignalBucket::Fair) => PinColor::Yellow,
            Some(SignalBucket::Weak) => PinColor::Red,
            None => PinColor::Unknown,
        }
    }
}

#[derive(Debug, Serialize)]
struct MarkerRow<'a> {
    ssid: &'a str,
    bssid: Option<&'a str>,
    latitude: f64,
    longitude: f64,
    signal_dbm: Option<f64>,
    signal_bucket: Option<&'static str>,
    pin_color: PinColor,
    device_type: &'static str,
    encryption: Option<&'a str>,
    authentication: Option<&'a str>,
    channel: Option<&'a str>,
    radio_type: &'a str,
    frequency_ghz: Option<f64>,
    manufacturer: Option<&'a str>,
}

impl<'a> From<&'a WifiRecord> for MarkerRow<'a> {
    fn from(r: &'a WifiRecord) -> Self {
        let bucket = r.signal_dbm.map(classify_signal);
        MarkerRow {
            ssid: &r.ssid,
            bssid: r.bssid.as_deref(),
            latitude: r.latitude,
            longitude: r.longitude,
            signal_dbm: r.signal_dbm,
            signal_bucket: bucket.map(Bucket::label),
            pin_color: PinColor::for_signal(bucket),
            device_type: classify_device(r).label(),
            encryption: r.encryption.as_deref(),
            authentication: r.authentication.as_deref(),
            channel: r.channel.as_deref(),
            radio_type: &r.radio_type,
            frequency_ghz: r.frequency_ghz,
            manufacturer: r.manufacturer.as_deref(),
        }
    }
}

/// Logs a scan report using Rust's debug pretty-print format.
pub fn print_pretty(report: &ScanReport) {
    debug!("{:#?}", report);
}

/// Logs a scan report as pretty-printed JSON.
pub fn print_json(report: &ScanReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Logs one line per chart dataset with each label's count and share.
pub fn print_views(report: &ScanReport) {
    for view in report.views.iter() {
        let line = view
            .shares()
            .iter()
            .zip(&view.entries)
            .map(|((label, share), e)| format!("{label}={} ({share:.0}%)", e.count))
            .collect::<Vec<_>>()
            .join(", ");
        info!(view = %view.name, total = view.total(), "{}", line);
    }
}

/// Writes the full report as pretty JSON, replacing any existing file.
pub fn write_report(path: &Path, report: &ScanReport) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, report)?;
    info!(path = %path.display(), "Report written");
    Ok(())
}

/// Appends a [`ScanSummary`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &Path, summary: &ScanSummary) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}

/// Writes one CSV row per record with its signal bucket and pin color.
pub fn write_markers(path: &Path, records: &[WifiRecord]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for record in records {
        writer.serialize(MarkerRow::from(record))?;
    }
    writer.flush()?;

    info!(path = %path.display(), markers = records.len(), "Markers written");
    Ok(())
}
