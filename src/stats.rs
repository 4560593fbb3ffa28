use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::aggregate::{
    aggregate_by_field, aggregate_devices, aggregate_frequency, aggregate_manufacturers,
    aggregate_signal,
};
use crate::analyzers::classify::classify_device;
use crate::analyzers::types::{
    AggregateView, Bucket, CategoricalField, DeviceCategory, FrequencyBucket, SignalBucket,
    UNKNOWN, WifiRecord,
};
use crate::analyzers::utility::{mean, stddev};
use crate::parser::ParsedScan;

/// The seven chart datasets produced for one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanViews {
    pub encryption: AggregateView,
    pub authentication: AggregateView,
    pub radio_type: AggregateView,
    pub frequency: AggregateView,
    pub signal: AggregateView,
    pub device_type: AggregateView,
    pub manufacturer: AggregateView,
}

impl ScanViews {
    pub fn from_records(records: &[WifiRecord]) -> Self {
        ScanViews {
            encryption: aggregate_by_field(records, CategoricalField::Encryption),
            authentication: aggregate_by_field(records, CategoricalField::Authentication),
            radio_type: aggregate_by_field(records, CategoricalField::RadioType),
            frequency: aggregate_frequency(records),
            signal: aggregate_signal(records),
            device_type: aggregate_devices(records),
            manufacturer: aggregate_manufacturers(records),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggregateView> {
        [
            &self.encryption,
            &self.authentication,
            &self.radio_type,
            &self.frequency,
            &self.signal,
            &self.device_type,
            &self.manufacturer,
        ]
        .into_iter()
    }
}

/// Everything the dashboards need from one scan file.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub generated_at: DateTime<Utc>,
    pub source: Option<String>,
    pub total_records: usize,
    pub rejected_rows: usize,

    // device analysis
    /// Distinct BSSID values. Rows whose export has no BSSID column are left
    /// out rather than sharing a single "missing" identity; a blank BSSID
    /// cell still counts as one value.
    pub unique_bssids: usize,
    pub mobile_devices: usize,
    pub router_devices: usize,
    pub mobile_device_list: Vec<String>,
    pub router_device_list: Vec<String>,

    // signal summary over finite readings
    pub avg_signal_dbm: Option<f64>,
    pub signal_stddev: Option<f64>,

    pub views: ScanViews,
}

impl ScanReport {
    /// Runs every classification and aggregation over a validated scan.
    ///
    /// Nothing is carried between calls; the same scan always yields the same
    /// counts and views.
    pub fn from_scan(scan: &ParsedScan) -> Self {
        let records = &scan.records;

        let unique_bssids = records
            .iter()
            .filter_map(|r| r.bssid.as_deref())
            .collect::<HashSet<_>>()
            .len();

        let mut mobile_device_list = Vec::new();
        let mut router_device_list = Vec::new();
        for r in records {
            let entry = device_label(r);
            match classify_device(r) {
                DeviceCategory::Mobile => mobile_device_list.push(entry),
                DeviceCategory::Router => router_device_list.push(entry),
            }
        }

        let signals: Vec<f64> = records
            .iter()
            .filter_map(|r| r.signal_dbm)
            .filter(|s| s.is_finite())
            .collect();
        let (avg_signal_dbm, signal_stddev) = if signals.is_empty() {
            (None, None)
        } else {
            let avg = mean(&signals);
            (Some(avg), Some(stddev(&signals, avg)))
        };

        ScanReport {
            generated_at: Utc::now(),
            source: None,
            total_records: records.len(),
            rejected_rows: scan.dropped_count(),
            unique_bssids,
            mobile_devices: mobile_device_list.len(),
            router_devices: router_device_list.len(),
            mobile_device_list,
            router_device_list,
            avg_signal_dbm,
            signal_stddev,
            views: ScanViews::from_records(records),
        }
    }

    /// Set the file name or URL the scan was loaded from
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    /// Flattens the report into a single CSV-friendly row.
    pub fn summary(&self) -> ScanSummary {
        let signal = |b: SignalBucket| self.views.signal.count_of(b.label()).unwrap_or(0);
        let band = |b: FrequencyBucket| self.views.frequency.count_of(b.label()).unwrap_or(0);

        ScanSummary {
            timestamp: self.generated_at,
            source: self.source.clone(),
            total_records: self.total_records,
            rejected_rows: self.rejected_rows,
            unique_bssids: self.unique_bssids,
            mobile_devices: self.mobile_devices,
            router_devices: self.router_devices,
            signal_weak: signal(SignalBucket::Weak),
            signal_fair: signal(SignalBucket::Fair),
            signal_good: signal(SignalBucket::Good),
            signal_strong: signal(SignalBucket::Strong),
            band_low: band(FrequencyBucket::Low),
            band_24: band(FrequencyBucket::Band24),
            band_5: band(FrequencyBucket::Band5),
            top_manufacturer: self
                .views
                .manufacturer
                .entries
                .first()
                .map(|e| e.label.clone()),
            avg_signal_dbm: self.avg_signal_dbm,
        }
    }
}

/// One row of the scan history CSV.
#[derive(Debug, Default, Serialize)]
pub struct ScanSummary {
    pub timestamp: DateTime<Utc>,
    pub source: Option<String>,
    pub total_records: usize,
    pub rejected_rows: usize,
    pub unique_bssids: usize,
    pub mobile_devices: usize,
    pub router_devices: usize,

    // signal histogram
    pub signal_weak: usize,
    pub signal_fair: usize,
    pub signal_good: usize,
    pub signal_strong: usize,

    // frequency histogram
    pub band_low: usize,
    pub band_24: usize,
    pub band_5: usize,

    pub top_manufacturer: Option<String>,
    pub avg_signal_dbm: Option<f64>,
}

/// `"<ssid> (<manufacturer>)"` for the device lists.
///
/// A record with no manufacturer column is labelled `Unknown`, matching the
/// manufacturer chart, instead of printing an empty placeholder.
fn device_label(record: &WifiRecord) -> String {
    format!(
        "{} ({})",
        record.ssid,
        record.manufacturer.as_deref().unwrap_or(UNKNOWN)
    )
}
