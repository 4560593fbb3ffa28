//! CSV parser and row validation for WiFi scan exports.
//!
//! Parsing happens in two steps. [`read_raw_rows`] turns the document into
//! untyped [`RawRow`] maps and fails only when the document itself is
//! unreadable. [`parse_and_validate`] then turns each row into a
//! [`WifiRecord`] or records why it was dropped.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Read;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::{debug, warn};

use crate::analyzers::types::{UNKNOWN, WifiRecord};

/// Column names recognised in scan exports. Matching is case-sensitive.
pub mod columns {
    pub const SSID: &str = "SSID";
    pub const NAME: &str = "name";
    pub const BSSID: &str = "BSSID";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const SIGNAL: &str = "signal";
    pub const ENCRYPTION: &str = "ENCRYPTION";
    pub const AUTHENTICATION: &str = "AUTHENTICATION";
    pub const CHANNEL: &str = "CHANNEL";
    pub const RADIO_TYPE: &str = "RADIO_TYPE";
    pub const FREQUENCY: &str = "frequency";
    pub const MANUFACTURER: &str = "MANUFACTURER";
}

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// One data row keyed by header name.
pub type RawRow = HashMap<String, String>;

/// Why a row was excluded from the record set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowRejection {
    #[error("missing {column}")]
    MissingCoordinate { column: &'static str },
    #[error("{column} is not a finite number: {value:?}")]
    InvalidCoordinate { column: &'static str, value: String },
}

/// A dropped row and its 1-based position among the data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub row: usize,
    pub reason: RowRejection,
}

/// Result of validating one scan file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedScan {
    pub records: Vec<WifiRecord>,
    pub rejected: Vec<RejectedRow>,
}

impl ParsedScan {
    pub fn dropped_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Reads and validates a scan file in one go.
///
/// # Errors
///
/// Returns an error if the document cannot be read as CSV. Individual bad
/// rows never fail the call.
pub fn parse_scan(bytes: &[u8]) -> Result<ParsedScan> {
    let rows = read_raw_rows(bytes)?;
    Ok(parse_and_validate(&rows))
}

/// Splits a CSV document with a header row into [`RawRow`]s.
///
/// Gzip input is detected by its magic bytes and decompressed first. Header
/// names are trimmed; cells are kept exactly as written. Short rows simply
/// lack the trailing columns, and cells past the header width are ignored.
///
/// # Errors
///
/// Returns an error on invalid gzip data, invalid UTF-8 or an unreadable
/// header.
pub fn read_raw_rows(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let data = decompress(bytes)?;
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(&data[..]);

    let headers = reader
        .headers()
        .context("Failed to read CSV header")?
        .clone();

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Malformed CSV at data row {}", i + 1))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }

    debug!(rows = rows.len(), columns = headers.len(), "CSV rows read");
    Ok(rows)
}

fn decompress(bytes: &[u8]) -> Result<Cow<'_, [u8]>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(Cow::Borrowed(bytes));
    }

    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .context("Failed to decompress gzip input")?;
    Ok(Cow::Owned(out))
}

/// Validates every row, keeping the good ones and recording the rest.
pub fn parse_and_validate(rows: &[RawRow]) -> ParsedScan {
    let mut scan = ParsedScan::default();

    for (i, row) in rows.iter().enumerate() {
        match validate_row(row) {
            Ok(record) => scan.records.push(record),
            Err(reason) => {
                debug!(row = i + 1, reason = %reason, "Row rejected");
                scan.rejected.push(RejectedRow { row: i + 1, reason });
            }
        }
    }

    if scan.dropped_count() > 0 {
        warn!(
            kept = scan.records.len(),
            dropped = scan.dropped_count(),
            "Dropped rows without usable coordinates"
        );
    }

    scan
}

/// Turns one row into a [`WifiRecord`].
///
/// Only the coordinates are mandatory. An unparseable `signal` or `frequency`
/// becomes `None` and keeps the record. Categorical cells are copied verbatim,
/// blanks included; `None` means the column is missing from the row.
pub fn validate_row(row: &RawRow) -> Result<WifiRecord, RowRejection> {
    let latitude = coordinate(row, columns::LATITUDE)?;
    let longitude = coordinate(row, columns::LONGITUDE)?;

    let ssid = non_empty(row, columns::SSID)
        .or_else(|| non_empty(row, columns::NAME))
        .unwrap_or(UNKNOWN);

    Ok(WifiRecord {
        ssid: ssid.to_string(),
        bssid: owned(row, columns::BSSID),
        latitude,
        longitude,
        signal_dbm: number(row, columns::SIGNAL),
        encryption: owned(row, columns::ENCRYPTION),
        authentication: owned(row, columns::AUTHENTICATION),
        channel: owned(row, columns::CHANNEL),
        radio_type: non_empty(row, columns::RADIO_TYPE)
            .unwrap_or(UNKNOWN)
            .to_string(),
        frequency_ghz: number(row, columns::FREQUENCY),
        manufacturer: owned(row, columns::MANUFACTURER),
    })
}

fn non_empty<'a>(row: &'a RawRow, column: &str) -> Option<&'a str> {
    row.get(column).map(String::as_str).filter(|v| !v.is_empty())
}

fn owned(row: &RawRow, column: &str) -> Option<String> {
    row.get(column).cloned()
}

fn number(row: &RawRow, column: &str) -> Option<f64> {
    row.get(column).and_then(|v| parse_float_prefix(v))
}

fn coordinate(row: &RawRow, column: &'static str) -> Result<f64, RowRejection> {
    let raw = row
        .get(column)
        .filter(|v| !v.trim().is_empty())
        .ok_or(RowRejection::MissingCoordinate { column })?;

    match parse_float_prefix(raw) {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(RowRejection::InvalidCoordinate {
            column,
            value: raw.to_string(),
        }),
    }
}

/// Reads the longest leading decimal number of `text`, ignoring what follows.
///
/// Leading whitespace is skipped, so `" -55 dBm"` reads as `-55.0` and
/// `"10abc"` as `10.0`. A signed `Infinity` is accepted. Returns `None` when
/// no digits start the text; the result is never NaN.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        return s[..end + "Infinity".len()].parse().ok();
    }

    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if has_digits || frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}
