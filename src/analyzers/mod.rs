//! WiFi record classification and aggregation.
//!
//! This module classifies validated scan records by signal strength,
//! frequency band and device type, and groups them into the count-per-label
//! views that drive the dashboard charts.

pub mod aggregate;
pub mod analyzer;
pub mod classify;
pub mod types;
pub mod utility;
