//! Data types used by the classification and aggregation pipeline.

use serde::Serialize;

use crate::analyzers::utility::pct;

/// Label used when a scan row carries no value for a field.
pub const UNKNOWN: &str = "Unknown";

/// A validated access-point observation from a scan file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WifiRecord {
    pub ssid: String,
    pub bssid: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub signal_dbm: Option<f64>,
    pub encryption: Option<String>,
    pub authentication: Option<String>,
    pub channel: Option<String>,
    pub radio_type: String,
    pub frequency_ghz: Option<f64>,
    pub manufacturer: Option<String>,
}

/// A fixed set of ranges or categories with a declared display order.
///
/// `ALL` lists every variant in chart order; bucketed views always emit one
/// entry per element, even when its count is zero.
pub trait Bucket: Copy + Eq + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;
}

/// Received signal strength range.
///
/// | Range           | Bucket   |
/// |-----------------|----------|
/// | < -90 dBm       | Weak     |
/// | [-90, -60) dBm  | Fair     |
/// | [-60, -30) dBm  | Good     |
/// | >= -30 dBm      | Strong   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SignalBucket {
    Weak,
    Fair,
    Good,
    Strong,
}

impl Bucket for SignalBucket {
    const ALL: &'static [Self] = &[Self::Weak, Self::Fair, Self::Good, Self::Strong];

    fn label(self) -> &'static str {
        match self {
            Self::Weak => "-Infinity to -90 dBm",
            Self::Fair => "-90 to -60 dBm",
            Self::Good => "-60 to -30 dBm",
            Self::Strong => "-30 to Infinity dBm",
        }
    }
}

/// Radio frequency range in GHz: `[0, 2.4)`, `[2.4, 5)` and `[5, inf)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FrequencyBucket {
    Low,
    Band24,
    Band5,
}

impl Bucket for FrequencyBucket {
    const ALL: &'static [Self] = &[Self::Low, Self::Band24, Self::Band5];

    fn label(self) -> &'static str {
        match self {
            Self::Low => "0 - 2.4 GHz",
            Self::Band24 => "2.4 - 5 GHz",
            Self::Band5 => "5+ GHz",
        }
    }
}

/// Heuristic device type derived from manufacturer and SSID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeviceCategory {
    Mobile,
    Router,
}

impl Bucket for DeviceCategory {
    const ALL: &'static [Self] = &[Self::Mobile, Self::Router];

    fn label(self) -> &'static str {
        match self {
            Self::Mobile => "Mobile",
            Self::Router => "Router",
        }
    }
}

/// String-valued record fields that can be grouped into a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalField {
    Encryption,
    Authentication,
    RadioType,
    Manufacturer,
}

impl CategoricalField {
    /// Returns the field value. Rows that lacked the column group under
    /// [`UNKNOWN`]; blank cells keep their empty label.
    pub fn select(self, record: &WifiRecord) -> &str {
        let value = match self {
            Self::Encryption => record.encryption.as_deref(),
            Self::Authentication => record.authentication.as_deref(),
            Self::RadioType => Some(record.radio_type.as_str()),
            Self::Manufacturer => record.manufacturer.as_deref(),
        };
        value.unwrap_or(UNKNOWN)
    }

    pub fn view_name(self) -> &'static str {
        match self {
            Self::Encryption => "encryption",
            Self::Authentication => "authentication",
            Self::RadioType => "radio_type",
            Self::Manufacturer => "manufacturer",
        }
    }
}

/// One `(label, count)` pair of an [`AggregateView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateEntry {
    pub label: String,
    pub count: usize,
}

/// A named, ordered count-per-category dataset that feeds one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateView {
    pub name: String,
    pub entries: Vec<AggregateEntry>,
}

impl AggregateView {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    /// Sum of all counts in the view.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn count_of(&self, label: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.count)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Percentage share of each entry, as shown on pie chart labels.
    pub fn shares(&self) -> Vec<(&str, f64)> {
        let total = self.total();
        self.entries
            .iter()
            .map(|e| (e.label.as_str(), pct(e.count, total)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_orders_are_declared_order() {
        assert_eq!(
            SignalBucket::ALL
                .iter()
                .map(|b| b.label())
                .collect::<Vec<_>>(),
            vec![
                "-Infinity to -90 dBm",
                "-90 to -60 dBm",
                "-60 to -30 dBm",
                "-30 to Infinity dBm"
            ]
        );
        assert_eq!(FrequencyBucket::ALL.len(), 3);
        assert_eq!(DeviceCategory::ALL[0].label(), "Mobile");
    }

    #[test]
    fn test_view_total_and_shares() {
        let view = AggregateView {
            name: "encryption".to_string(),
            entries: vec![
                AggregateEntry {
                    label: "WPA2".to_string(),
                    count: 3,
                },
                AggregateEntry {
                    label: "Open".to_string(),
                    count: 1,
                },
            ],
        };

        assert_eq!(view.total(), 4);
        assert_eq!(view.count_of("Open"), Some(1));
        assert_eq!(view.count_of("WEP"), None);
        assert_eq!(view.shares(), vec![("WPA2", 75.0), ("Open", 25.0)]);
    }

    #[test]
    fn test_shares_of_empty_view() {
        let view = AggregateView::new("signal");
        assert!(view.shares().is_empty());
        assert_eq!(view.total(), 0);
    }
}
