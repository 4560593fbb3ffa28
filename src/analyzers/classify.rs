use crate::analyzers::types::{DeviceCategory, FrequencyBucket, SignalBucket, WifiRecord};

/// Substrings that mark a manufacturer or SSID as belonging to a handset.
pub const MOBILE_KEYWORDS: &[&str] = &[
    "mobile", "phone", "android", "iphone", "xiaomi", "oppo", "vivo", "samsung",
];

/// Places a signal reading into its strength bucket.
///
/// Lower bounds are inclusive, so `-90.0` is `Fair` and `-60.0` is `Good`.
/// The parser never yields NaN; if one arrives it lands in `Weak`.
pub fn classify_signal(dbm: f64) -> SignalBucket {
    match dbm {
        d if d >= -30.0 => SignalBucket::Strong,
        d if d >= -60.0 => SignalBucket::Good,
        d if d >= -90.0 => SignalBucket::Fair,
        _ => SignalBucket::Weak,
    }
}

/// Places a frequency in GHz into its band. Negative values and NaN have no band.
pub fn classify_frequency(ghz: f64) -> Option<FrequencyBucket> {
    match ghz {
        g if g >= 5.0 => Some(FrequencyBucket::Band5),
        g if g >= 2.4 => Some(FrequencyBucket::Band24),
        g if g >= 0.0 => Some(FrequencyBucket::Low),
        _ => None,
    }
}

/// Guesses whether a record was broadcast by a handset or a fixed router.
///
/// Matching is case-insensitive substring containment over the manufacturer
/// and the SSID, so a router whose model name contains "android" is
/// reported as mobile.
pub fn classify_device(record: &WifiRecord) -> DeviceCategory {
    let mentions_mobile = |value: &str| {
        let value = value.to_lowercase();
        MOBILE_KEYWORDS.iter().any(|k| value.contains(k))
    };

    let by_manufacturer = record.manufacturer.as_deref().is_some_and(mentions_mobile);
    if by_manufacturer || mentions_mobile(&record.ssid) {
        DeviceCategory::Mobile
    } else {
        DeviceCategory::Router
    }
}
