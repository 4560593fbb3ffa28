use crate::analyzers::classify::{classify_device, classify_frequency, classify_signal};
use crate::analyzers::types::{
    AggregateEntry, AggregateView, Bucket, CategoricalField, DeviceCategory, FrequencyBucket,
    SignalBucket, WifiRecord,
};
use std::collections::HashMap;

/// Counts records by the exact value of a string field.
///
/// Labels appear in the order they are first seen. Every record is counted
/// once, so the view total equals the number of records.
pub fn aggregate_by_field(records: &[WifiRecord], field: CategoricalField) -> AggregateView {
    let mut view = AggregateView::new(field.view_name());
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let value = field.select(record);
        match index.get(value) {
            Some(&i) => view.entries[i].count += 1,
            None => {
                index.insert(value, view.entries.len());
                view.entries.push(AggregateEntry {
                    label: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    view
}

/// Manufacturer counts, most common first.
///
/// The sort is stable: manufacturers with equal counts keep first-seen order.
pub fn aggregate_manufacturers(records: &[WifiRecord]) -> AggregateView {
    let mut view = aggregate_by_field(records, CategoricalField::Manufacturer);
    view.entries.sort_by(|a, b| b.count.cmp(&a.count));
    view
}

/// Counts records per bucket of `B`, emitting every bucket in declared order.
///
/// Records for which `bucketer` returns `None` are not counted in this view.
pub fn aggregate_bucketed<B, F>(name: &str, records: &[WifiRecord], bucketer: F) -> AggregateView
where
    B: Bucket,
    F: Fn(&WifiRecord) -> Option<B>,
{
    let mut counts = vec![0usize; B::ALL.len()];

    for record in records {
        let slot = bucketer(record).and_then(|b| B::ALL.iter().position(|x| *x == b));
        if let Some(i) = slot {
            counts[i] += 1;
        }
    }

    AggregateView {
        name: name.to_string(),
        entries: B::ALL
            .iter()
            .zip(counts)
            .map(|(b, count)| AggregateEntry {
                label: b.label().to_string(),
                count,
            })
            .collect(),
    }
}

/// Signal strength histogram. Records with no parsed signal are skipped.
pub fn aggregate_signal(records: &[WifiRecord]) -> AggregateView {
    aggregate_bucketed::<SignalBucket, _>("signal", records, |r| {
        r.signal_dbm.map(classify_signal)
    })
}

/// Frequency band histogram. Records with no parsed frequency are skipped.
pub fn aggregate_frequency(records: &[WifiRecord]) -> AggregateView {
    aggregate_bucketed::<FrequencyBucket, _>("frequency", records, |r| {
        r.frequency_ghz.and_then(classify_frequency)
    })
}

/// Mobile versus router breakdown. Every record lands in exactly one category.
pub fn aggregate_devices(records: &[WifiRecord]) -> AggregateView {
    aggregate_bucketed::<DeviceCategory, _>("device_type", records, |r| {
        Some(classify_device(r))
    })
}
