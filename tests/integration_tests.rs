use std::collections::HashMap;

use wifi_scan_rater::analyzers::analyzer::analyze_scan;
use wifi_scan_rater::parser::{RawRow, RowRejection, parse_and_validate, parse_scan};
use wifi_scan_rater::stats::ScanReport;

fn raw(pairs: &[(&str, &str)]) -> RawRow {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<HashMap<_, _>>()
}

fn counts(view: &wifi_scan_rater::analyzers::types::AggregateView) -> Vec<usize> {
    view.entries.iter().map(|e| e.count).collect()
}

#[test]
fn test_full_pipeline() {
    let bytes = include_bytes!("fixtures/sample_scan.csv");
    let scan = parse_scan(bytes).expect("Failed to parse scan");
    let report = analyze_scan(&scan);

    assert_eq!(report.total_records, 7);
    assert_eq!(report.rejected_rows, 2);
    assert_eq!(scan.rejected[0].row, 5);
    assert_eq!(
        scan.rejected[0].reason,
        RowRejection::InvalidCoordinate {
            column: "latitude",
            value: "N/A".to_string()
        }
    );
    assert_eq!(
        scan.rejected[1].reason,
        RowRejection::MissingCoordinate {
            column: "longitude"
        }
    );

    assert_eq!(report.unique_bssids, 6);
    assert_eq!(report.mobile_devices, 1);
    assert_eq!(report.router_devices, 6);
    assert_eq!(
        report.mobile_device_list,
        vec!["Galaxy S21 (Samsung Electronics)"]
    );

    let views = &report.views;
    assert_eq!(counts(&views.signal), vec![1, 2, 2, 1]);
    assert_eq!(counts(&views.frequency), vec![0, 4, 3]);
    assert_eq!(counts(&views.device_type), vec![1, 6]);
    assert_eq!(views.encryption.labels(), vec!["WPA2", "Open", "WPA3"]);
    assert_eq!(views.encryption.count_of("WPA2"), Some(5));
    assert_eq!(views.radio_type.count_of("Unknown"), Some(1));
    assert_eq!(
        views.manufacturer.labels(),
        vec!["TP-Link", "Cisco", "Samsung Electronics", "Huawei"]
    );
}

#[test]
fn test_view_totals_match_record_count() {
    let bytes = include_bytes!("fixtures/sample_scan.csv");
    let scan = parse_scan(bytes).unwrap();
    let report = analyze_scan(&scan);
    let records = &scan.records;

    let with_signal = records.iter().filter(|r| r.signal_dbm.is_some()).count();
    let with_frequency = records.iter().filter(|r| r.frequency_ghz.is_some()).count();

    assert_eq!(report.views.signal.total(), with_signal);
    assert_eq!(report.views.frequency.total(), with_frequency);
    assert_eq!(report.views.encryption.total(), records.len());
    assert_eq!(report.views.authentication.total(), records.len());
    assert_eq!(report.views.manufacturer.total(), records.len());
    assert_eq!(report.views.device_type.total(), records.len());
    assert_eq!(report.views.radio_type.total(), records.len());
}

#[test]
fn test_blank_categorical_cells_are_counted() {
    let csv = b"SSID,latitude,longitude,signal,ENCRYPTION,MANUFACTURER\n\
A,1,2,-50,,\n\
B,1,2,-50,WPA2,Cisco\n";
    let scan = parse_scan(csv).unwrap();
    let report = analyze_scan(&scan);
    let records = scan.records.len();

    assert_eq!(records, 2);
    assert_eq!(report.views.encryption.total(), records);
    assert_eq!(report.views.encryption.count_of(""), Some(1));
    assert_eq!(report.views.manufacturer.total(), records);
    assert_eq!(report.views.manufacturer.count_of("Cisco"), Some(1));
    // no AUTHENTICATION column at all
    assert_eq!(report.views.authentication.labels(), vec!["Unknown"]);
    assert_eq!(report.views.authentication.total(), records);
}

#[test]
fn test_categorical_values_are_not_trimmed() {
    let csv = b"SSID,latitude,longitude,ENCRYPTION\nA,1,2,WPA2 \nB,1,2,WPA2\n";
    let report = analyze_scan(&parse_scan(csv).unwrap());

    assert_eq!(report.views.encryption.labels(), vec!["WPA2 ", "WPA2"]);
    assert_eq!(report.views.encryption.entries.len(), 2);
}

#[test]
fn test_numeric_cells_with_trailing_text() {
    let csv = b"SSID,latitude,longitude,signal,frequency\nA,17.97abc,102.63,-55 dBm,5.18 GHz\n";
    let scan = parse_scan(csv).unwrap();

    assert_eq!(scan.records.len(), 1);
    assert_eq!(scan.records[0].latitude, 17.97);
    assert_eq!(scan.records[0].signal_dbm, Some(-55.0));

    let report = analyze_scan(&scan);
    assert_eq!(report.views.signal.count_of("-60 to -30 dBm"), Some(1));
    assert_eq!(report.views.frequency.count_of("5+ GHz"), Some(1));
}

#[test]
fn test_two_row_example() {
    let rows = vec![
        raw(&[
            ("SSID", "Phone1"),
            ("MANUFACTURER", "Samsung"),
            ("latitude", "10"),
            ("longitude", "20"),
            ("signal", "-55"),
            ("frequency", "2.4"),
            ("ENCRYPTION", "WPA2"),
        ]),
        raw(&[
            ("SSID", "AP1"),
            ("MANUFACTURER", "Cisco"),
            ("latitude", "bad"),
            ("longitude", "20"),
            ("signal", "-70"),
        ]),
    ];

    let scan = parse_and_validate(&rows);
    let report = ScanReport::from_scan(&scan);

    assert_eq!(scan.records.len(), 1);
    assert_eq!(scan.dropped_count(), 1);
    assert_eq!(report.views.device_type.count_of("Mobile"), Some(1));
    assert_eq!(report.views.device_type.count_of("Router"), Some(0));
    assert_eq!(counts(&report.views.signal), vec![0, 0, 1, 0]);
    assert_eq!(report.views.signal.count_of("-60 to -30 dBm"), Some(1));
}

#[test]
fn test_bad_signal_only_leaves_signal_view() {
    let rows = vec![raw(&[
        ("SSID", "Lab"),
        ("latitude", "1.5"),
        ("longitude", "2.5"),
        ("signal", "n/a"),
        ("frequency", "5.2"),
        ("ENCRYPTION", "WPA2"),
    ])];

    let report = ScanReport::from_scan(&parse_and_validate(&rows));

    assert_eq!(report.total_records, 1);
    assert_eq!(report.views.signal.total(), 0);
    assert_eq!(report.views.frequency.total(), 1);
    assert_eq!(report.views.encryption.total(), 1);
    assert_eq!(report.views.device_type.total(), 1);
    assert_eq!(report.views.manufacturer.count_of("Unknown"), Some(1));
}

#[test]
fn test_pipeline_is_idempotent() {
    let bytes = include_bytes!("fixtures/sample_scan.csv");

    let first = analyze_scan(&parse_scan(bytes).unwrap());
    let second = analyze_scan(&parse_scan(bytes).unwrap());

    assert_eq!(first.views, second.views);
    assert_eq!(first.mobile_device_list, second.mobile_device_list);
    assert_eq!(first.unique_bssids, second.unique_bssids);
}

#[test]
fn test_malformed_document_fails() {
    let bytes = b"SSID,latitude,longitude\n\xc3\x28,1,2\n";
    assert!(parse_scan(bytes).is_err());
}
