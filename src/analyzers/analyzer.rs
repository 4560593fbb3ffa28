use crate::fetch::{HttpClient, load_source};
use crate::parser::{ParsedScan, parse_scan};
use crate::stats::ScanReport;
use anyhow::{Context, Result};
use tracing::info;

/// Loads a scan file from disk or a URL and runs the full pipeline over it.
///
/// Each call starts from scratch: the returned scan and report replace
/// whatever the caller held before.
#[tracing::instrument(skip(client))]
pub async fn analyze_source<C: HttpClient>(
    client: &C,
    source: &str,
) -> Result<(ParsedScan, ScanReport)> {
    let bytes = load_source(client, source).await?;
    let scan = parse_scan(&bytes).with_context(|| format!("Failed to parse scan file {source}"))?;
    let report = analyze_scan(&scan).with_source(source);

    info!(
        records = report.total_records,
        rejected = report.rejected_rows,
        unique_bssids = report.unique_bssids,
        mobile = report.mobile_devices,
        router = report.router_devices,
        "Scan analyzed"
    );
    Ok((scan, report))
}

/// Builds the report for an already parsed scan.
pub fn analyze_scan(scan: &ParsedScan) -> ScanReport {
    ScanReport::from_scan(scan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;
    use std::env;
    use std::fs;

    #[tokio::test]
    async fn test_analyze_source_from_file() {
        let path = env::temp_dir().join("wifi_scan_rater_test_analyze.csv");
        fs::write(
            &path,
            "SSID,BSSID,latitude,longitude,signal,MANUFACTURER\n\
             Lab,aa:aa,10,20,-45,Ubiquiti\n\
             Broken,bb:bb,,20,-45,Ubiquiti\n",
        )
        .unwrap();
        let source = path.to_str().unwrap().to_string();

        let client = BasicClient::new();
        let (scan, report) = analyze_source(&client, &source).await.unwrap();

        assert_eq!(scan.records.len(), 1);
        assert_eq!(scan.dropped_count(), 1);
        assert_eq!(report.source.as_deref(), Some(source.as_str()));
        assert_eq!(report.views.signal.count_of("-60 to -30 dBm"), Some(1));

        fs::remove_file(&path).unwrap();
    }
}
