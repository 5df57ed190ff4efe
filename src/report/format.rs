//! Formatted terminal output for sync and freshness reports.
//!
//! We keep formatting code in one place so:
//! - the sync/classification code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use chrono::NaiveDate;

use crate::domain::UpdateSummary;
use crate::report::{Freshness, OverallStatus, SyncReport};

/// Format the full synchronization report.
pub fn format_sync_report(report: &SyncReport, today: NaiveDate) -> String {
    let mut out = String::new();

    out.push_str("=== Data Synchronization Report ===\n\n");

    out.push_str(&format!("Overall: {}", report.overall.label()));
    match report.overall {
        OverallStatus::FullySynced => out.push_str(" - all series share the same latest date\n"),
        OverallStatus::Partial => out.push_str(" - some series are slightly behind\n"),
        OverallStatus::OutOfSync => out.push_str(" - significant drift between series\n"),
    }
    out.push('\n');

    out.push_str(&format!("Newest data: {}\n", report.newest_date));
    out.push_str(&format!("Oldest data: {}\n", report.oldest_date));
    out.push_str(&format!(
        "Common date: {} (all series have data up to here)\n",
        report.common_date
    ));
    out.push_str(&format!("Today:       {today}\n"));
    out.push_str(&format!(
        "Drift:       {} day(s) between oldest and newest\n\n",
        report.days_drift
    ));

    out.push_str("Series status (sorted by date):\n");
    out.push_str(&format!(
        "{:<25} {:>12} {:>9} {:>10}\n",
        "key", "latest", "records", "status"
    ));
    for series in &report.series_details {
        let age = if series.days_behind == 0 {
            "current".to_string()
        } else {
            format!("{}d behind", series.days_behind)
        };
        out.push_str(&format!(
            "{:<25} {:>12} {:>9} {:>10}  ({age})\n",
            series.key,
            series.latest_date.to_string(),
            series.record_count,
            series.status.label(),
        ));
    }
    out.push('\n');

    if !report.stale_series.is_empty() {
        out.push_str("Stale series (3+ days behind):\n");
        for series in &report.stale_series {
            out.push_str(&format!(
                "- {}: {} day(s) behind ({})\n",
                series.key, series.days_behind, series.latest_date
            ));
        }
        out.push('\n');
    }

    out
}

/// Format the freshness surface shown by `status`.
pub fn format_freshness(freshness: &Freshness) -> String {
    let mut out = String::new();
    out.push_str(&format!("Last updated: {}", freshness.last_updated));
    if freshness.is_stale {
        out.push_str(" (stale, more than 1 day old)\n");
    } else {
        out.push_str(" (fresh)\n");
    }
    out.push_str(&format!("Series tracked: {}\n", freshness.series_info.len()));
    out
}

/// Format the outcome of a sync run.
pub fn format_update_summary(summary: &UpdateSummary) -> String {
    if !summary.updated {
        return "All data is up to date, no changes needed\n".to_string();
    }

    let mut out = String::new();
    out.push_str("Update summary:\n");
    out.push_str(&format!("- Series updated: {}\n", summary.series_updated.len()));
    out.push_str(&format!("- New records:    {}\n", summary.new_records));
    out.push_str(&format!(
        "- Updated series: {}\n",
        summary.series_updated.join(", ")
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Metadata, SeriesMeta};
    use crate::report::check_synchronization;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn sync_report_lists_stale_series() {
        let mut metadata = Metadata::new(d(2024, 3, 15));
        metadata.series_info.insert(
            "fresh".to_string(),
            SeriesMeta {
                latest_date: d(2024, 3, 15),
                record_count: 10,
                source_id: "A".to_string(),
            },
        );
        metadata.series_info.insert(
            "laggard".to_string(),
            SeriesMeta {
                latest_date: d(2024, 3, 10),
                record_count: 8,
                source_id: "B".to_string(),
            },
        );

        let report = check_synchronization(&metadata).unwrap();
        let text = format_sync_report(&report, d(2024, 3, 15));

        assert!(text.contains("out of sync"));
        assert!(text.contains("laggard: 5 day(s) behind"));
        assert!(text.contains("Common date: 2024-03-10"));
    }

    #[test]
    fn no_op_summary_says_up_to_date() {
        let summary = UpdateSummary::default();
        assert!(format_update_summary(&summary).contains("up to date"));
    }

    #[test]
    fn update_summary_lists_keys() {
        let summary = UpdateSummary {
            updated: true,
            series_updated: vec!["vix".to_string(), "cpi".to_string()],
            new_records: 7,
        };
        let text = format_update_summary(&summary);
        assert!(text.contains("Series updated: 2"));
        assert!(text.contains("New records:    7"));
        assert!(text.contains("vix, cpi"));
    }
}
