//! Freshness and synchronization reporting.
//!
//! Everything here is a pure computation over the persisted metadata
//! record: no fetches, no file writes. The dashboard and the `status`
//! subcommand consume these results; `format` renders them for terminals.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{Metadata, SeriesMeta};

pub mod format;

pub use format::*;

/// Per-series staleness relative to the newest series in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStatus {
    /// At most 1 day behind the newest series.
    Current,
    /// 2-3 days behind.
    Delayed,
    /// More than 3 days behind.
    Stale,
}

impl SeriesStatus {
    pub fn classify(days_behind: i64) -> Self {
        if days_behind <= 1 {
            SeriesStatus::Current
        } else if days_behind <= 3 {
            SeriesStatus::Delayed
        } else {
            SeriesStatus::Stale
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SeriesStatus::Current => "current",
            SeriesStatus::Delayed => "delayed",
            SeriesStatus::Stale => "stale",
        }
    }
}

/// Whole-store synchronization classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallStatus {
    /// All series share the same latest date.
    FullySynced,
    /// Drift of at most 3 days between oldest and newest.
    Partial,
    /// More than 3 days of drift.
    OutOfSync,
}

impl OverallStatus {
    pub fn label(self) -> &'static str {
        match self {
            OverallStatus::FullySynced => "fully synchronized",
            OverallStatus::Partial => "partial sync",
            OverallStatus::OutOfSync => "out of sync",
        }
    }
}

/// One row of the per-series breakdown, sorted by latest date ascending.
#[derive(Debug, Clone)]
pub struct SeriesDetail {
    pub key: String,
    pub latest_date: NaiveDate,
    pub record_count: usize,
    /// Days behind the newest series in the store.
    pub days_behind: i64,
    pub status: SeriesStatus,
}

/// Synchronization report across all series in the metadata record.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub overall: OverallStatus,
    pub is_fully_synced: bool,
    pub newest_date: NaiveDate,
    pub oldest_date: NaiveDate,
    /// Every series has data up to at least this date.
    pub common_date: NaiveDate,
    /// Days between the oldest and newest latest-dates.
    pub days_drift: i64,
    pub series_details: Vec<SeriesDetail>,
    /// Series at least 3 days behind the newest, most stale first.
    pub stale_series: Vec<SeriesDetail>,
}

/// Freshness surface served to the dashboard.
#[derive(Debug, Clone)]
pub struct Freshness {
    pub last_updated: NaiveDate,
    /// More than one day since the last successful sync.
    pub is_stale: bool,
    pub series_info: BTreeMap<String, SeriesMeta>,
}

/// Days between two calendar dates, always non-negative.
fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days().abs()
}

/// Classify drift and staleness across all series. `None` when the metadata
/// record contains no series yet.
pub fn check_synchronization(metadata: &Metadata) -> Option<SyncReport> {
    let newest_date = metadata.series_info.values().map(|i| i.latest_date).max()?;
    let oldest_date = metadata.series_info.values().map(|i| i.latest_date).min()?;

    let days_drift = days_between(oldest_date, newest_date);
    let overall = if days_drift == 0 {
        OverallStatus::FullySynced
    } else if days_drift <= 3 {
        OverallStatus::Partial
    } else {
        OverallStatus::OutOfSync
    };

    let mut series_details: Vec<SeriesDetail> = metadata
        .series_info
        .iter()
        .map(|(key, info)| {
            let days_behind = days_between(info.latest_date, newest_date);
            SeriesDetail {
                key: key.clone(),
                latest_date: info.latest_date,
                record_count: info.record_count,
                days_behind,
                status: SeriesStatus::classify(days_behind),
            }
        })
        .collect();
    series_details.sort_by(|a, b| a.latest_date.cmp(&b.latest_date).then(a.key.cmp(&b.key)));

    let mut stale_series: Vec<SeriesDetail> = series_details
        .iter()
        .filter(|s| s.days_behind >= 3)
        .cloned()
        .collect();
    stale_series.sort_by(|a, b| b.days_behind.cmp(&a.days_behind));

    Some(SyncReport {
        overall,
        is_fully_synced: days_drift == 0,
        newest_date,
        oldest_date,
        common_date: oldest_date,
        days_drift,
        series_details,
        stale_series,
    })
}

/// The dashboard's freshness query: last sync date, a staleness flag, and
/// the raw per-series bookkeeping.
pub fn data_freshness(metadata: &Metadata, today: NaiveDate) -> Freshness {
    Freshness {
        last_updated: metadata.last_updated,
        is_stale: (today - metadata.last_updated).num_days() > 1,
        series_info: metadata.series_info.clone(),
    }
}
