//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during interpolation and merging
//! - written to / reloaded from the JSON store
//! - consumed directly by the dashboard front-end

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single dated value in a series.
///
/// `date` is a plain calendar date (no time-of-day, no timezone) and
/// serializes as `YYYY-MM-DD`. Within any stored series, dates are unique
/// and strictly ascending.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Semantic category of a series.
///
/// Drives display grouping and, for `Inflation`, the year-over-year
/// transform applied before interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Yields,
    Inflation,
    Volatility,
    Employment,
    Commodities,
    Currency,
    EconomicIndicators,
}

/// Native publication frequency of a series at FRED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Monthly,
}

/// How the synchronizer processes a series.
///
/// A closed sum type instead of string comparison on the category: the sync
/// loop matches exhaustively on this, so adding a new processing mode is a
/// compile error until every branch handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Fetched daily data merged append-only into the stored series.
    Direct,
    /// Monthly data persisted raw (`<key>_monthly.json`) and re-interpolated
    /// in full onto the reference date axis on every change.
    Interpolated,
    /// Never fetched; recomputed from two stored series after the main pass.
    Derived {
        minuend: &'static str,
        subtrahend: &'static str,
    },
}

/// A catalog entry: one FRED series and how to process it.
///
/// Immutable, defined at process start in `registry`.
#[derive(Debug, Clone, Copy)]
pub struct SeriesSpec {
    pub key: &'static str,
    pub name: &'static str,
    /// FRED series id. For derived series this is informational only
    /// (nothing is fetched for them).
    pub source_id: &'static str,
    pub category: Category,
    pub frequency: Frequency,
    pub kind: SeriesKind,
    /// Display unit, e.g. `%`, `$/barrel`, `Index`.
    pub unit: Option<&'static str>,
}

impl SeriesSpec {
    /// File stem of the raw (pre-interpolation) monthly series.
    pub fn raw_key(&self) -> String {
        format!("{}_monthly", self.key)
    }
}

/// Per-series freshness bookkeeping inside `metadata.json`.
///
/// Invariant: `latest_date` equals the date of the last stored observation
/// and `record_count` equals the stored length; both are rewritten in the
/// same step as the series file itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesMeta {
    pub latest_date: NaiveDate,
    pub record_count: usize,
    pub source_id: String,
}

/// The single persisted metadata record for the whole store.
///
/// `series_info` is keyed by series key; a `BTreeMap` keeps the JSON output
/// stable across runs so unchanged syncs are byte-identical on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub last_updated: NaiveDate,
    pub series_info: BTreeMap<String, SeriesMeta>,
}

impl Metadata {
    pub fn new(last_updated: NaiveDate) -> Self {
        Self {
            last_updated,
            series_info: BTreeMap::new(),
        }
    }
}

/// Result of one synchronizer run.
#[derive(Debug, Clone, Default)]
pub struct UpdateSummary {
    /// Whether anything changed on disk.
    pub updated: bool,
    /// Keys of series that were rewritten this run, in processing order.
    pub series_updated: Vec<String>,
    /// Total new records. For interpolated series this counts new *raw*
    /// monthly points, not the regenerated daily row count.
    pub new_records: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn observation_serializes_as_plain_date() {
        let obs = Observation::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), 4.25);
        let json = serde_json::to_string(&obs).unwrap();
        assert_eq!(json, r#"{"date":"2024-03-15","value":4.25}"#);

        let back: Observation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, obs);
    }

    #[test]
    fn metadata_round_trips_camel_case() {
        let mut meta = Metadata::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        meta.series_info.insert(
            "treasury_10y".to_string(),
            SeriesMeta {
                latest_date: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
                record_count: 1550,
                source_id: "DGS10".to_string(),
            },
        );

        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"lastUpdated\":\"2024-03-15\""));
        assert!(json.contains("\"latestDate\":\"2024-03-14\""));
        assert!(json.contains("\"recordCount\":1550"));
        assert!(json.contains("\"sourceId\":\"DGS10\""));

        let back: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }
}
