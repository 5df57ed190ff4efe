//! Pure interpolation and calendar transforms.
//!
//! This module has no I/O and no state. It is responsible for:
//!
//! - generating business-day calendars
//! - piecewise-linear interpolation of sparse (monthly) series onto an
//!   explicit daily date axis
//! - the year-over-year rate-of-change transform for index-valued series
//! - merge + full re-interpolation of raw monthly history
//!
//! The central design choice: interpolation targets are normally the dates
//! of an existing daily reference series (the treasury yields), supplied by
//! the caller. Interpolated series therefore share exact calendar alignment
//! with the reference, which is what makes cross-frequency charting work.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::domain::Observation;

/// Round to 4 decimal places, matching the stored precision of all
/// transformed values.
pub fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn linear(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    if x1 == x0 {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// Every Monday-Friday date in `[start, end]`, ascending, inclusive.
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        match current.weekday() {
            Weekday::Sat | Weekday::Sun => {}
            _ => days.push(current),
        }
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    days
}

/// Interpolate a sparse series onto an explicit ascending target date set.
///
/// One output observation per target date:
///
/// - targets before the first sparse point take the first value (flat
///   extrapolation, passed through exactly)
/// - targets after the last sparse point take the last value (flat)
/// - targets inside the hull are linearly interpolated between the two
///   bracketing sparse points by date-as-day-number, rounded to 4 decimals
///
/// Empty sparse input produces empty output. The sparse series is sorted
/// internally, so callers need not pre-sort.
pub fn interpolate_to_targets(sparse: &[Observation], targets: &[NaiveDate]) -> Vec<Observation> {
    if sparse.is_empty() {
        return Vec::new();
    }

    let mut sorted = sparse.to_vec();
    sorted.sort_by_key(|p| p.date);

    let first = sorted[0];
    let last = sorted[sorted.len() - 1];

    let mut out = Vec::with_capacity(targets.len());
    for &target in targets {
        if target < first.date {
            out.push(Observation::new(target, first.value));
            continue;
        }
        if target > last.date {
            out.push(Observation::new(target, last.value));
            continue;
        }

        let x = day_number(target);
        let mut left = first;
        let mut right = last;
        for pair in sorted.windows(2) {
            if pair[0].date <= target && target <= pair[1].date {
                left = pair[0];
                right = pair[1];
                break;
            }
        }

        let value = linear(
            day_number(left.date),
            left.value,
            day_number(right.date),
            right.value,
            x,
        );
        out.push(Observation::new(target, round4(value)));
    }

    out
}

/// Range-clamped interpolation entry point.
///
/// Targets are filtered to `[start, end]` and sorted; when no targets are
/// supplied the business-day calendar over the range is used instead.
pub fn interpolate_range(
    sparse: &[Observation],
    start: NaiveDate,
    end: NaiveDate,
    targets: Option<&[NaiveDate]>,
) -> Vec<Observation> {
    let dates: Vec<NaiveDate> = match targets {
        Some(dates) if !dates.is_empty() => {
            let mut filtered: Vec<NaiveDate> = dates
                .iter()
                .copied()
                .filter(|d| (start..=end).contains(d))
                .collect();
            filtered.sort();
            filtered
        }
        _ => business_days_between(start, end),
    };

    interpolate_to_targets(sparse, &dates)
}

/// Year-over-year percentage change for an index-valued series.
///
/// For each point, the reference is the point whose date is closest (by
/// absolute day distance, over the full series) to one year before it;
/// this tolerates months of unequal length and missing exact anniversaries.
/// A point is emitted only when the reference value is positive. For the
/// earliest points the closest reference is the point itself, which yields
/// a 0.0 rate; consumers see a flat zero segment for the first year.
pub fn year_over_year_change(series: &[Observation]) -> Vec<Observation> {
    if series.is_empty() {
        return Vec::new();
    }

    let mut sorted = series.to_vec();
    sorted.sort_by_key(|p| p.date);

    let mut out = Vec::new();
    for point in &sorted {
        let year_ago = point
            .date
            .with_year(point.date.year() - 1)
            // Feb 29 has no previous-year anniversary; 365 days back is close
            // enough for a closest-point search.
            .unwrap_or_else(|| point.date - Days::new(365));

        let mut reference: Option<&Observation> = None;
        let mut min_distance = i64::MAX;
        for candidate in &sorted {
            let distance = (candidate.date - year_ago).num_days().abs();
            if distance < min_distance {
                min_distance = distance;
                reference = Some(candidate);
            }
        }

        if let Some(reference) = reference {
            if reference.value > 0.0 {
                let rate = (point.value - reference.value) / reference.value * 100.0;
                out.push(Observation::new(point.date, round4(rate)));
            }
        }
    }

    out
}

/// Merge two raw series by date; on collision the `newer` point wins.
/// The result is sorted ascending.
pub fn merge_by_date(older: &[Observation], newer: &[Observation]) -> Vec<Observation> {
    let mut merged: Vec<Observation> = older.to_vec();
    for point in newer {
        match merged.iter_mut().find(|p| p.date == point.date) {
            Some(existing) => *existing = *point,
            None => merged.push(*point),
        }
    }
    merged.sort_by_key(|p| p.date);
    merged
}

/// Merge newly fetched monthly points into the full raw history and
/// re-interpolate from scratch onto `targets`.
///
/// Interpolated output is always a pure function of (complete raw history,
/// target dates) — it is never patched incrementally, which would let
/// repeated runs drift away from a from-scratch rebuild. The existing daily
/// series contributes only its date range.
pub fn merge_and_reinterpolate(
    existing_daily: &[Observation],
    new_monthly: &[Observation],
    original_monthly: &[Observation],
    targets: Option<&[NaiveDate]>,
) -> Vec<Observation> {
    let merged = merge_by_date(original_monthly, new_monthly);
    if merged.is_empty() {
        return Vec::new();
    }

    let range_dates = existing_daily.iter().chain(new_monthly).map(|p| p.date);
    let start = range_dates.clone().min().unwrap_or(merged[0].date);
    let end = range_dates.max().unwrap_or(merged[merged.len() - 1].date);

    interpolate_range(&merged, start, end, targets)
}
