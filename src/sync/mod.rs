//! Incremental synchronization of all catalog series.
//!
//! One run is strictly sequential: series are processed in registry order,
//! one fetch at a time (the FRED client rate-limits internally, so fan-out
//! would buy nothing). Metadata is read once at the start, mutated in
//! memory, and written once at the end — and only when something changed,
//! so a no-op run leaves the store byte-identical.
//!
//! Failure isolation: an error on one series is reported and the loop moves
//! on; the run's summary reflects only the series that actually succeeded.
//! The backfill path is the opposite — any failure there is fatal, since a
//! half-built store is worse than none.

use std::collections::{BTreeSet, HashMap};

use chrono::{Days, NaiveDate};

use crate::data::ObservationSource;
use crate::domain::{Category, Metadata, Observation, SeriesKind, SeriesMeta, SeriesSpec, UpdateSummary};
use crate::error::AppError;
use crate::interp;
use crate::registry;
use crate::store::DataStore;

pub struct Synchronizer<'a, S: ObservationSource> {
    source: &'a S,
    store: &'a DataStore,
    /// Earliest date fetched during backfill and the lower bound of every
    /// interpolation range.
    start_date: NaiveDate,
}

impl<'a, S: ObservationSource> Synchronizer<'a, S> {
    pub fn new(source: &'a S, store: &'a DataStore, start_date: NaiveDate) -> Self {
        Self {
            source,
            store,
            start_date,
        }
    }

    /// One synchronization run.
    ///
    /// With no metadata on disk this is a first run: incremental merging
    /// against nonexistent state is degenerate, so the whole store is built
    /// from scratch instead.
    pub fn run(&self, today: NaiveDate) -> Result<UpdateSummary, AppError> {
        match self.store.load_metadata()? {
            Some(metadata) => self.incremental(metadata, today),
            None => {
                println!("No existing metadata found, performing full backfill...");
                self.backfill(today)
            }
        }
    }

    fn incremental(
        &self,
        mut metadata: Metadata,
        today: NaiveDate,
    ) -> Result<UpdateSummary, AppError> {
        // The reference axis is collected once, up front. Reference dates
        // gained during this run are picked up by the next one.
        let reference_dates = self.collect_reference_dates(&metadata);

        let mut summary = UpdateSummary::default();

        for spec in registry::ALL_SERIES {
            match self.sync_series(spec, &mut metadata, today, &reference_dates) {
                Ok(Some(new_records)) => {
                    summary.series_updated.push(spec.key.to_string());
                    summary.new_records += new_records;
                    summary.updated = true;
                }
                Ok(None) => {}
                Err(err) => {
                    eprintln!("Error updating {}: {err}", spec.name);
                }
            }
        }

        self.recompute_derived(&mut metadata, &mut summary);

        if summary.updated {
            metadata.last_updated = today;
            self.store.write_metadata(&metadata)?;
        }

        Ok(summary)
    }

    /// Union of stored dates across the daily reference (treasury) series,
    /// ascending. Series without a metadata entry have never been populated
    /// and are skipped; an unreadable file is reported but not fatal.
    fn collect_reference_dates(&self, metadata: &Metadata) -> Vec<NaiveDate> {
        let mut dates = BTreeSet::new();
        for key in registry::reference_keys() {
            if !metadata.series_info.contains_key(key) {
                continue;
            }
            match self.store.load_series(key) {
                Ok(series) => dates.extend(series.iter().map(|p| p.date)),
                Err(err) => eprintln!("Could not read {key} for date alignment: {err}"),
            }
        }
        dates.into_iter().collect()
    }

    /// Sync a single series. Returns `Some(new_record_count)` when the
    /// stored series changed; for interpolated series the count is the new
    /// *raw* monthly points, not the regenerated daily rows.
    fn sync_series(
        &self,
        spec: &SeriesSpec,
        metadata: &mut Metadata,
        today: NaiveDate,
        reference_dates: &[NaiveDate],
    ) -> Result<Option<usize>, AppError> {
        // Derived series are recomputed after the main pass.
        if matches!(spec.kind, SeriesKind::Derived { .. }) {
            return Ok(None);
        }

        let Some(info) = metadata.series_info.get(spec.key) else {
            println!("No metadata for {}, skipping", spec.name);
            return Ok(None);
        };
        let latest = info.latest_date;

        // Sole gate against redundant fetches.
        if today <= latest {
            return Ok(None);
        }

        let fetch_start = latest + Days::new(1);
        let fetched = self
            .source
            .fetch_observations(spec.source_id, fetch_start, today)?;
        if fetched.is_empty() {
            return Ok(None);
        }

        match spec.kind {
            SeriesKind::Direct => self.merge_direct(spec, metadata, &fetched),
            SeriesKind::Interpolated => {
                self.reinterpolate(spec, metadata, today, reference_dates, &fetched)
            }
            SeriesKind::Derived { .. } => unreachable!("derived handled above"),
        }
    }

    /// Append-only merge for daily series. Existing dates win on collision;
    /// the fetch nominally starts the day after the stored history, so a
    /// collision is a duplicate to discard, not a correction.
    fn merge_direct(
        &self,
        spec: &SeriesSpec,
        metadata: &mut Metadata,
        fetched: &[Observation],
    ) -> Result<Option<usize>, AppError> {
        let existing = self.store.load_series_or_empty(spec.key)?;
        let existing_dates: BTreeSet<NaiveDate> = existing.iter().map(|p| p.date).collect();

        let new_points: Vec<Observation> = fetched
            .iter()
            .filter(|p| !existing_dates.contains(&p.date))
            .copied()
            .collect();
        if new_points.is_empty() {
            return Ok(None);
        }

        let mut merged = existing;
        merged.extend(new_points.iter().copied());
        merged.sort_by_key(|p| p.date);

        self.store.write_series(spec.key, &merged)?;
        update_series_meta(metadata, spec, &merged);

        println!("{}: added {} new records", spec.name, new_points.len());
        Ok(Some(new_points.len()))
    }

    /// Merge new monthly points into the raw history, persist it, and
    /// regenerate the daily series in full from that history.
    ///
    /// The daily output is always rebuilt from the complete raw set — never
    /// appended to — so repeated incremental runs cannot drift away from a
    /// from-scratch rebuild.
    fn reinterpolate(
        &self,
        spec: &SeriesSpec,
        metadata: &mut Metadata,
        today: NaiveDate,
        reference_dates: &[NaiveDate],
        fetched: &[Observation],
    ) -> Result<Option<usize>, AppError> {
        let raw_key = spec.raw_key();
        let existing_raw = self.store.load_series_or_empty(&raw_key)?;
        let merged_raw = interp::merge_by_date(&existing_raw, fetched);
        self.store.write_series(&raw_key, &merged_raw)?;

        if reference_dates.is_empty() {
            eprintln!(
                "No reference dates available for {}; keeping previous interpolation",
                spec.name
            );
            return Ok(None);
        }

        // Inflation series arrive as index levels; convert to a
        // year-over-year rate before interpolating.
        let points = if spec.category == Category::Inflation {
            interp::year_over_year_change(&merged_raw)
        } else {
            merged_raw.clone()
        };

        let daily = interp::interpolate_range(&points, self.start_date, today, Some(reference_dates));
        if daily.is_empty() {
            eprintln!(
                "Interpolation produced no points for {}; keeping previous state",
                spec.name
            );
            return Ok(None);
        }

        self.store.write_series(spec.key, &daily)?;
        update_series_meta(metadata, spec, &daily);

        println!(
            "{}: reinterpolated with {} new monthly records ({} daily rows)",
            spec.name,
            fetched.len(),
            daily.len()
        );
        Ok(Some(fetched.len()))
    }

    /// Second pass: recompute each derived spread whose inputs changed this
    /// run. Runs after the main loop so both inputs are finalized.
    fn recompute_derived(&self, metadata: &mut Metadata, summary: &mut UpdateSummary) {
        for spec in registry::ALL_SERIES {
            let SeriesKind::Derived { minuend, subtrahend } = spec.kind else {
                continue;
            };
            let inputs_changed = summary
                .series_updated
                .iter()
                .any(|k| k == minuend || k == subtrahend);
            if !inputs_changed {
                continue;
            }

            if let Err(err) = self.write_spread(spec, minuend, subtrahend, metadata) {
                eprintln!("Could not recompute {}: {err}", spec.name);
                continue;
            }

            if !summary.series_updated.iter().any(|k| k == spec.key) {
                summary.series_updated.push(spec.key.to_string());
            }
            summary.updated = true;
        }
    }

    fn write_spread(
        &self,
        spec: &SeriesSpec,
        minuend: &str,
        subtrahend: &str,
        metadata: &mut Metadata,
    ) -> Result<(), AppError> {
        let a = self.store.load_series(minuend)?;
        let b = self.store.load_series(subtrahend)?;
        let spread = compute_spread(&a, &b);

        self.store.write_series(spec.key, &spread)?;
        metadata.series_info.insert(
            spec.key.to_string(),
            SeriesMeta {
                latest_date: spread.last().map(|p| p.date).unwrap_or(self.start_date),
                record_count: spread.len(),
                source_id: spec.source_id.to_string(),
            },
        );

        println!("{}: {} records calculated", spec.name, spread.len());
        Ok(())
    }

    /// Full historical backfill from the configured start date.
    ///
    /// Fetches the reference series first so their dates seed the target
    /// axis, routes every non-derived series through the same category
    /// logic as the incremental path, computes the spread, and writes the
    /// metadata record from scratch. Any fetch failure here is fatal.
    pub fn backfill(&self, today: NaiveDate) -> Result<UpdateSummary, AppError> {
        self.store.ensure_dir()?;
        if let Some(path) = self.store.backup()? {
            println!("Existing data backed up to {}", path.display());
        }

        println!(
            "Starting full backfill: {} to {today}",
            self.start_date
        );

        let mut metadata = Metadata::new(today);

        // Reference pass: fetch the daily treasury series once; their
        // payloads are stored below and their dates form the target axis.
        let mut reference_data: HashMap<&'static str, Vec<Observation>> = HashMap::new();
        let mut reference_dates = BTreeSet::new();
        for key in registry::reference_keys() {
            let spec = registry::find(key).ok_or_else(|| {
                AppError::config(format!("Reference series '{key}' missing from catalog"))
            })?;
            let data = self
                .source
                .fetch_observations(spec.source_id, self.start_date, today)?;
            reference_dates.extend(data.iter().map(|p| p.date));
            reference_data.insert(key, data);
        }
        let reference_dates: Vec<NaiveDate> = reference_dates.into_iter().collect();
        println!(
            "Collected {} reference dates for interpolation alignment",
            reference_dates.len()
        );

        for spec in registry::ALL_SERIES {
            match spec.kind {
                SeriesKind::Derived { .. } => continue,
                SeriesKind::Direct => {
                    let data = match reference_data.remove(spec.key) {
                        Some(data) => data,
                        None => self
                            .source
                            .fetch_observations(spec.source_id, self.start_date, today)?,
                    };
                    self.store.write_series(spec.key, &data)?;
                    insert_backfill_meta(&mut metadata, spec, &data, self.start_date);
                    println!("{}: {} records", spec.name, data.len());
                }
                SeriesKind::Interpolated => {
                    let raw = self
                        .source
                        .fetch_observations(spec.source_id, self.start_date, today)?;
                    self.store.write_series(&spec.raw_key(), &raw)?;

                    let points = if spec.category == Category::Inflation {
                        interp::year_over_year_change(&raw)
                    } else {
                        raw.clone()
                    };
                    let daily = interp::interpolate_range(
                        &points,
                        self.start_date,
                        today,
                        Some(&reference_dates),
                    );
                    self.store.write_series(spec.key, &daily)?;
                    insert_backfill_meta(&mut metadata, spec, &daily, self.start_date);
                    println!(
                        "{}: {} raw monthly records, {} daily rows",
                        spec.name,
                        raw.len(),
                        daily.len()
                    );
                }
            }
        }

        for spec in registry::ALL_SERIES {
            let SeriesKind::Derived { minuend, subtrahend } = spec.kind else {
                continue;
            };
            if let Err(err) = self.write_spread(spec, minuend, subtrahend, &mut metadata) {
                eprintln!("Could not calculate {}: {err}", spec.name);
            }
        }

        self.store.write_metadata(&metadata)?;

        Ok(UpdateSummary {
            updated: true,
            series_updated: registry::ALL_SERIES
                .iter()
                .map(|s| s.key.to_string())
                .collect(),
            new_records: 0,
        })
    }
}

/// Inner join of two daily series on date: `a - b`, only where both have a
/// point. Dates present in one input only are dropped.
pub fn compute_spread(a: &[Observation], b: &[Observation]) -> Vec<Observation> {
    let b_by_date: HashMap<NaiveDate, f64> = b.iter().map(|p| (p.date, p.value)).collect();
    a.iter()
        .filter_map(|p| {
            b_by_date
                .get(&p.date)
                .map(|bv| Observation::new(p.date, p.value - bv))
        })
        .collect()
}

fn update_series_meta(metadata: &mut Metadata, spec: &SeriesSpec, data: &[Observation]) {
    if let Some(last) = data.last() {
        metadata.series_info.insert(
            spec.key.to_string(),
            SeriesMeta {
                latest_date: last.date,
                record_count: data.len(),
                source_id: spec.source_id.to_string(),
            },
        );
    }
}

fn insert_backfill_meta(
    metadata: &mut Metadata,
    spec: &SeriesSpec,
    data: &[Observation],
    fallback_date: NaiveDate,
) {
    metadata.series_info.insert(
        spec.key.to_string(),
        SeriesMeta {
            latest_date: data.last().map(|p| p.date).unwrap_or(fallback_date),
            record_count: data.len(),
            source_id: spec.source_id.to_string(),
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// In-memory fetch collaborator: serves date-windowed slices of fixed
    /// per-series data, optionally failing for chosen series ids.
    struct MapSource {
        data: HashMap<String, Vec<Observation>>,
        fail: HashSet<String>,
    }

    impl MapSource {
        fn new() -> Self {
            Self {
                data: HashMap::new(),
                fail: HashSet::new(),
            }
        }

        fn insert(&mut self, source_id: &str, points: Vec<Observation>) {
            self.data.insert(source_id.to_string(), points);
        }
    }

    impl ObservationSource for MapSource {
        fn fetch_observations(
            &self,
            source_id: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<Observation>, AppError> {
            if self.fail.contains(source_id) {
                return Err(AppError::fetch(format!("simulated outage for {source_id}")));
            }
            Ok(self
                .data
                .get(source_id)
                .map(|points| {
                    points
                        .iter()
                        .filter(|p| p.date >= start && p.date <= end)
                        .copied()
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    fn temp_store(tag: &str) -> DataStore {
        let dir = std::env::temp_dir().join(format!("fred-sync-sync-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        DataStore::new(dir)
    }

    fn start() -> NaiveDate {
        d(2023, 12, 1)
    }

    /// Source with enough data for every catalog series through 2024-01-04.
    fn seeded_source() -> MapSource {
        let mut source = MapSource::new();
        let daily_ids = [
            "DGS1", "DGS2", "DGS5", "DGS10", "DGS20", "VIXCLS", "GVZCLS", "DCOILWTICO",
            "DTWEXBGS", "DEXUSEU", "SP500",
        ];
        for (i, id) in daily_ids.iter().enumerate() {
            let base = 1.0 + i as f64;
            source.insert(
                id,
                vec![
                    Observation::new(d(2024, 1, 2), base),
                    Observation::new(d(2024, 1, 3), base + 0.1),
                    Observation::new(d(2024, 1, 4), base + 0.2),
                ],
            );
        }
        // Monthly index series (inflation: index levels, not rates).
        for id in ["CPIAUCSL", "CPILFESL"] {
            source.insert(
                id,
                vec![
                    Observation::new(d(2023, 12, 1), 100.0),
                    Observation::new(d(2024, 1, 1), 101.0),
                ],
            );
        }
        source.insert(
            "UNRATE",
            vec![
                Observation::new(d(2023, 12, 1), 3.7),
                Observation::new(d(2024, 1, 1), 3.8),
            ],
        );
        source
    }

    #[test]
    fn bootstrap_run_backfills_everything() {
        let store = temp_store("bootstrap");
        let source = seeded_source();
        let sync = Synchronizer::new(&source, &store, start());

        let summary = sync.run(d(2024, 1, 4)).unwrap();
        assert!(summary.updated);
        assert_eq!(summary.series_updated.len(), registry::ALL_SERIES.len());

        let metadata = store.load_metadata().unwrap().unwrap();
        assert_eq!(metadata.last_updated, d(2024, 1, 4));

        // Every stored series file agrees with its metadata entry.
        for spec in registry::ALL_SERIES {
            let data = store.load_series(spec.key).unwrap();
            let info = &metadata.series_info[spec.key];
            assert_eq!(info.record_count, data.len(), "{}", spec.key);
            if let Some(last) = data.last() {
                assert_eq!(info.latest_date, last.date, "{}", spec.key);
            }
        }

        // Interpolated series align exactly with the reference axis.
        let cpi = store.load_series("cpi").unwrap();
        let dates: Vec<NaiveDate> = cpi.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 4)]);

        // Raw monthly history persisted alongside.
        let raw = store.load_series("cpi_monthly").unwrap();
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn second_run_with_no_new_data_is_a_no_op() {
        let store = temp_store("idempotent");
        let source = seeded_source();
        let sync = Synchronizer::new(&source, &store, start());

        sync.run(d(2024, 1, 4)).unwrap();
        let metadata_before = store.load_metadata().unwrap().unwrap();
        let spread_before = store.load_series("yield_curve_spread").unwrap();

        let summary = sync.run(d(2024, 1, 5)).unwrap();
        assert!(!summary.updated);
        assert!(summary.series_updated.is_empty());
        assert_eq!(summary.new_records, 0);

        // Metadata untouched, including lastUpdated.
        let metadata_after = store.load_metadata().unwrap().unwrap();
        assert_eq!(metadata_after, metadata_before);
        assert_eq!(store.load_series("yield_curve_spread").unwrap(), spread_before);
    }

    #[test]
    fn direct_merge_appends_and_keeps_existing_values() {
        let store = temp_store("direct-merge");
        let mut source = seeded_source();
        let sync = Synchronizer::new(&source, &store, start());
        sync.run(d(2024, 1, 4)).unwrap();

        let before = store.load_series("vix").unwrap();

        // Wind the metadata back a day so the next fetch window overlaps the
        // stored history; the refetched 2024-01-04 revision must be ignored
        // in favor of the stored value.
        let mut metadata = store.load_metadata().unwrap().unwrap();
        if let Some(info) = metadata.series_info.get_mut("vix") {
            info.latest_date = d(2024, 1, 3);
        }
        store.write_metadata(&metadata).unwrap();

        source.insert(
            "VIXCLS",
            vec![
                Observation::new(d(2024, 1, 4), 99.9),
                Observation::new(d(2024, 1, 5), 14.2),
            ],
        );
        let sync = Synchronizer::new(&source, &store, start());
        let summary = sync.run(d(2024, 1, 5)).unwrap();

        assert!(summary.series_updated.contains(&"vix".to_string()));
        let after = store.load_series("vix").unwrap();
        assert_eq!(after.len(), before.len() + 1);
        // The existing 2024-01-04 value wins over the refetched one.
        let jan4 = after.iter().find(|p| p.date == d(2024, 1, 4)).unwrap();
        assert_eq!(jan4.value, before.last().unwrap().value);
        assert_eq!(after.last().unwrap().date, d(2024, 1, 5));
    }

    #[test]
    fn interpolated_series_rewrites_from_merged_raw() {
        let store = temp_store("reinterp");
        let mut source = seeded_source();
        let sync = Synchronizer::new(&source, &store, start());
        sync.run(d(2024, 1, 4)).unwrap();

        // A new monthly employment point lands.
        source.insert(
            "UNRATE",
            vec![
                Observation::new(d(2023, 12, 1), 3.7),
                Observation::new(d(2024, 1, 1), 3.8),
                Observation::new(d(2024, 2, 1), 3.9),
            ],
        );
        let sync = Synchronizer::new(&source, &store, start());
        let summary = sync.run(d(2024, 2, 1)).unwrap();

        assert!(summary.series_updated.contains(&"unemployment_rate".to_string()));
        // One new raw monthly record counted, not the daily row count.
        assert_eq!(summary.new_records, 1);

        let raw = store.load_series("unemployment_rate_monthly").unwrap();
        assert_eq!(raw.len(), 3);
        assert_eq!(raw.last().unwrap().date, d(2024, 2, 1));

        // The daily series is still aligned to the reference axis and its
        // metadata matches the file.
        let daily = store.load_series("unemployment_rate").unwrap();
        let metadata = store.load_metadata().unwrap().unwrap();
        let info = &metadata.series_info["unemployment_rate"];
        assert_eq!(info.record_count, daily.len());
        assert_eq!(info.latest_date, daily.last().unwrap().date);
    }

    #[test]
    fn derived_spread_is_inner_join_of_inputs() {
        let a = vec![
            Observation::new(d(2024, 1, 1), 5.0),
            Observation::new(d(2024, 1, 2), 5.2),
        ];
        let b = vec![Observation::new(d(2024, 1, 1), 2.0)];

        let spread = compute_spread(&a, &b);
        assert_eq!(spread.len(), 1);
        assert_eq!(spread[0].date, d(2024, 1, 1));
        assert!((spread[0].value - 3.0).abs() < 1e-12);
    }

    #[test]
    fn spread_recomputed_when_an_input_changes() {
        let store = temp_store("spread");
        let mut source = seeded_source();
        let sync = Synchronizer::new(&source, &store, start());
        sync.run(d(2024, 1, 4)).unwrap();

        // Only the 10Y gains a new day; the spread must drop it (no 2Y
        // value for that date yet).
        source.insert(
            "DGS10",
            vec![Observation::new(d(2024, 1, 5), 4.5)],
        );
        let sync = Synchronizer::new(&source, &store, start());
        let summary = sync.run(d(2024, 1, 5)).unwrap();

        assert!(summary.series_updated.contains(&"yield_curve_spread".to_string()));
        let spread = store.load_series("yield_curve_spread").unwrap();
        assert_eq!(spread.last().unwrap().date, d(2024, 1, 4));

        let metadata = store.load_metadata().unwrap().unwrap();
        let info = &metadata.series_info["yield_curve_spread"];
        assert_eq!(info.record_count, spread.len());
        assert_eq!(info.source_id, "T10Y2Y (calculated)");
    }

    #[test]
    fn one_failing_series_does_not_abort_the_run() {
        let store = temp_store("isolation");
        let mut source = seeded_source();
        let sync = Synchronizer::new(&source, &store, start());
        sync.run(d(2024, 1, 4)).unwrap();

        let oil_before = store.load_series("oil_price").unwrap();

        // Oil goes dark; VIX has a fresh day.
        source.fail.insert("DCOILWTICO".to_string());
        source.insert("VIXCLS", vec![Observation::new(d(2024, 1, 5), 15.0)]);
        let sync = Synchronizer::new(&source, &store, start());
        let summary = sync.run(d(2024, 1, 5)).unwrap();

        assert!(summary.updated);
        assert!(summary.series_updated.contains(&"vix".to_string()));
        assert!(!summary.series_updated.contains(&"oil_price".to_string()));
        assert_eq!(store.load_series("oil_price").unwrap(), oil_before);
    }

    #[test]
    fn empty_reference_axis_keeps_daily_series_untouched() {
        let store = temp_store("no-axis");
        let mut source = seeded_source();
        let sync = Synchronizer::new(&source, &store, start());
        sync.run(d(2024, 1, 4)).unwrap();

        // Strip every treasury entry so the axis collection finds nothing.
        let mut metadata = store.load_metadata().unwrap().unwrap();
        for key in registry::reference_keys() {
            metadata.series_info.remove(key);
        }
        store.write_metadata(&metadata).unwrap();

        let cpi_before = store.load_series("cpi").unwrap();
        let cpi_meta_before = metadata.series_info["cpi"].clone();

        // A new monthly point lands, but with no axis to interpolate onto
        // only the raw history may change.
        source.insert(
            "CPIAUCSL",
            vec![
                Observation::new(d(2023, 12, 1), 100.0),
                Observation::new(d(2024, 1, 1), 101.0),
                Observation::new(d(2024, 2, 1), 102.0),
            ],
        );
        let sync = Synchronizer::new(&source, &store, start());
        let summary = sync.run(d(2024, 2, 1)).unwrap();

        assert!(!summary.series_updated.contains(&"cpi".to_string()));
        assert_eq!(store.load_series("cpi").unwrap(), cpi_before);

        let metadata = store.load_metadata().unwrap().unwrap();
        assert_eq!(metadata.series_info["cpi"], cpi_meta_before);

        // The raw monthly history still absorbed the new point.
        let raw = store.load_series("cpi_monthly").unwrap();
        assert_eq!(raw.len(), 3);
        assert_eq!(raw.last().unwrap().date, d(2024, 2, 1));
    }

    #[test]
    fn series_without_metadata_entry_is_skipped() {
        let store = temp_store("no-meta");
        let source = seeded_source();
        let sync = Synchronizer::new(&source, &store, start());
        sync.run(d(2024, 1, 4)).unwrap();

        // Drop one entry from metadata; the next run must leave that series
        // untouched rather than guessing a fetch window.
        let mut metadata = store.load_metadata().unwrap().unwrap();
        metadata.series_info.remove("gvz");
        store.write_metadata(&metadata).unwrap();
        let gvz_before = store.load_series("gvz").unwrap();

        let mut source = seeded_source();
        source.insert("GVZCLS", vec![Observation::new(d(2024, 1, 5), 20.0)]);
        let sync = Synchronizer::new(&source, &store, start());
        let summary = sync.run(d(2024, 1, 5)).unwrap();

        assert!(!summary.series_updated.contains(&"gvz".to_string()));
        assert_eq!(store.load_series("gvz").unwrap(), gvz_before);
    }
}
