//! JSON file persistence.
//!
//! Layout inside the data directory:
//!
//! - `<key>.json` — the daily observation sequence served to the dashboard
//! - `<key>_monthly.json` — raw monthly history backing interpolated series
//! - `metadata.json` — the single freshness record (`domain::Metadata`)
//!
//! The synchronizer is the sole writer; the dashboard reads these files
//! directly, so everything is written as pretty-printed JSON.

use std::fs::File;
use std::path::PathBuf;

use crate::domain::{Metadata, Observation};
use crate::error::AppError;

pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the data directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<(), AppError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::store(format!(
                "Failed to create data directory '{}': {e}",
                self.dir.display()
            ))
        })
    }

    pub fn series_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join("metadata.json")
    }

    /// Load a stored series; a missing file is an error.
    pub fn load_series(&self, key: &str) -> Result<Vec<Observation>, AppError> {
        let path = self.series_path(key);
        let file = File::open(&path).map_err(|e| {
            AppError::store(format!("Failed to open series '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(file)
            .map_err(|e| AppError::store(format!("Invalid series JSON '{}': {e}", path.display())))
    }

    /// Load a stored series, treating a missing file as empty.
    ///
    /// Used by merge paths that legitimately start from nothing; a present
    /// but unparsable file is still an error.
    pub fn load_series_or_empty(&self, key: &str) -> Result<Vec<Observation>, AppError> {
        let path = self.series_path(key);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::store(format!(
                    "Failed to open series '{}': {e}",
                    path.display()
                )));
            }
        };
        serde_json::from_reader(file)
            .map_err(|e| AppError::store(format!("Invalid series JSON '{}': {e}", path.display())))
    }

    pub fn write_series(&self, key: &str, data: &[Observation]) -> Result<(), AppError> {
        let path = self.series_path(key);
        let file = File::create(&path).map_err(|e| {
            AppError::store(format!("Failed to create series '{}': {e}", path.display()))
        })?;
        serde_json::to_writer_pretty(file, data)
            .map_err(|e| AppError::store(format!("Failed to write series '{}': {e}", path.display())))
    }

    /// Load the metadata record. `Ok(None)` when the file does not exist —
    /// that is the first-run signal that triggers a full backfill, not an
    /// error.
    pub fn load_metadata(&self) -> Result<Option<Metadata>, AppError> {
        let path = self.metadata_path();
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::store(format!(
                    "Failed to open metadata '{}': {e}",
                    path.display()
                )));
            }
        };
        let metadata = serde_json::from_reader(file)
            .map_err(|e| AppError::store(format!("Invalid metadata JSON '{}': {e}", path.display())))?;
        Ok(Some(metadata))
    }

    pub fn write_metadata(&self, metadata: &Metadata) -> Result<(), AppError> {
        let path = self.metadata_path();
        let file = File::create(&path).map_err(|e| {
            AppError::store(format!("Failed to create metadata '{}': {e}", path.display()))
        })?;
        serde_json::to_writer_pretty(file, metadata)
            .map_err(|e| AppError::store(format!("Failed to write metadata: {e}")))
    }

    /// Copy every existing `*.json` into `backup/<timestamp>/` before a
    /// backfill overwrites the store. Returns the backup path, or `None`
    /// when there was nothing to back up.
    pub fn backup(&self) -> Result<Option<PathBuf>, AppError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::store(format!(
                    "Failed to read data directory '{}': {e}",
                    self.dir.display()
                )));
            }
        };

        let json_files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .collect();

        if json_files.is_empty() {
            return Ok(None);
        }

        let timestamp = chrono::Local::now().format("%Y-%m-%dT%H-%M-%S");
        let backup_dir = self.dir.join("backup").join(timestamp.to_string());
        std::fs::create_dir_all(&backup_dir).map_err(|e| {
            AppError::store(format!(
                "Failed to create backup directory '{}': {e}",
                backup_dir.display()
            ))
        })?;

        for src in &json_files {
            if let Some(file_name) = src.file_name() {
                let dest = backup_dir.join(file_name);
                std::fs::copy(src, &dest).map_err(|e| {
                    AppError::store(format!("Failed to back up '{}': {e}", src.display()))
                })?;
            }
        }

        Ok(Some(backup_dir))
    }
}
