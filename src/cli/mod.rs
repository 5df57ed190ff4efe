//! Command-line parsing for the FRED data synchronizer.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the sync/interpolation code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::registry;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fredsync", version, about = "Economic dashboard data synchronizer (FRED-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Incremental sync: fetch only data newer than the stored history.
    ///
    /// Falls back to a full backfill automatically when no metadata exists
    /// yet.
    Sync(DataArgs),
    /// Full historical backfill from the start date (backs up any existing
    /// data first).
    Backfill(DataArgs),
    /// Print the freshness and synchronization report without fetching.
    Status(DataArgs),
}

/// Options shared by all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct DataArgs {
    /// Directory holding per-series JSON files and metadata.json.
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Earliest date fetched during a full backfill (YYYY-MM-DD).
    #[arg(long, default_value = registry::DEFAULT_START_DATE)]
    pub start_date: NaiveDate,
}
