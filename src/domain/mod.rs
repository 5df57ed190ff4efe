//! Domain types used throughout the sync pipeline.
//!
//! This module defines:
//!
//! - the basic time-series point (`Observation`)
//! - series catalog entries (`SeriesSpec`, `SeriesKind`, `Category`)
//! - persisted metadata (`Metadata`, `SeriesMeta`)
//! - sync run outputs (`UpdateSummary`)

pub mod types;

pub use types::*;
