//! `fred-sync` library crate.
//!
//! The binary (`fredsync`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., a future dashboard server or scheduler)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod interp;
pub mod registry;
pub mod report;
pub mod store;
pub mod sync;
