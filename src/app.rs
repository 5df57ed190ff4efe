//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds the FRED client and store
//! - runs the synchronizer (incremental or backfill)
//! - prints freshness/synchronization reports

use chrono::Local;
use clap::Parser;

use crate::cli::{Command, DataArgs};
use crate::data::FredClient;
use crate::error::AppError;
use crate::report;
use crate::store::DataStore;
use crate::sync::Synchronizer;

/// Entry point for the `fredsync` binary.
pub fn run() -> Result<(), AppError> {
    // We want a bare `fredsync` to behave like `fredsync sync`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Sync(args) => handle_sync(&args),
        Command::Backfill(args) => handle_backfill(&args),
        Command::Status(args) => handle_status(&args),
    }
}

fn handle_sync(args: &DataArgs) -> Result<(), AppError> {
    let client = FredClient::from_env()?;
    let store = DataStore::new(&args.data_dir);
    let sync = Synchronizer::new(&client, &store, args.start_date);

    let today = Local::now().date_naive();
    let summary = sync.run(today)?;

    println!("{}", report::format_update_summary(&summary));
    Ok(())
}

fn handle_backfill(args: &DataArgs) -> Result<(), AppError> {
    let client = FredClient::from_env()?;
    let store = DataStore::new(&args.data_dir);
    let sync = Synchronizer::new(&client, &store, args.start_date);

    let today = Local::now().date_naive();
    let summary = sync.backfill(today)?;

    println!("{}", report::format_update_summary(&summary));
    Ok(())
}

fn handle_status(args: &DataArgs) -> Result<(), AppError> {
    let store = DataStore::new(&args.data_dir);
    let metadata = store.load_metadata()?.ok_or_else(|| {
        AppError::store("No metadata found; run `fredsync backfill` (or `fredsync sync`) first.")
    })?;

    let today = Local::now().date_naive();
    let freshness = report::data_freshness(&metadata, today);
    println!("{}", report::format_freshness(&freshness));

    if let Some(sync_report) = report::check_synchronization(&metadata) {
        println!("{}", report::format_sync_report(&sync_report, today));
    }

    Ok(())
}

/// Rewrite argv so `fredsync` defaults to `fredsync sync`.
///
/// Rules:
/// - `fredsync`                    -> `fredsync sync`
/// - `fredsync --data-dir X ...`   -> `fredsync sync --data-dir X ...`
/// - `fredsync --help/--version`   -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("sync".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "sync" | "backfill" | "status");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "sync flags".
    if arg1.starts_with('-') {
        argv.insert(1, "sync".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_sync() {
        assert_eq!(rewrite_args(args(&["fredsync"])), args(&["fredsync", "sync"]));
    }

    #[test]
    fn leading_flag_is_treated_as_sync_flags() {
        assert_eq!(
            rewrite_args(args(&["fredsync", "--data-dir", "d"])),
            args(&["fredsync", "sync", "--data-dir", "d"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["fredsync", "status"])),
            args(&["fredsync", "status"])
        );
        assert_eq!(
            rewrite_args(args(&["fredsync", "--help"])),
            args(&["fredsync", "--help"])
        );
    }
}
