use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration as StdDuration;

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, info, warn};

use crate::alerts::{OverallState, ReminderTracker, alert_message};
use crate::cli::logging::init_logging;
use crate::cli::output::print_check;
use crate::config::{Settings, load_settings, load_settings_from};
use crate::models::ScanReport;
use crate::scanner::{ScanOptions, run_scan};
use crate::utils::{format_path_with_tilde, get_data_dir};

pub const EXIT_OK: u8 = 0;
pub const EXIT_STALE: u8 = 1;
pub const EXIT_NO_PROFILE: u8 = 2;
pub const EXIT_SCAN_FAILED: u8 = 3;

#[derive(Parser)]
#[command(name = "jeveassets-companion")]
#[command(version)]
#[command(about = "Warn when jEveAssets ESI owners have not been refreshed", long_about = None)]
pub struct Cli {
    /// Show per-store diagnostics and debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Read settings from this file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Alert when an owner is at least this many days old [default: 14]
    #[arg(long, value_name = "N")]
    pub days: Option<u32>,

    /// jEveAssets data directory [default: $JEVEASSETS_DATA/.jeveassets or ~/.jeveassets]
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Treat owners with no recorded update as stale
    #[arg(long)]
    pub unknown_is_stale: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check once and exit: 0 ok, 1 stale, 2 no profile found, 3 scan failed or nothing readable
    Check {
        #[command(flatten)]
        scan: ScanArgs,

        /// Print nothing; report through the exit code only
        #[arg(long, short)]
        quiet: bool,

        /// Print the full report as JSON
        #[arg(long, conflicts_with = "quiet")]
        json: bool,
    },
    /// Check periodically and log a reminder while owners stay stale
    Watch {
        #[command(flatten)]
        scan: ScanArgs,

        /// Seconds between checks [default: 3600]
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,

        /// Hours before a still-stale owner is reminded again [default: 24]
        #[arg(long, value_name = "HOURS")]
        reminder_hours: Option<u32>,

        /// Stop after this many checks
        #[arg(long, value_name = "N")]
        max_checks: Option<u32>,

        /// Append log output to this file as well
        #[arg(long, value_name = "FILE")]
        log_file: Option<PathBuf>,
    },
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let (default_level, log_file) = match &cli.command {
        Some(Commands::Watch { log_file, .. }) => {
            (if cli.debug { "debug" } else { "info" }, log_file.as_deref())
        }
        _ => (if cli.debug { "debug" } else { "warn" }, None),
    };
    init_logging(default_level, log_file)?;

    let settings = match &cli.config {
        Some(path) => load_settings_from(path),
        None => load_settings(),
    };

    match cli.command {
        Some(Commands::Check { scan, quiet, json }) => {
            check(&settings, &scan, quiet, json, cli.debug)
        }
        Some(Commands::Watch { scan, interval, reminder_hours, max_checks, .. }) => {
            let interval = interval
                .map(|secs| StdDuration::from_secs(secs.max(1)))
                .unwrap_or_else(|| settings.check_interval());
            let reminder = reminder_hours
                .map(|hours| Duration::hours(i64::from(hours.max(1))))
                .unwrap_or_else(|| settings.reminder_interval());
            watch(&settings, &scan, interval, reminder, max_checks)?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("Use --help for usage information");
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Map a finished report onto the `check` exit status
///
/// A report where every discovered store was skipped exits as a failed scan,
/// never as OK.
pub fn exit_status(report: &ScanReport, unknown_is_stale: bool) -> u8 {
    if report.no_stores_found() {
        EXIT_NO_PROFILE
    } else if report.all_stores_skipped() {
        EXIT_SCAN_FAILED
    } else if report.has_stale() || (unknown_is_stale && report.has_unknown()) {
        EXIT_STALE
    } else {
        EXIT_OK
    }
}

/// Command-line flags take precedence over the settings file
fn scan_options(settings: &Settings, args: &ScanArgs) -> Result<ScanOptions> {
    let explicit = args.data_dir.clone().or_else(|| settings.data_dir_override());
    let data_dir = get_data_dir(explicit.as_deref())?;
    let threshold = args
        .days
        .map(|days| Duration::days(i64::from(days)))
        .unwrap_or_else(|| settings.threshold());

    Ok(ScanOptions::new(data_dir)
        .with_threshold(threshold)
        .with_store_timeout(settings.store_timeout()))
}

fn check(
    settings: &Settings,
    args: &ScanArgs,
    quiet: bool,
    json: bool,
    debug: bool,
) -> Result<ExitCode> {
    let options = scan_options(settings, args)?;
    let unknown_is_stale = args.unknown_is_stale || settings.unknown_is_stale;

    let report = match run_scan(&options) {
        Ok(report) => report,
        Err(e) => {
            if !quiet {
                eprintln!("Error: {}", e);
            }
            return Ok(ExitCode::from(EXIT_SCAN_FAILED));
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !quiet {
        print_check(&report, unknown_is_stale, debug);
    }

    Ok(ExitCode::from(exit_status(&report, unknown_is_stale)))
}

fn watch(
    settings: &Settings,
    args: &ScanArgs,
    interval: StdDuration,
    reminder: Duration,
    max_checks: Option<u32>,
) -> Result<()> {
    let unknown_is_stale = args.unknown_is_stale || settings.unknown_is_stale;
    let mut tracker = ReminderTracker::new(reminder);
    let mut checks: u32 = 0;
    let mut last_state = None;

    info!(
        interval_secs = interval.as_secs(),
        reminder_hours = reminder.num_hours(),
        "watching jEveAssets profiles"
    );

    loop {
        let now = Utc::now();
        let options = scan_options(settings, args)?.with_now(now);

        match run_scan(&options) {
            Ok(report) => {
                let state = OverallState::from_report(&report);
                if last_state != Some(state) {
                    info!(
                        state = ?state,
                        data_dir = %format_path_with_tilde(&report.data_dir),
                        owners = report.identities.len(),
                        "profile state changed"
                    );
                    last_state = Some(state);
                }

                tracker.retain_stale(&report);
                let due = tracker.due(&report, now, unknown_is_stale);
                if due.is_empty() {
                    debug!(owners = report.identities.len(), "no reminders due");
                } else {
                    warn!(
                        "jEveAssets token alert: {} character(s) need a refresh: {}",
                        due.len(),
                        alert_message(&due)
                    );
                    tracker.record(due.iter().map(|i| i.identity.id.as_str()), now);
                }
            }
            Err(e) => error!("check failed: {}", e),
        }

        checks += 1;
        if max_checks.is_some_and(|max| checks >= max) {
            break;
        }
        thread::sleep(interval);
    }

    Ok(())
}
