//! Human-readable rendering of a scan report

use crate::locator::profiles_dir;
use crate::models::{EvaluatedIdentity, ScanReport};
use crate::utils::{format_path_with_tilde, sanitize_label};

/// Print a `check` report: diagnostics to stderr, owner lines to stdout
pub fn print_check(report: &ScanReport, unknown_is_stale: bool, debug: bool) {
    let threshold_days = report.threshold.num_days();

    if report.no_stores_found() {
        eprintln!("jeveassets-companion: no profile found.");
        eprintln!("  Looked in: {}", format_path_with_tilde(&profiles_dir(&report.data_dir)));
        return;
    }

    eprintln!(
        "Using profile data in: {} ({} store(s), {} skipped)",
        format_path_with_tilde(&profiles_dir(&report.data_dir)),
        report.stores_examined(),
        report.stores_skipped()
    );
    if debug {
        print_store_diagnostics(report);
    }

    if report.all_stores_skipped() {
        eprintln!("jeveassets-companion: none of the profile stores could be read.");
        if !debug {
            eprintln!("  Is jEveAssets holding them locked? Run with --debug for details.");
        }
        return;
    }

    if report.identities.is_empty() {
        println!("No ESI owners found in profile (or all invalid).");
        return;
    }

    let stale: Vec<&EvaluatedIdentity> = report.stale().collect();
    let unknown: Vec<&EvaluatedIdentity> = report.unknown().collect();

    if !stale.is_empty() {
        println!();
        println!("  *** jEveAssets ESI Token Alert ***");
        println!();
        println!(
            "  {} character(s) have not been updated in at least {} days.",
            stale.len(),
            threshold_days
        );
        println!("  Please open jEveAssets and refresh your data, or re-authorize ESI if needed.");
        println!();
        for identity in &stale {
            println!("    - {}: last update {}", label(identity, debug), age_text(identity));
        }
        println!();
    }

    if !unknown.is_empty() {
        let note = if unknown_is_stale { " (counted as stale)" } else { "" };
        println!("  {} character(s) have no recorded update{}:", unknown.len(), note);
        for identity in &unknown {
            println!("    - {}", label(identity, debug));
        }
        println!();
    }

    if stale.is_empty() {
        for identity in report.identities.iter().filter(|i| !i.is_unknown()) {
            println!("  {}: OK (last update {})", label(identity, debug), age_text(identity));
        }
    }
}

fn print_store_diagnostics(report: &ScanReport) {
    for store in &report.stores {
        eprintln!(
            "  store: {} ({}, modified {})",
            format_path_with_tilde(&store.path),
            store.format.label(),
            store.modified.format("%Y-%m-%d %H:%M:%S")
        );
    }
    for skip in &report.skipped {
        eprintln!("  skipped: {} [{}] {}", format_path_with_tilde(&skip.path), skip.kind, skip.reason);
    }
}

fn label(identity: &EvaluatedIdentity, debug: bool) -> String {
    let name = sanitize_label(&identity.identity.name);
    match (debug, identity.identity.ambiguous) {
        (true, true) => format!("{} [{}, conflicting records]", name, identity.identity.id),
        (true, false) => format!("{} [{}]", name, identity.identity.id),
        _ => name,
    }
}

/// "3 days ago", with future timestamps shown as "0 days ago"
pub fn age_text(identity: &EvaluatedIdentity) -> String {
    match identity.days_ago() {
        Some(days) => format!("{:.0} days ago", days.max(0.0)),
        None => "never".to_string(),
    }
}
