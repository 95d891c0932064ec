//! Report assembly: extraction, merge and evaluation

use std::any::Any;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration as StdDuration, Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use super::ScanOptions;
use crate::detector::detect_format;
use crate::error::{FailureKind, ScanError, StoreError};
use crate::evaluator::evaluate;
use crate::extractors::source_for;
use crate::locator::{StoreCandidate, locate_stores};
use crate::models::{DataStore, EvaluatedIdentity, Identity, ScanReport, SkippedStore, StoreFormat};

/// What one store contributed to a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOutcome {
    pub store: DataStore,
    pub result: Result<Vec<Identity>, SkippedStore>,
}

/// Run one complete, blocking scan
///
/// Locates candidate stores under `options.data_dir`, extracts owners from
/// each in parallel, merges duplicates across stores and classifies every
/// owner against `options.threshold` as of `options.now`.
///
/// # Errors
///
/// Returns [`ScanError`] only when the data directory exists but cannot be
/// listed, or when an extractor panics. Every per-store failure is folded into
/// the report instead.
///
/// # Examples
///
/// ```no_run
/// use jeveassets_companion::scanner::{ScanOptions, run_scan};
///
/// let report = run_scan(&ScanOptions::new("/home/pilot/.jeveassets"))?;
/// println!("{} owners, {} stale", report.identities.len(), report.stale().count());
/// # Ok::<(), jeveassets_companion::error::ScanError>(())
/// ```
pub fn run_scan(options: &ScanOptions) -> Result<ScanReport, ScanError> {
    let candidates = locate_stores(&options.data_dir)?;

    let outcomes = candidates
        .par_iter()
        .map(|candidate| {
            panic::catch_unwind(AssertUnwindSafe(|| scan_store(candidate, options.store_timeout)))
                .map_err(|payload| ScanError::Fatal {
                    reason: format!(
                        "extractor panicked on {}: {}",
                        candidate.path.display(),
                        panic_message(payload.as_ref())
                    ),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let report = build_report(options, outcomes);
    info!(
        stores = report.stores_examined(),
        skipped = report.stores_skipped(),
        owners = report.identities.len(),
        stale = report.stale().count(),
        "scan complete"
    );
    Ok(report)
}

/// Assemble a report from per-store outcomes given in discovery order
pub fn build_report(options: &ScanOptions, outcomes: Vec<StoreOutcome>) -> ScanReport {
    let mut stores = Vec::with_capacity(outcomes.len());
    let mut skipped = Vec::new();
    let mut extracted = Vec::new();

    for outcome in outcomes {
        stores.push(outcome.store);
        match outcome.result {
            Ok(identities) => extracted.push(identities),
            Err(skip) => skipped.push(skip),
        }
    }

    let mut identities: Vec<EvaluatedIdentity> = merge_identities(extracted)
        .into_iter()
        .map(|identity| evaluate(identity, options.now, options.threshold))
        .collect();
    identities.sort_by(report_order);

    ScanReport {
        data_dir: options.data_dir.clone(),
        scanned_at: options.now,
        threshold: options.threshold,
        stores,
        skipped,
        identities,
    }
}

/// Deduplicate identities by identifier
///
/// - a present timestamp always beats an absent one, whichever store it came from
/// - between two timestamps the later one wins
/// - equal timestamps (or both absent) with different names keep the first
///   record seen and mark it ambiguous
pub fn merge_identities(batches: impl IntoIterator<Item = Vec<Identity>>) -> Vec<Identity> {
    let mut merged: Vec<Identity> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for identity in batches.into_iter().flatten() {
        match positions.get(&identity.id) {
            Some(&idx) => resolve_duplicate(&mut merged[idx], identity),
            None => {
                positions.insert(identity.id.clone(), merged.len());
                merged.push(identity);
            }
        }
    }

    merged
}

fn resolve_duplicate(existing: &mut Identity, candidate: Identity) {
    match candidate.last_update.cmp(&existing.last_update) {
        // Option ordering puts None below any Some
        Ordering::Greater => *existing = candidate,
        Ordering::Less => {}
        Ordering::Equal => {
            if candidate.name != existing.name {
                debug!(
                    id = %existing.id,
                    kept = %existing.name,
                    other = %candidate.name,
                    "conflicting owner records with equal timestamps"
                );
                existing.ambiguous = true;
            }
        }
    }
}

fn report_order(a: &EvaluatedIdentity, b: &EvaluatedIdentity) -> Ordering {
    a.identity
        .name
        .to_lowercase()
        .cmp(&b.identity.name.to_lowercase())
        .then_with(|| a.identity.id.cmp(&b.identity.id))
}

fn scan_store(candidate: &StoreCandidate, timeout: StdDuration) -> StoreOutcome {
    let started = Instant::now();

    let format = match detect_format(&candidate.path) {
        Ok(format) => format,
        Err(err) => {
            let store = data_store(candidate, StoreFormat::Unknown);
            return StoreOutcome::from_error(store, err);
        }
    };
    let store = data_store(candidate, format);

    let Some(source) = source_for(&store, timeout) else {
        debug!(path = %store.path.display(), "skipping file with unrecognised format");
        let skip = SkippedStore {
            path: store.path.clone(),
            kind: FailureKind::UnknownFormat,
            reason: "not a SQLite or XML profile".to_string(),
        };
        return StoreOutcome { store, result: Err(skip) };
    };

    let result = source.extract().and_then(|identities| {
        let elapsed = started.elapsed();
        if elapsed > timeout {
            Err(StoreError::TimedOut { path: store.path.clone(), elapsed })
        } else {
            Ok(identities)
        }
    });

    match result {
        Ok(identities) => {
            debug!(
                path = %store.path.display(),
                format = store.format.label(),
                owners = identities.len(),
                "store scanned"
            );
            StoreOutcome { store, result: Ok(identities) }
        }
        Err(err) => StoreOutcome::from_error(store, err),
    }
}

impl StoreOutcome {
    fn from_error(store: DataStore, err: StoreError) -> Self {
        debug!(path = %store.path.display(), kind = %err.kind(), "skipping store: {}", err);
        let skip = SkippedStore { path: store.path.clone(), kind: err.kind(), reason: err.to_string() };
        Self { store, result: Err(skip) }
    }
}

fn data_store(candidate: &StoreCandidate, format: StoreFormat) -> DataStore {
    DataStore { path: candidate.path.clone(), format, modified: candidate.modified }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
