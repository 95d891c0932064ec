//! Aggregate state and reminder cadence for the background watcher
//!
//! A stale owner is alerted once, then again only after the reminder interval
//! has passed, for as long as it stays stale. Everything here takes the
//! current instant as a parameter.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::{EvaluatedIdentity, Freshness, ScanReport};
use crate::utils::sanitize_label;

/// Overall state shown by a tray-style front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallState {
    /// Every owner refreshed within the threshold
    Ok,
    /// At least one owner is stale
    Stale,
    /// Nothing stale, but some owners have no refresh time
    Attention,
    /// No profile store was found
    NoProfile,
    /// Profile stores exist but none could be read
    Unreadable,
}

impl OverallState {
    pub fn from_report(report: &ScanReport) -> Self {
        if report.no_stores_found() {
            OverallState::NoProfile
        } else if report.all_stores_skipped() {
            OverallState::Unreadable
        } else if report.has_stale() {
            OverallState::Stale
        } else if report.has_unknown() {
            OverallState::Attention
        } else {
            OverallState::Ok
        }
    }
}

/// Remembers when each owner was last alerted
#[derive(Debug, Clone)]
pub struct ReminderTracker {
    interval: Duration,
    last_alert: HashMap<String, DateTime<Utc>>,
}

impl ReminderTracker {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last_alert: HashMap::new() }
    }

    /// Owners that need an alert at `now`
    ///
    /// Stale owners always qualify; owners without a timestamp qualify only
    /// when `include_unknown` is set. An owner alerted less than one interval
    /// ago is held back.
    pub fn due<'a>(
        &self,
        report: &'a ScanReport,
        now: DateTime<Utc>,
        include_unknown: bool,
    ) -> Vec<&'a EvaluatedIdentity> {
        report
            .identities
            .iter()
            .filter(|i| i.is_stale() || (include_unknown && i.is_unknown()))
            .filter(|i| match self.last_alert.get(&i.identity.id) {
                Some(last) => now.signed_duration_since(*last) >= self.interval,
                None => true,
            })
            .collect()
    }

    /// Mark owners as alerted at `now`
    pub fn record<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>, now: DateTime<Utc>) {
        for id in ids {
            self.last_alert.insert(id.to_string(), now);
        }
    }

    /// Forget owners that are no longer stale so a relapse alerts immediately
    pub fn retain_stale(&mut self, report: &ScanReport) {
        self.last_alert.retain(|id, _| {
            report.identities.iter().any(|i| &i.identity.id == id && i.freshness != Freshness::Fresh)
        });
    }
}

/// One-line alert text for a batch of due owners
pub fn alert_message(due: &[&EvaluatedIdentity]) -> String {
    let parts: Vec<String> = due
        .iter()
        .map(|i| match i.days_ago() {
            Some(days) => format!("{}: {:.0} days", sanitize_label(&i.identity.name), days),
            None => format!("{}: never updated", sanitize_label(&i.identity.name)),
        })
        .collect();
    format!("{} - please refresh in jEveAssets.", parts.join(", "))
}
