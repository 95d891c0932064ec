//! Age classification against a staleness threshold
//!
//! Evaluation is pure: the reference instant is always passed in, never read
//! from the wall clock here.

use chrono::{DateTime, Duration, Utc};

use crate::models::{EvaluatedIdentity, Freshness, Identity};

/// Default staleness threshold in days
pub const DEFAULT_WARN_DAYS: i64 = 14;

pub fn default_threshold() -> Duration {
    Duration::days(DEFAULT_WARN_DAYS)
}

/// Classify one identity
///
/// - no timestamp: [`Freshness::Unknown`] with no age
/// - `now - last_update >= threshold`: [`Freshness::Stale`]
/// - otherwise [`Freshness::Fresh`] (including timestamps in the future)
pub fn evaluate(identity: Identity, now: DateTime<Utc>, threshold: Duration) -> EvaluatedIdentity {
    let Some(last_update) = identity.last_update else {
        return EvaluatedIdentity { identity, age: None, freshness: Freshness::Unknown };
    };

    let age = now.signed_duration_since(last_update);
    let freshness = if age >= threshold { Freshness::Stale } else { Freshness::Fresh };
    EvaluatedIdentity { identity, age: Some(age), freshness }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_760_000_000_000).unwrap()
    }

    fn owner(last_update: Option<DateTime<Utc>>) -> Identity {
        Identity::new("1", "Pilot", last_update)
    }

    #[test]
    fn test_twenty_days_is_stale() {
        let result = evaluate(owner(Some(now() - Duration::days(20))), now(), default_threshold());
        assert_eq!(result.freshness, Freshness::Stale);
        assert_eq!(result.age, Some(Duration::days(20)));
        assert!((result.days_ago().unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_one_hour_is_fresh() {
        let result = evaluate(owner(Some(now() - Duration::hours(1))), now(), default_threshold());
        assert_eq!(result.freshness, Freshness::Fresh);
        assert!(!result.is_stale());
    }

    #[test]
    fn test_exactly_at_threshold_is_stale() {
        let threshold = Duration::days(14);
        let result = evaluate(owner(Some(now() - threshold)), now(), threshold);
        assert!(result.is_stale());

        let just_under = evaluate(
            owner(Some(now() - threshold + Duration::milliseconds(1))),
            now(),
            threshold,
        );
        assert!(!just_under.is_stale());
    }

    #[test]
    fn test_missing_timestamp_is_unknown_not_stale() {
        let result = evaluate(owner(None), now(), default_threshold());
        assert!(result.is_unknown());
        assert!(!result.is_stale());
        assert_eq!(result.age, None);
        assert_eq!(result.days_ago(), None);
    }

    #[test]
    fn test_future_timestamp_is_fresh() {
        let result = evaluate(owner(Some(now() + Duration::days(2))), now(), default_threshold());
        assert_eq!(result.freshness, Freshness::Fresh);
        assert!(result.age.unwrap() < Duration::zero());
    }

    #[test]
    fn test_classification_matches_threshold_grid() {
        for threshold_days in [0, 1, 7, 14, 30] {
            for age_hours in [0, 1, 23, 24, 24 * 7, 24 * 14, 24 * 31] {
                let threshold = Duration::days(threshold_days);
                let age = Duration::hours(age_hours);
                let result = evaluate(owner(Some(now() - age)), now(), threshold);
                assert_eq!(
                    result.is_stale(),
                    age >= threshold,
                    "threshold {}d, age {}h",
                    threshold_days,
                    age_hours
                );
                assert!(!result.is_unknown());
            }
        }
    }
}
