use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};

/// One ESI owner as read from a profile store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    /// `None` when the owner was never refreshed or the stored value was unusable
    pub last_update: Option<DateTime<Utc>>,
    /// Set when stores disagreed and the conflict could not be resolved
    pub ambiguous: bool,
}

impl Identity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        last_update: Option<DateTime<Utc>>,
    ) -> Self {
        Self { id: id.into(), name: name.into(), last_update, ambiguous: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    Fresh,
    Stale,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluatedIdentity {
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(rename = "age_ms", serialize_with = "serialize_age")]
    pub age: Option<Duration>,
    pub freshness: Freshness,
}

impl EvaluatedIdentity {
    pub fn is_stale(&self) -> bool {
        self.freshness == Freshness::Stale
    }

    pub fn is_unknown(&self) -> bool {
        self.freshness == Freshness::Unknown
    }

    /// Age in fractional days, as shown to the user
    pub fn days_ago(&self) -> Option<f64> {
        let day_ms = Duration::days(1).num_milliseconds() as f64;
        self.age.map(|age| age.num_milliseconds() as f64 / day_ms)
    }
}

pub(crate) fn serialize_age<S>(age: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match age {
        Some(age) => serializer.serialize_some(&age.num_milliseconds()),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn serialize_duration<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(duration.num_milliseconds())
}
