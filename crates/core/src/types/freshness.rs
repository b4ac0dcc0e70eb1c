//! Days-left arithmetic and freshness buckets for fridge rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days until `expires_on`, rounded up.
///
/// Anything expiring later today counts as one day left; a timestamp in the
/// past yields zero or a negative count.
#[must_use]
pub fn days_left(expires_on: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (expires_on - now).num_seconds();
    seconds.div_euclid(SECONDS_PER_DAY) + i64::from(seconds.rem_euclid(SECONDS_PER_DAY) != 0)
}

/// How close a row is to expiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// No expiry date recorded.
    Unknown,
    /// Already past its expiry.
    Expired,
    /// Two days or fewer left.
    Urgent,
    /// Five days or fewer left.
    Soon,
    Fresh,
}

impl Freshness {
    /// Classify a row from its (optional) expiry.
    #[must_use]
    pub fn classify(expires_on: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match expires_on.map(|at| days_left(at, now)) {
            None => Self::Unknown,
            Some(days) if days < 0 => Self::Expired,
            Some(days) if days <= 2 => Self::Urgent,
            Some(days) if days <= 5 => Self::Soon,
            Some(_) => Self::Fresh,
        }
    }
}

impl std::fmt::Display for Freshness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Expired => write!(f, "expired"),
            Self::Urgent => write!(f, "urgent"),
            Self::Soon => write!(f, "soon"),
            Self::Fresh => write!(f, "fresh"),
        }
    }
}

/// Human label such as "1 day left", "3 days left" or "Expired".
#[must_use]
pub fn describe_days_left(days: i64) -> String {
    match days {
        d if d < 0 => "Expired".to_string(),
        1 => "1 day left".to_string(),
        d => format!("{d} days left"),
    }
}
