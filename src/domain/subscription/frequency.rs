//! Subscription frequency and period arithmetic.
//!
//! The recurrence interval drives both renewal eligibility ("is this booking
//! older than one full period?") and the next-occurrence computation. Both
//! use the same fixed day counts so the two can never drift apart.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Timestamp, ValidationError};

/// Recurrence interval of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Every 7 days.
    Weekly,

    /// Every 14 days.
    Biweekly,

    /// Every 28 days. Fixed day-count, not a calendar month.
    Monthly,

    /// Single occurrence, never renewed.
    OneTime,
}

impl Frequency {
    /// Length of one full period in days.
    ///
    /// `OneTime` has no period; callers must check [`Self::is_recurring`]
    /// before relying on this value for renewal math.
    pub fn period_days(&self) -> i64 {
        match self {
            Frequency::Weekly => 7,
            Frequency::Biweekly => 14,
            Frequency::Monthly => 28,
            Frequency::OneTime => 0,
        }
    }

    /// Returns true if subscriptions with this frequency are renewal-eligible.
    pub fn is_recurring(&self) -> bool {
        !matches!(self, Frequency::OneTime)
    }

    /// Computes the next occurrence date by adding one full period.
    ///
    /// For `OneTime` the input date is returned unchanged; callers are
    /// expected to have filtered one-time subscriptions out beforehand.
    pub fn advance(&self, date: Timestamp) -> Timestamp {
        date.add_days(self.period_days())
    }

    /// Wire name, matching the persisted representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::OneTime => "one_time",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            "one_time" | "one-time" | "onetime" => Ok(Frequency::OneTime),
            other => Err(ValidationError::invalid_format(
                "frequency",
                format!("Unknown frequency: {}", other),
            )),
        }
    }
}
