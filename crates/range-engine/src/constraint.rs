//! Range constraint validation.
//!
//! A [`Violation`] is a normal return value, not an error: the UI renders
//! it as an inline message and disables the Apply action. Rules run in a
//! fixed order and the first hit wins, so the user always sees a single
//! deterministic message. The only `Err` out of this module is an
//! unresolvable timezone on the range being checked.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::error::RangeError;
use crate::selection::DateTimeRange;

// ── Constraints ─────────────────────────────────────────────────────────────

/// Limits a candidate range is checked against. Immutable input, supplied
/// per invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Earliest selectable instant.
    #[serde(default)]
    pub min: Option<DateTime<Utc>>,
    /// Latest selectable instant.
    #[serde(default)]
    pub max: Option<DateTime<Utc>>,
    /// Calendar dates (zone-relative) that cannot be part of any range.
    #[serde(default)]
    pub blackouts: BTreeSet<NaiveDate>,
    /// Shortest allowed `end - start`, in whole seconds over serde.
    #[serde(default, with = "opt_duration_secs")]
    pub min_duration: Option<Duration>,
    /// Longest allowed `end - start`, in whole seconds over serde.
    #[serde(default, with = "opt_duration_secs")]
    pub max_duration: Option<Duration>,
}

/// The first rule a candidate range violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    BelowMinimum,
    AboveMaximum,
    ContainsBlackout,
    TooShort,
    TooLong,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::BelowMinimum => write!(f, "selection starts before the earliest allowed date"),
            Violation::AboveMaximum => write!(f, "selection ends after the latest allowed date"),
            Violation::ContainsBlackout => write!(f, "selection contains an unavailable date"),
            Violation::TooShort => write!(f, "selection is shorter than the minimum duration"),
            Violation::TooLong => write!(f, "selection is longer than the maximum duration"),
        }
    }
}

// ── Validation ──────────────────────────────────────────────────────────────

/// Check a range against constraints, returning the first violated rule.
///
/// Rule order: minimum bound, maximum bound, blackout dates, minimum
/// duration, maximum duration. A partial range (either endpoint absent)
/// is never flagged. Blackout containment compares zoned calendar dates
/// in the range's timezone, not instants.
///
/// Pure function, intended to run on every candidate mutation so the UI
/// can show live feedback.
///
/// # Errors
///
/// Returns [`RangeError::InvalidTimezone`] if the range's timezone does
/// not resolve (only reachable when blackouts are configured).
pub fn validate(
    range: &DateTimeRange,
    constraints: &Constraints,
) -> Result<Option<Violation>, RangeError> {
    let (start, end) = match (range.start, range.end) {
        (Some(start), Some(end)) => (start, end),
        _ => return Ok(None),
    };

    if let Some(min) = constraints.min {
        if start < min {
            return Ok(Some(Violation::BelowMinimum));
        }
    }
    if let Some(max) = constraints.max {
        if end > max {
            return Ok(Some(Violation::AboveMaximum));
        }
    }
    if !constraints.blackouts.is_empty() {
        let tz = clock::parse_timezone(&range.timezone)?;
        let first = start.with_timezone(&tz).date_naive();
        let last = end.with_timezone(&tz).date_naive();
        if first <= last && constraints.blackouts.range(first..=last).next().is_some() {
            return Ok(Some(Violation::ContainsBlackout));
        }
    }

    let span = end - start;
    if let Some(min_duration) = constraints.min_duration {
        if span < min_duration {
            return Ok(Some(Violation::TooShort));
        }
    }
    if let Some(max_duration) = constraints.max_duration {
        if span > max_duration {
            return Ok(Some(Violation::TooLong));
        }
    }
    Ok(None)
}

/// Whether a day cell is unselectable: before the minimum, after the
/// maximum, or on a blackout date (compared by zoned calendar date).
///
/// The rendering layer uses this to gray cells out; the selection engine
/// uses it to turn clicks on such cells into no-ops.
///
/// # Errors
///
/// Returns [`RangeError::InvalidTimezone`] if `timezone` does not resolve
/// (only reachable when blackouts are configured).
pub fn is_date_disabled(
    date: DateTime<Utc>,
    constraints: &Constraints,
    timezone: &str,
) -> Result<bool, RangeError> {
    if constraints.min.is_some_and(|min| date < min) {
        return Ok(true);
    }
    if constraints.max.is_some_and(|max| date > max) {
        return Ok(true);
    }
    if constraints.blackouts.is_empty() {
        return Ok(false);
    }
    let tz = clock::parse_timezone(timezone)?;
    Ok(constraints
        .blackouts
        .contains(&date.with_timezone(&tz).date_naive()))
}

// ── Serde helpers ───────────────────────────────────────────────────────────

/// `Option<Duration>` as whole seconds, the shape the wasm boundary speaks.
mod opt_duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.map(|d| d.num_seconds()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<i64>::deserialize(deserializer)?.map(Duration::seconds))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
