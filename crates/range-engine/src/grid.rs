//! Calendar month layout for a target timezone.
//!
//! A month view needs two things from the engine: the ordered instants of
//! each calendar day (one local midnight per day) and how many leading
//! blank cells align day 1 under its weekday column. Both are pure
//! functions of (year, month, timezone) — no cursor, no cached state.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

use crate::clock;
use crate::error::RangeError;

/// One instant per calendar day of the given zoned month, in order.
///
/// Each entry is local midnight of that day in `timezone`. When a forward
/// DST transition skips midnight itself (America/Sao_Paulo did this for
/// years), the entry is the first valid instant of that day instead.
///
/// # Errors
///
/// Returns [`RangeError::InvalidTimezone`] for an unknown zone, or
/// [`RangeError::InvalidDate`] if `month` is not 1-12.
pub fn days_of(year: i32, month: u32, timezone: &str) -> Result<Vec<DateTime<Utc>>, RangeError> {
    let tz = clock::parse_timezone(timezone)?;
    let count = days_in_month(year, month)?;
    let mut days = Vec::with_capacity(count as usize);
    for day in 1..=count {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| RangeError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))?;
        days.push(clock::resolve_local(date.and_time(NaiveTime::MIN), &tz)?);
    }
    Ok(days)
}

/// Number of leading blank cells before `first_day` in a Monday-first grid.
///
/// Computed from the zoned weekday of `first_day`, not its UTC weekday —
/// near month boundaries a large offset (Pacific vs. Kiribati) puts the
/// two on different days.
///
/// # Errors
///
/// Returns [`RangeError::InvalidTimezone`] if `timezone` is not a valid
/// IANA name.
pub fn weekday_offset(first_day: DateTime<Utc>, timezone: &str) -> Result<u32, RangeError> {
    let tz = clock::parse_timezone(timezone)?;
    Ok(first_day.with_timezone(&tz).weekday().num_days_from_monday())
}

/// Number of days in the given month (28-31).
///
/// # Errors
///
/// Returns [`RangeError::InvalidDate`] if `month` is not 1-12.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, RangeError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| RangeError::InvalidDate(format!("{year:04}-{month:02}")))?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| RangeError::InvalidDate(format!("{next_year:04}-{next_month:02}")))?;
    Ok(first_next.signed_duration_since(first).num_days() as u32)
}

// ── Tests ───────────────────────────────────────────────────────────────────
