//! Conversion between absolute instants and zoned wall-clock time.
//!
//! Every function takes the timezone as an explicit IANA name and resolves
//! it per call — the engine never caches a zone or falls back to UTC. An
//! instant is always a `DateTime<Utc>`; the wall-clock view is derived on
//! demand and never stored, so a timezone change can never leave a stale
//! local time behind.
//!
//! # DST Policy
//!
//! Wall-clock → instant conversion has two edge cases, both resolved
//! deterministically:
//!
//! - **Repeated local hour** (clocks set back): the first occurrence wins,
//!   i.e. the earlier UTC instant.
//! - **Skipped local hour** (clocks set forward): the requested time is
//!   shifted forward past the gap, yielding the first valid instant at or
//!   after it.
//!
//! # Functions
//!
//! - [`to_zoned`] — Instant → wall-clock fields in a timezone
//! - [`from_zoned`] — wall-clock fields in a timezone → Instant
//! - [`format`] — render an instant with the zone's offset at that instant
//! - [`zone_info`] — UTC offset, DST flag, and abbreviation at an instant

use std::fmt::Write as _;

use chrono::{DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::RangeError;

// ── Wall-clock view ─────────────────────────────────────────────────────────

/// Calendar date and time-of-day as perceived in a specific timezone.
///
/// Minute resolution: the selection UI edits hours and minutes, and day
/// cells sit on local midnight, so seconds are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallClock {
    pub year: i32,
    /// 1-12.
    pub month: u32,
    /// 1-31.
    pub day: u32,
    /// 0-23.
    pub hour: u32,
    /// 0-59.
    pub minute: u32,
}

/// Offset metadata for a timezone at a specific instant.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneInfo {
    /// The UTC offset at this instant (e.g., "-05:00").
    pub utc_offset: String,
    /// Whether Daylight Saving Time is active at this instant.
    pub dst_active: bool,
    /// The zone abbreviation at this instant (e.g., "EST", "CEST").
    pub abbreviation: String,
}

// ── Conversions ─────────────────────────────────────────────────────────────

/// View an instant as wall-clock fields in the given timezone.
///
/// Uses the zone's actual UTC offset at that instant, so the same instant
/// maps to different wall-clock hours on either side of a DST transition.
///
/// # Errors
///
/// Returns [`RangeError::InvalidTimezone`] if `timezone` is not a valid
/// IANA name.
pub fn to_zoned(instant: DateTime<Utc>, timezone: &str) -> Result<WallClock, RangeError> {
    let tz = parse_timezone(timezone)?;
    let local = instant.with_timezone(&tz);
    Ok(WallClock {
        year: local.year(),
        month: local.month(),
        day: local.day(),
        hour: local.hour(),
        minute: local.minute(),
    })
}

/// Resolve wall-clock fields in the given timezone to an instant.
///
/// Applies the module-level DST policy: a repeated local time resolves to
/// its first occurrence, a skipped local time shifts forward past the gap.
/// Neither case is an error.
///
/// # Errors
///
/// Returns [`RangeError::InvalidTimezone`] for an unknown zone, or
/// [`RangeError::InvalidWallClock`] if the fields are out of range
/// (month 13, hour 24, February 30, ...).
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use range_engine::clock::{from_zoned, WallClock};
///
/// // 2023-03-12 02:30 does not exist in New York (clocks jump 02:00 → 03:00);
/// // the conversion lands on 03:30 EDT instead of failing.
/// let wall = WallClock { year: 2023, month: 3, day: 12, hour: 2, minute: 30 };
/// let instant = from_zoned(&wall, "America/New_York").unwrap();
/// assert_eq!(instant, Utc.with_ymd_and_hms(2023, 3, 12, 7, 30, 0).unwrap());
/// ```
pub fn from_zoned(wall: &WallClock, timezone: &str) -> Result<DateTime<Utc>, RangeError> {
    let tz = parse_timezone(timezone)?;
    let date = NaiveDate::from_ymd_opt(wall.year, wall.month, wall.day).ok_or_else(|| {
        RangeError::InvalidWallClock(format!(
            "{:04}-{:02}-{:02}",
            wall.year, wall.month, wall.day
        ))
    })?;
    let naive = date.and_hms_opt(wall.hour, wall.minute, 0).ok_or_else(|| {
        RangeError::InvalidWallClock(format!("{:02}:{:02}", wall.hour, wall.minute))
    })?;
    resolve_local(naive, &tz)
}

/// Render an instant in the given timezone with a strftime pattern.
///
/// # Errors
///
/// Returns [`RangeError::InvalidTimezone`] for an unknown zone, or
/// [`RangeError::InvalidFormat`] if the pattern contains an unsupported
/// specifier — formatting never panics.
pub fn format(instant: DateTime<Utc>, timezone: &str, pattern: &str) -> Result<String, RangeError> {
    let tz = parse_timezone(timezone)?;
    let local = instant.with_timezone(&tz);
    let mut out = String::new();
    write!(out, "{}", local.format(pattern))
        .map_err(|_| RangeError::InvalidFormat(format!("'{pattern}'")))?;
    Ok(out)
}

/// Offset metadata for a timezone at an instant, for display next to the
/// timezone picker.
///
/// # Errors
///
/// Returns [`RangeError::InvalidTimezone`] if `timezone` is not a valid
/// IANA name.
pub fn zone_info(instant: DateTime<Utc>, timezone: &str) -> Result<ZoneInfo, RangeError> {
    let tz = parse_timezone(timezone)?;
    let local = instant.with_timezone(&tz);
    Ok(ZoneInfo {
        utc_offset: format_utc_offset(&local),
        dst_active: is_dst_active(&local, &tz),
        abbreviation: local.format("%Z").to_string(),
    })
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Parse an IANA timezone string into `Tz`.
pub(crate) fn parse_timezone(s: &str) -> Result<Tz, RangeError> {
    s.parse::<Tz>()
        .map_err(|_| RangeError::InvalidTimezone(format!("'{s}'")))
}

/// Resolve a naive local datetime to an instant under the DST policy:
/// ambiguous → earlier occurrence, nonexistent → shift forward by the gap.
pub(crate) fn resolve_local(naive: NaiveDateTime, tz: &Tz) -> Result<DateTime<Utc>, RangeError> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(first, _second) => Ok(first.with_timezone(&Utc)),
        LocalResult::None => {
            // The wall clock falls inside a forward transition's gap.
            // Interpreting it with the pre-gap offset lands exactly on the
            // first valid instant at or after the requested time. Walk back
            // to find that offset; transition gaps top out at 24 hours
            // (Pacific/Apia, 2011), so the probe is bounded.
            let mut probe = naive;
            for _ in 0..48 {
                probe = probe - chrono::Duration::hours(1);
                match tz.offset_from_local_datetime(&probe) {
                    LocalResult::Single(off) | LocalResult::Ambiguous(off, _) => {
                        let offset_secs = i64::from(off.fix().local_minus_utc());
                        let utc_naive = naive - chrono::Duration::seconds(offset_secs);
                        return Ok(Utc.from_utc_datetime(&utc_naive));
                    }
                    LocalResult::None => continue,
                }
            }
            Err(RangeError::InvalidWallClock(format!(
                "unresolvable local time {naive}"
            )))
        }
    }
}

/// Format the UTC offset as a string (e.g., "-05:00", "+09:00").
fn format_utc_offset(local: &DateTime<Tz>) -> String {
    let offset_secs = local.offset().fix().local_minus_utc();
    let sign = if offset_secs >= 0 { "+" } else { "-" };
    let abs_secs = offset_secs.unsigned_abs();
    let hours = abs_secs / 3600;
    let minutes = (abs_secs % 3600) / 60;
    format!("{sign}{hours:02}:{minutes:02}")
}

/// Determine if DST is active for a local datetime in a timezone.
fn is_dst_active(local: &DateTime<Tz>, tz: &Tz) -> bool {
    // The standard offset is the smaller of the January and July offsets,
    // which covers both hemispheres.
    let year = local.year();
    let jan = sample_offset(tz, year, 1);
    let jul = sample_offset(tz, year, 7);
    local.offset().fix().local_minus_utc() > jan.min(jul)
}

/// The zone's UTC offset in seconds at noon UTC on the 1st of `month`.
fn sample_offset(tz: &Tz, year: i32, month: u32) -> i32 {
    Utc.with_ymd_and_hms(year, month, 1, 12, 0, 0)
        .single()
        .map(|dt| dt.with_timezone(tz).offset().fix().local_minus_utc())
        .unwrap_or(0)
}

// ── Tests ───────────────────────────────────────────────────────────────────
