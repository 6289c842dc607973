//! Named range shortcuts ("Last 7 Days", "This Month", ...).
//!
//! A preset is a label plus a pure resolver from a caller-supplied `now`
//! anchor and a timezone to a concrete (start, end) pair. Presets hold no
//! state and never read the system clock, so the same anchor always
//! resolves to the same range.
//!
//! Two flavors of arithmetic coexist in the stock catalog and each entry
//! documents which it uses:
//!
//! - **Instant-based** (Last N Days): `now - N * 24h`, unaffected by DST —
//!   "last 7 days" is exactly 168 hours.
//! - **Zoned** (Today, This Month, ...): anchored on local midnights in
//!   the target timezone, resolved through the engine's DST policy.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use crate::clock;
use crate::error::RangeError;

type Resolver =
    Box<dyn Fn(DateTime<Utc>, &str) -> Result<(DateTime<Utc>, DateTime<Utc>), RangeError> + Send + Sync>;

/// A named, precomputed range shortcut.
pub struct Preset {
    label: String,
    resolve: Resolver,
}

impl Preset {
    /// A preset from a label and a pure resolver.
    pub fn new<F>(label: impl Into<String>, resolve: F) -> Self
    where
        F: Fn(DateTime<Utc>, &str) -> Result<(DateTime<Utc>, DateTime<Utc>), RangeError>
            + Send
            + Sync
            + 'static,
    {
        Preset {
            label: label.into(),
            resolve: Box::new(resolve),
        }
    }

    /// The display label (e.g., "Last 7 Days").
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Resolve to a concrete (start, end) pair for the given anchor and
    /// timezone.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidTimezone`] if the resolver needs the
    /// timezone and it does not resolve.
    pub fn resolve(
        &self,
        now: DateTime<Utc>,
        timezone: &str,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>), RangeError> {
        (self.resolve)(now, timezone)
    }
}

impl std::fmt::Debug for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preset")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// The stock preset catalog, in display order.
pub fn builtin_presets() -> Vec<Preset> {
    vec![
        // Zoned: local start of today → now
        Preset::new("Today", |now, tz| Ok((local_day_start(now, tz, 0)?, now))),
        // Zoned: yesterday's local start → today's local start
        Preset::new("Yesterday", |now, tz| {
            Ok((local_day_start(now, tz, -1)?, local_day_start(now, tz, 0)?))
        }),
        // Instant-based: exactly 7 * 24h back from the anchor
        Preset::new("Last 7 Days", |now, _tz| Ok((now - Duration::days(7), now))),
        // Instant-based: exactly 30 * 24h back from the anchor
        Preset::new("Last 30 Days", |now, _tz| Ok((now - Duration::days(30), now))),
        // Zoned: first local midnight of the current month → now
        Preset::new("This Month", |now, tz| {
            Ok((local_month_start(now, tz, 0)?, now))
        }),
        // Zoned: the previous month, midnight to midnight
        Preset::new("Last Month", |now, tz| {
            Ok((local_month_start(now, tz, -1)?, local_month_start(now, tz, 0)?))
        }),
    ]
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Local midnight of the anchor's zoned date shifted by `day_offset` days.
fn local_day_start(
    now: DateTime<Utc>,
    timezone: &str,
    day_offset: i64,
) -> Result<DateTime<Utc>, RangeError> {
    let tz = clock::parse_timezone(timezone)?;
    let date = now.with_timezone(&tz).date_naive() + Duration::days(day_offset);
    clock::resolve_local(date.and_time(NaiveTime::MIN), &tz)
}

/// Local midnight of the 1st of the anchor's zoned month shifted by
/// `month_offset` months.
fn local_month_start(
    now: DateTime<Utc>,
    timezone: &str,
    month_offset: i32,
) -> Result<DateTime<Utc>, RangeError> {
    let tz = clock::parse_timezone(timezone)?;
    let local = now.with_timezone(&tz);
    let total = local.year() * 12 + local.month0() as i32 + month_offset;
    let (year, month) = (total.div_euclid(12), total.rem_euclid(12) as u32 + 1);
    let date = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| RangeError::InvalidDate(format!("{year:04}-{month:02}-01")))?;
    clock::resolve_local(date.and_time(NaiveTime::MIN), &tz)
}

// ── Tests ───────────────────────────────────────────────────────────────────
