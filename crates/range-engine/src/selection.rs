//! Range selection state machine and the UI event surface.
//!
//! The selection is an immutable [`DateTimeRange`] value threaded through
//! pure transition functions: every UI event handler calls one function
//! with the prior value and stores the returned value. Nothing here reads
//! the system clock, mutates in place, or keeps a hidden cursor — the
//! consumer owns the current value and re-supplies it on every call, which
//! also gives the single-writer semantics the engine assumes.
//!
//! Selection state is derived from endpoint presence, never stored:
//! Empty → PartialStart (first click) → Complete (second click, with
//! auto-swap so `start <= end`) → PartialStart again (a click on a
//! complete selection starts over with the clicked date).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::constraint::{self, Constraints, Violation};
use crate::error::RangeError;
use crate::preset::Preset;

// ── Value types ─────────────────────────────────────────────────────────────

/// The selected range: optional endpoints plus the display timezone.
///
/// Invariant: when both endpoints are present, `start <= end` — enforced
/// by swapping on out-of-order input, never by rejecting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// IANA timezone name used for all wall-clock views of the endpoints.
    pub timezone: String,
}

impl DateTimeRange {
    /// An empty selection in the given timezone.
    pub fn empty(timezone: impl Into<String>) -> Self {
        DateTimeRange {
            start: None,
            end: None,
            timezone: timezone.into(),
        }
    }

    /// Selection state, derived from endpoint presence.
    pub fn state(&self) -> SelectionState {
        match (self.start, self.end) {
            (Some(_), Some(_)) => SelectionState::Complete,
            (Some(_), None) => SelectionState::PartialStart,
            (None, _) => SelectionState::Empty,
        }
    }
}

/// Two-click selection progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    Empty,
    PartialStart,
    Complete,
}

/// Which endpoint of the range an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Start,
    End,
}

/// Keyboard navigation direction over the day grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Which time-of-day field a field-level edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeField {
    Hour,
    Minute,
}

// ── Transition functions ────────────────────────────────────────────────────

/// Apply a date click to the selection.
///
/// - Click on a disabled date (outside min/max, or on a blackout date by
///   zoned calendar date): silent no-op, the current value comes back
///   unchanged.
/// - Empty or Complete: the clicked date becomes the new start, the end is
///   cleared.
/// - PartialStart: the clicked date completes the range; if it precedes
///   the start the pair is swapped so `start <= end`.
///
/// Constraint validity does not block completion — an invalid-but-complete
/// range is representable and surfaced via [`validate`](crate::validate);
/// the Apply gate is [`can_apply`].
///
/// # Errors
///
/// Returns [`RangeError::InvalidTimezone`] if the range's timezone does
/// not resolve.
pub fn select_date(
    current: &DateTimeRange,
    clicked: DateTime<Utc>,
    constraints: &Constraints,
) -> Result<DateTimeRange, RangeError> {
    if constraint::is_date_disabled(clicked, constraints, &current.timezone)? {
        return Ok(current.clone());
    }
    let next = match (current.start, current.end) {
        (Some(start), None) => {
            let (lo, hi) = if clicked < start {
                (clicked, start)
            } else {
                (start, clicked)
            };
            DateTimeRange {
                start: Some(lo),
                end: Some(hi),
                timezone: current.timezone.clone(),
            }
        }
        _ => DateTimeRange {
            start: Some(clicked),
            end: None,
            timezone: current.timezone.clone(),
        },
    };
    Ok(next)
}

/// Overwrite the hour and minute of one endpoint, keeping its zoned
/// calendar date.
///
/// The endpoint round-trips through the wall-clock view in the range's
/// timezone, so an edit into a skipped DST hour shifts forward past the
/// gap and an edit into a repeated hour resolves to the first occurrence.
/// A no-op if the endpoint is absent. If the edit inverts the pair, the
/// endpoints are swapped to keep `start <= end`.
///
/// # Errors
///
/// Returns [`RangeError::InvalidWallClock`] for an out-of-range hour or
/// minute, or [`RangeError::InvalidTimezone`] if the range's timezone
/// does not resolve.
pub fn edit_time_of_day(
    current: &DateTimeRange,
    which: Endpoint,
    hour: u32,
    minute: u32,
) -> Result<DateTimeRange, RangeError> {
    let instant = match which {
        Endpoint::Start => current.start,
        Endpoint::End => current.end,
    };
    let Some(instant) = instant else {
        return Ok(current.clone());
    };

    let mut wall = clock::to_zoned(instant, &current.timezone)?;
    wall.hour = hour;
    wall.minute = minute;
    let edited = clock::from_zoned(&wall, &current.timezone)?;

    let (mut start, mut end) = match which {
        Endpoint::Start => (Some(edited), current.end),
        Endpoint::End => (current.start, Some(edited)),
    };
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            (start, end) = (end, start);
        }
    }
    Ok(DateTimeRange {
        start,
        end,
        timezone: current.timezone.clone(),
    })
}

/// Move the keyboard focus by one grid step: ±1 day for left/right, ±7
/// days for up/down.
///
/// Day steps are taken on the zoned calendar and re-anchored through the
/// DST policy, so a focus that sits on local midnight stays on local
/// midnight across a transition. Independent of any selection state.
///
/// # Errors
///
/// Returns [`RangeError::InvalidTimezone`] if `timezone` does not resolve.
pub fn move_focus(
    focused: DateTime<Utc>,
    direction: Direction,
    timezone: &str,
) -> Result<DateTime<Utc>, RangeError> {
    let tz = clock::parse_timezone(timezone)?;
    let step = match direction {
        Direction::Left => -1,
        Direction::Right => 1,
        Direction::Up => -7,
        Direction::Down => 7,
    };
    let local = focused.with_timezone(&tz);
    let date = local.date_naive() + Duration::days(step);
    clock::resolve_local(date.and_time(local.time()), &tz)
}

/// Change the display timezone, preserving both endpoint instants.
///
/// Wall-clock views are always recomputed from the instants, so nothing
/// else needs to change.
///
/// # Errors
///
/// Returns [`RangeError::InvalidTimezone`] if `new_timezone` is not a
/// valid IANA name — the current value stays untouched in that case.
pub fn set_timezone(
    current: &DateTimeRange,
    new_timezone: &str,
) -> Result<DateTimeRange, RangeError> {
    clock::parse_timezone(new_timezone)?;
    Ok(DateTimeRange {
        start: current.start,
        end: current.end,
        timezone: new_timezone.to_string(),
    })
}

/// Replace the selection with a preset's resolved range, keeping the
/// current timezone.
///
/// # Errors
///
/// Propagates the preset resolver's error (an unknown timezone, in
/// practice).
pub fn apply_preset(
    current: &DateTimeRange,
    preset: &Preset,
    now: DateTime<Utc>,
) -> Result<DateTimeRange, RangeError> {
    let (start, end) = preset.resolve(now, &current.timezone)?;
    Ok(DateTimeRange {
        start: Some(start),
        end: Some(end),
        timezone: current.timezone.clone(),
    })
}

/// The Apply gate: both endpoints present and no rule violated.
///
/// Recomputed from scratch on every call — never cached across mutations.
///
/// # Errors
///
/// Returns [`RangeError::InvalidTimezone`] if the range's timezone does
/// not resolve.
pub fn can_apply(range: &DateTimeRange, constraints: &Constraints) -> Result<bool, RangeError> {
    Ok(range.state() == SelectionState::Complete
        && constraint::validate(range, constraints)?.is_none())
}

// ── Event surface ───────────────────────────────────────────────────────────

/// A raw input event from the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    DateClicked {
        date: DateTime<Utc>,
    },
    TimeFieldChanged {
        which: Endpoint,
        field: TimeField,
        value: u32,
    },
    /// Index into the preset list passed to [`transition`]; an
    /// out-of-bounds index is a no-op.
    PresetClicked {
        index: usize,
        now: DateTime<Utc>,
    },
    TimezoneChanged {
        timezone: String,
    },
    ArrowKeyPressed {
        direction: Direction,
    },
    EnterPressed,
}

/// The full result of one transition: the next range value plus everything
/// the rendering layer needs to redraw.
#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    /// The next selection value; the consumer stores it and re-supplies it
    /// on the next event.
    pub range: DateTimeRange,
    /// The next keyboard focus, if any event established one.
    pub focused: Option<DateTime<Utc>>,
    /// First violated rule of the next range, for the inline message.
    pub violation: Option<Violation>,
    /// Whether the Apply action is enabled.
    pub can_apply: bool,
    /// True only for an Enter press that passed the Apply gate.
    pub committed: bool,
}

/// Map one UI event onto the selection, producing the next value and the
/// derived display state.
///
/// `focused` is the consumer-owned keyboard focus (the engine never talks
/// to the DOM); arrow keys move it, date clicks set it, and everything
/// else passes it through. Arrow navigation anchors on the current focus,
/// falling back to the range start, and is a no-op when neither exists.
/// `violation` and `can_apply` are recomputed on every call.
///
/// # Errors
///
/// Returns [`RangeError::InvalidTimezone`] or
/// [`RangeError::InvalidWallClock`] from the underlying operation; the
/// caller's current value is untouched either way.
pub fn transition(
    current: &DateTimeRange,
    focused: Option<DateTime<Utc>>,
    event: Event,
    presets: &[Preset],
    constraints: &Constraints,
) -> Result<Transition, RangeError> {
    let mut next_focused = focused;
    let is_commit = matches!(event, Event::EnterPressed);

    let range = match event {
        Event::DateClicked { date } => {
            next_focused = Some(date);
            select_date(current, date, constraints)?
        }
        Event::TimeFieldChanged {
            which,
            field,
            value,
        } => {
            let instant = match which {
                Endpoint::Start => current.start,
                Endpoint::End => current.end,
            };
            match instant {
                None => current.clone(),
                Some(instant) => {
                    let wall = clock::to_zoned(instant, &current.timezone)?;
                    let (hour, minute) = match field {
                        TimeField::Hour => (value, wall.minute),
                        TimeField::Minute => (wall.hour, value),
                    };
                    edit_time_of_day(current, which, hour, minute)?
                }
            }
        }
        Event::PresetClicked { index, now } => match presets.get(index) {
            Some(preset) => apply_preset(current, preset, now)?,
            None => current.clone(),
        },
        Event::TimezoneChanged { timezone } => set_timezone(current, &timezone)?,
        Event::ArrowKeyPressed { direction } => {
            if let Some(anchor) = focused.or(current.start) {
                next_focused = Some(move_focus(anchor, direction, &current.timezone)?);
            }
            current.clone()
        }
        Event::EnterPressed => current.clone(),
    };

    let violation = constraint::validate(&range, constraints)?;
    let apply_enabled = range.state() == SelectionState::Complete && violation.is_none();
    Ok(Transition {
        range,
        focused: next_focused,
        violation,
        can_apply: apply_enabled,
        committed: is_commit && apply_enabled,
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────
