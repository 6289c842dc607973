//! # range-engine
//!
//! Timezone-aware core for a date/time range selection widget.
//!
//! The engine owns the logic a rendering layer cannot get right on its
//! own: calendar grids laid out in a target IANA timezone, DST-correct
//! conversion between absolute instants and zoned wall-clock edits,
//! two-click range selection with auto-swap, constraint validation, and
//! named preset resolution. Everything is a pure function over immutable
//! values — the consumer owns the current [`DateTimeRange`] and threads it
//! through [`transition`] (or the finer-grained operations) on every UI
//! event.
//!
//! ## Modules
//!
//! - [`clock`] — instant ↔ zoned wall-clock conversion, formatting, zone metadata
//! - [`grid`] — calendar-day enumeration and weekday alignment for a month view
//! - [`constraint`] — bounds, blackout dates, and duration rules
//! - [`selection`] — the selection state machine and UI event surface
//! - [`preset`] — named range shortcuts ("Last 7 Days", ...)
//! - [`error`] — error types

pub mod clock;
pub mod constraint;
pub mod error;
pub mod grid;
pub mod preset;
pub mod selection;

pub use clock::{format, from_zoned, to_zoned, zone_info, WallClock, ZoneInfo};
pub use constraint::{is_date_disabled, validate, Constraints, Violation};
pub use error::RangeError;
pub use grid::{days_in_month, days_of, weekday_offset};
pub use preset::{builtin_presets, Preset};
pub use selection::{
    apply_preset, can_apply, edit_time_of_day, move_focus, select_date, set_timezone, transition,
    DateTimeRange, Direction, Endpoint, Event, SelectionState, TimeField, Transition,
};
