//! End-to-end tests of the event transition surface: the same call
//! sequence a rendering layer would produce, driven against the public
//! API only.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use range_engine::{
    builtin_presets, can_apply, from_zoned, select_date, to_zoned, transition, Constraints,
    DateTimeRange, Direction, Endpoint, Event, SelectionState, TimeField, Violation,
};

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

#[test]
fn two_clicks_then_apply() {
    let presets = builtin_presets();
    let constraints = Constraints::default();
    let range = DateTimeRange::empty("America/New_York");

    // First click: partial selection, Apply stays closed.
    let t = transition(
        &range,
        None,
        Event::DateClicked {
            date: utc(2023, 6, 5, 4, 0),
        },
        &presets,
        &constraints,
    )
    .unwrap();
    assert_eq!(t.range.state(), SelectionState::PartialStart);
    assert!(!t.can_apply);
    assert_eq!(t.focused, Some(utc(2023, 6, 5, 4, 0)));

    // Second click completes; Enter commits.
    let t = transition(
        &t.range,
        t.focused,
        Event::DateClicked {
            date: utc(2023, 6, 10, 4, 0),
        },
        &presets,
        &constraints,
    )
    .unwrap();
    assert_eq!(t.range.state(), SelectionState::Complete);
    assert!(t.can_apply);
    assert!(!t.committed);

    let t = transition(&t.range, t.focused, Event::EnterPressed, &presets, &constraints).unwrap();
    assert!(t.committed);
}

#[test]
fn enter_on_invalid_selection_does_not_commit() {
    let presets = builtin_presets();
    let constraints = Constraints {
        min_duration: Some(Duration::days(10)),
        ..Default::default()
    };
    let range = DateTimeRange {
        start: Some(utc(2023, 6, 5, 4, 0)),
        end: Some(utc(2023, 6, 7, 4, 0)),
        timezone: "America/New_York".to_string(),
    };
    let t = transition(&range, None, Event::EnterPressed, &presets, &constraints).unwrap();
    assert!(!t.committed);
    assert!(!t.can_apply);
    assert_eq!(t.violation, Some(Violation::TooShort));
    // The violation carries a display-ready message for the inline error.
    assert!(!t.violation.unwrap().to_string().is_empty());
}

#[test]
fn blackout_violation_surfaces_but_range_stays() {
    let presets = builtin_presets();
    let constraints = Constraints {
        blackouts: BTreeSet::from([NaiveDate::from_ymd_opt(2023, 11, 11).unwrap()]),
        ..Default::default()
    };
    // Selection spanning the blackout is representable but flagged.
    let range = DateTimeRange {
        start: Some(utc(2023, 11, 10, 0, 0)),
        end: Some(utc(2023, 11, 12, 0, 0)),
        timezone: "America/New_York".to_string(),
    };
    let t = transition(&range, None, Event::EnterPressed, &presets, &constraints).unwrap();
    assert_eq!(t.violation, Some(Violation::ContainsBlackout));
    assert_eq!(t.range, range);
    assert!(!t.committed);
}

#[test]
fn time_field_edit_changes_one_component() {
    let presets = builtin_presets();
    let constraints = Constraints::default();
    // Start at 09:30 New York (13:30 UTC in June).
    let range = DateTimeRange {
        start: Some(utc(2023, 6, 10, 13, 30)),
        end: None,
        timezone: "America/New_York".to_string(),
    };

    // Changing only the hour keeps the minutes.
    let t = transition(
        &range,
        None,
        Event::TimeFieldChanged {
            which: Endpoint::Start,
            field: TimeField::Hour,
            value: 14,
        },
        &presets,
        &constraints,
    )
    .unwrap();
    assert_eq!(t.range.start, Some(utc(2023, 6, 10, 18, 30)));

    // Changing only the minutes keeps the hour.
    let t = transition(
        &t.range,
        None,
        Event::TimeFieldChanged {
            which: Endpoint::Start,
            field: TimeField::Minute,
            value: 0,
        },
        &presets,
        &constraints,
    )
    .unwrap();
    assert_eq!(t.range.start, Some(utc(2023, 6, 10, 18, 0)));

    // Editing an endpoint that is not set is a silent no-op.
    let t = transition(
        &t.range,
        None,
        Event::TimeFieldChanged {
            which: Endpoint::End,
            field: TimeField::Hour,
            value: 23,
        },
        &presets,
        &constraints,
    )
    .unwrap();
    assert_eq!(t.range.end, None);
}

#[test]
fn preset_click_replaces_selection_and_keeps_timezone() {
    let presets = builtin_presets();
    let constraints = Constraints::default();
    let range = DateTimeRange {
        start: Some(utc(2023, 1, 1, 0, 0)),
        end: None,
        timezone: "Europe/Berlin".to_string(),
    };
    let last7 = presets
        .iter()
        .position(|p| p.label() == "Last 7 Days")
        .unwrap();
    let now = utc(2023, 6, 10, 0, 0);
    let t = transition(
        &range,
        None,
        Event::PresetClicked { index: last7, now },
        &presets,
        &constraints,
    )
    .unwrap();
    assert_eq!(t.range.start, Some(utc(2023, 6, 3, 0, 0)));
    assert_eq!(t.range.end, Some(now));
    assert_eq!(t.range.timezone, "Europe/Berlin");
    assert!(t.can_apply);

    // An out-of-bounds preset index changes nothing.
    let t = transition(
        &range,
        None,
        Event::PresetClicked { index: 99, now },
        &presets,
        &constraints,
    )
    .unwrap();
    assert_eq!(t.range, range);
}

#[test]
fn arrow_keys_move_focus_without_touching_selection() {
    let presets = builtin_presets();
    let constraints = Constraints::default();
    let range = DateTimeRange {
        start: Some(utc(2023, 6, 15, 4, 0)),
        end: None,
        timezone: "America/New_York".to_string(),
    };

    // No explicit focus yet: navigation anchors on the range start.
    let t = transition(
        &range,
        None,
        Event::ArrowKeyPressed {
            direction: Direction::Down,
        },
        &presets,
        &constraints,
    )
    .unwrap();
    assert_eq!(t.focused, Some(utc(2023, 6, 22, 4, 0)));
    assert_eq!(t.range, range);

    let t = transition(
        &t.range,
        t.focused,
        Event::ArrowKeyPressed {
            direction: Direction::Left,
        },
        &presets,
        &constraints,
    )
    .unwrap();
    assert_eq!(t.focused, Some(utc(2023, 6, 21, 4, 0)));

    // With nothing selected and no focus there is nowhere to move from.
    let empty = DateTimeRange::empty("America/New_York");
    let t = transition(
        &empty,
        None,
        Event::ArrowKeyPressed {
            direction: Direction::Up,
        },
        &presets,
        &constraints,
    )
    .unwrap();
    assert_eq!(t.focused, None);
}

#[test]
fn timezone_change_keeps_instants_and_revalidates() {
    let presets = builtin_presets();
    // Blackout on June 9: the range misses it viewed from Berlin but hits
    // it viewed from Honolulu (June 10 00:30 UTC is June 9 14:30 local).
    let constraints = Constraints {
        blackouts: BTreeSet::from([NaiveDate::from_ymd_opt(2023, 6, 9).unwrap()]),
        ..Default::default()
    };
    let range = DateTimeRange {
        start: Some(utc(2023, 6, 10, 0, 30)),
        end: Some(utc(2023, 6, 11, 0, 30)),
        timezone: "Europe/Berlin".to_string(),
    };
    let t = transition(&range, None, Event::EnterPressed, &presets, &constraints).unwrap();
    assert_eq!(t.violation, None);

    let t = transition(
        &range,
        None,
        Event::TimezoneChanged {
            timezone: "Pacific/Honolulu".to_string(),
        },
        &presets,
        &constraints,
    )
    .unwrap();
    assert_eq!(t.range.start, range.start);
    assert_eq!(t.violation, Some(Violation::ContainsBlackout));
    assert!(!t.can_apply);
}

// ── Invariant properties ────────────────────────────────────────────────────

/// Minute-aligned instants between 2000 and 2100 (the wall-clock view has
/// minute resolution).
fn arb_instant() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64 / 60..4_102_444_800i64 / 60)
        .prop_map(|minutes| DateTime::from_timestamp(minutes * 60, 0).unwrap())
}

proptest! {
    // Zones without DST transitions in the generated window: the
    // wall-clock round trip is exact. (In DST zones the second occurrence
    // of a repeated hour intentionally maps to the first.)
    #[test]
    fn round_trip_in_fixed_offset_zones(
        instant in arb_instant(),
        tz in prop::sample::select(vec!["UTC", "Asia/Tokyo", "America/Phoenix"]),
    ) {
        let wall = to_zoned(instant, tz).unwrap();
        prop_assert_eq!(from_zoned(&wall, tz).unwrap(), instant);
    }

    // After any click sequence, a complete selection is always ordered.
    #[test]
    fn clicks_never_produce_inverted_range(clicks in prop::collection::vec(arb_instant(), 1..12)) {
        let constraints = Constraints::default();
        let mut range = DateTimeRange::empty("America/New_York");
        for click in clicks {
            range = select_date(&range, click, &constraints).unwrap();
            if let (Some(start), Some(end)) = (range.start, range.end) {
                prop_assert!(start <= end);
            }
        }
    }

    // The Apply gate never opens for a partial selection.
    #[test]
    fn partial_selection_never_applies(click in arb_instant()) {
        let constraints = Constraints::default();
        let range = select_date(&DateTimeRange::empty("UTC"), click, &constraints).unwrap();
        prop_assert!(!can_apply(&range, &constraints).unwrap());
    }
}
