// ABOUTME: Tests for timezone resolution and canonical date handling
// ABOUTME: Covers parse shapes, date-only round trips, and activity window summaries

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono_tz::Tz;
use trainerroad_export::errors::ExportError;
use trainerroad_export::timezone::{
    date_only_diff_days, instant_date_only, parse_timestamp, parse_timestamp_value,
    resolve_time_zone, shift_date_only, summarize_activity_window, to_local_date_only,
    validate_date_only,
};

#[test]
fn explicit_zone_wins_over_default() {
    let zone = resolve_time_zone(Some("America/New_York"), Some("Europe/Oslo")).unwrap();
    assert_eq!(zone, chrono_tz::America::New_York);
}

#[test]
fn default_zone_used_when_no_explicit() {
    let zone = resolve_time_zone(None, Some("Europe/Oslo")).unwrap();
    assert_eq!(zone, chrono_tz::Europe::Oslo);
}

#[test]
fn unknown_zone_is_rejected_with_the_candidate_name() {
    let error = resolve_time_zone(Some("Mars/Olympus_Mons"), None).unwrap_err();
    match error {
        ExportError::InvalidTimeZone { zone } => assert_eq!(zone, "Mars/Olympus_Mons"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn blank_explicit_zone_falls_through() {
    let zone = resolve_time_zone(Some("   "), Some("UTC")).unwrap();
    assert_eq!(zone, chrono_tz::UTC);
}

#[test]
fn date_only_string_parses_as_utc_midnight() {
    let instant = parse_timestamp("2024-03-09", true).unwrap();
    assert_eq!(instant.to_rfc3339(), "2024-03-09T00:00:00+00:00");
}

#[test]
fn date_only_round_trips_through_utc() {
    for raw in ["2024-01-01", "2023-12-31", "2020-02-29"] {
        let instant = parse_timestamp(raw, true).unwrap();
        assert_eq!(instant_date_only(instant, chrono_tz::UTC), raw);
    }
}

#[test]
fn offset_bearing_strings_are_honored() {
    let instant = parse_timestamp("2024-06-01T10:00:00-04:00", true).unwrap();
    assert_eq!(instant.to_rfc3339(), "2024-06-01T14:00:00+00:00");
}

#[test]
fn offsetless_datetime_is_utc_under_the_flag() {
    let instant = parse_timestamp("2024-06-01T10:00:00", true).unwrap();
    assert_eq!(instant.to_rfc3339(), "2024-06-01T10:00:00+00:00");
}

#[test]
fn fractional_seconds_are_accepted() {
    let instant = parse_timestamp("2024-06-01T10:00:00.250", true).unwrap();
    assert_eq!(instant.timestamp_subsec_millis(), 250);
}

#[test]
fn garbage_input_is_none_not_an_error() {
    assert!(parse_timestamp("not-a-date", true).is_none());
    assert!(parse_timestamp("", true).is_none());
    assert!(parse_timestamp("2024-13-99", true).is_none());
}

#[test]
fn numeric_epoch_millis_parse_from_json() {
    let instant = parse_timestamp_value(&serde_json::json!(1_704_067_200_000_i64), true).unwrap();
    assert_eq!(instant.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    assert!(parse_timestamp_value(&serde_json::json!(true), true).is_none());
    assert!(parse_timestamp_value(&serde_json::Value::Null, true).is_none());
}

#[test]
fn local_date_only_converts_across_zones() {
    let new_york: Tz = "America/New_York".parse().unwrap();
    // 02:30 UTC is still the previous evening in New York.
    let date = to_local_date_only("2024-06-02T02:30:00Z", new_york, true).unwrap();
    assert_eq!(date, "2024-06-01");
}

#[test]
fn date_only_strings_pass_through_verbatim() {
    let tokyo: Tz = "Asia/Tokyo".parse().unwrap();
    assert_eq!(
        to_local_date_only(" 2024-06-01 ", tokyo, true).as_deref(),
        Some("2024-06-01")
    );
}

#[test]
fn shift_and_diff_agree() {
    assert_eq!(shift_date_only("2024-02-28", 2).as_deref(), Some("2024-03-01"));
    assert_eq!(date_only_diff_days("2024-02-28", "2024-03-01"), Some(2));
    assert_eq!(date_only_diff_days("2024-03-01", "2024-02-28"), Some(-2));
    assert!(shift_date_only("nope", 1).is_none());
}

#[test]
fn validate_date_only_accepts_canonical_and_rejects_others() {
    assert_eq!(validate_date_only(" 2024-06-01 ").unwrap(), "2024-06-01");
    assert!(matches!(
        validate_date_only("06/01/2024"),
        Err(ExportError::InvalidInput { .. })
    ));
}

#[test]
fn activity_window_crossing_local_midnight_is_flagged() {
    let new_york: Tz = "America/New_York".parse().unwrap();
    // Starts 23:30 local on Jun 1 (03:30 UTC Jun 2), runs 90 minutes.
    let window = summarize_activity_window("2024-06-02T03:30:00Z", Some(5400.0), new_york).unwrap();
    assert_eq!(window.local_date, "2024-06-01");
    assert_eq!(window.end_local_date.as_deref(), Some("2024-06-02"));
    assert!(window.crosses_midnight_local);
    assert!(window.started_at_local.starts_with("2024-06-01T23:30:00"));
    assert!(window
        .ended_at_local
        .as_deref()
        .unwrap()
        .starts_with("2024-06-02T01:00:00"));
}

#[test]
fn activity_window_same_day_is_not_flagged() {
    let new_york: Tz = "America/New_York".parse().unwrap();
    // Starts 18:30 local Jan 1, ends 20:00 local Jan 1.
    let window = summarize_activity_window("2024-01-01T23:30:00Z", Some(5400.0), new_york).unwrap();
    assert_eq!(window.local_date, "2024-01-01");
    assert_eq!(window.end_local_date.as_deref(), Some("2024-01-01"));
    assert!(!window.crosses_midnight_local);
}

#[test]
fn activity_window_without_duration_has_no_end() {
    let window = summarize_activity_window("2024-01-01T10:00:00Z", None, chrono_tz::UTC).unwrap();
    assert!(window.ended_at_utc.is_none());
    assert!(window.end_local_date.is_none());
    assert!(!window.crosses_midnight_local);

    let window = summarize_activity_window("2024-01-01T10:00:00Z", Some(f64::NAN), chrono_tz::UTC)
        .unwrap();
    assert!(window.ended_at_utc.is_none());
}

#[test]
fn activity_window_with_unparsable_start_is_none() {
    assert!(summarize_activity_window("garbage", Some(3600.0), chrono_tz::UTC).is_none());
}
