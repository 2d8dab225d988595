// ABOUTME: Tests for raw-payload normalizers and compaction
// ABOUTME: Covers casing tolerance, annotation labels, day flattening, and level joins

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serde_json::json;
use trainerroad_export::models::{AiFtpEligibility, CareerLevels, PublicTss, RawWeight};
use trainerroad_export::normalize::{
    build_levels_by_zone, compact_annotation, compact_event, compact_personal_record,
    compact_weight, flatten_public_days, normalize_fitness_thresholds, normalize_ftp_history,
    pick, to_iso_date,
};

#[test]
fn annotation_type_codes_map_to_labels() {
    let record = compact_annotation(&json!({
        "id": 11,
        "typeId": 2,
        "date": { "year": 2024, "month": 7, "day": 1 },
        "duration": 172_800,
    }));
    assert_eq!(record.type_label, "time-off");
    assert_eq!(record.record_type, "time-off");
    assert_eq!(record.duration_days, Some(2));
    assert_eq!(record.date_only.as_deref(), Some("2024-07-01"));
}

#[test]
fn unknown_annotation_codes_become_unknown() {
    let record = compact_annotation(&json!({ "typeId": 42 }));
    assert_eq!(record.type_label, "unknown");
    assert_eq!(record.type_id, Some(42));
    assert!(record.date_only.is_none());
    assert!(record.duration_days.is_none());
}

#[test]
fn annotation_duration_rounds_to_whole_days() {
    let record = compact_annotation(&json!({ "typeId": 1, "duration": 129_600 }));
    // A day and a half rounds to two days.
    assert_eq!(record.duration_days, Some(2));
}

#[test]
fn event_compaction_tolerates_pascal_case() {
    let record = compact_event(&json!({
        "Id": 5,
        "Name": "Spring Classic",
        "Date": { "Year": 2024, "Month": 4, "Day": 14 },
        "Tss": 180,
        "RacePriority": "A",
    }));
    assert_eq!(record.id, Some(5));
    assert_eq!(record.name.as_deref(), Some("Spring Classic"));
    assert_eq!(record.date_only.as_deref(), Some("2024-04-14"));
    assert_eq!(record.tss, Some(180.0));
}

#[test]
fn weight_value_parses_from_number_or_string() {
    let numeric: RawWeight = serde_json::from_value(json!({
        "id": 1, "value": 71.5, "units": "kg", "date": "2024-02-01T08:00:00Z"
    }))
    .unwrap();
    let record = compact_weight(&numeric);
    assert_eq!(record.value, Some(71.5));
    assert_eq!(record.date_only.as_deref(), Some("2024-02-01"));

    let stringy: RawWeight =
        serde_json::from_value(json!({ "value": "70.2", "units": "kg" })).unwrap();
    assert_eq!(compact_weight(&stringy).value, Some(70.2));

    let junk: RawWeight = serde_json::from_value(json!({ "value": "heavy" })).unwrap();
    assert!(compact_weight(&junk).value.is_none());
}

#[test]
fn public_days_flatten_irregular_weeks_with_unique_dates() {
    let payload: PublicTss = serde_json::from_value(json!({
        "tssByDay": [
            [
                { "date": "2024-03-04", "tss": 55, "tssTrainerRoad": 55, "hasRides": true },
                { "date": "2024-03-05", "plannedTssTrainerRoad": 60, "plannedTssOther": 15 },
            ],
            [
                { "Date": "2024-03-06T00:00:00", "Tss": 80, "TssOther": 10, "HasRides": true },
            ],
            [
                { "date": "2024-03-04", "tss": 999 },
                { "noDate": true },
            ],
        ],
    }))
    .unwrap();
    let days = flatten_public_days(&payload);
    assert_eq!(days.len(), 3);
    assert_eq!(days[0].date, "2024-03-04");
    assert_eq!(days[0].tss, 55.0);
    assert_eq!(days[1].planned_tss_total, 75.0);
    assert_eq!(days[2].date, "2024-03-06");
    assert_eq!(days[2].tss, 80.0);
    assert!(days[2].has_rides);
    // The duplicate 2024-03-04 entry kept its first value.
    assert_eq!(days.iter().filter(|day| day.date == "2024-03-04").count(), 1);
}

#[test]
fn ftp_history_drops_bad_rows_and_sorts_ascending() {
    let rows = vec![
        json!({ "date": "2024-02-01T00:00:00Z", "value": 262 }),
        json!({ "Date": "2023-11-15T00:00:00Z", "Value": 255 }),
        json!({ "value": 250 }),
        json!({ "date": "2024-01-01T00:00:00Z", "value": "not-a-number" }),
    ];
    let history = normalize_ftp_history(&rows);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].date_only, "2023-11-15");
    assert_eq!(history[0].value, 255.0);
    assert_eq!(history[1].date_only, "2024-02-01");
}

#[test]
fn fitness_thresholds_normalize_and_sort() {
    let rows = vec![
        json!({ "Id": 2, "Date": "2024-06-01T00:00:00Z", "Value": 270, "IsApplied": false }),
        json!({ "id": 1, "date": "2024-05-01T00:00:00Z", "value": 265, "isApplied": true }),
    ];
    let thresholds = normalize_fitness_thresholds(&rows);
    assert_eq!(thresholds.len(), 2);
    assert_eq!(thresholds[0].id, Some(1));
    assert!(thresholds[0].is_applied);
    assert_eq!(thresholds[1].date_only, "2024-06-01");
    assert!(!thresholds[1].is_applied);
}

#[test]
fn levels_join_ai_payloads_by_zone_id() {
    let levels: CareerLevels = serde_json::from_value(json!({
        "levels": {
            "83": {
                "recent": 5.4,
                "predicted": 5.9,
                "activityId": 900,
                "changeEvent": {
                    "date": "2024-03-01T00:00:00Z",
                    "reason": "workout",
                    "level": { "from": 5.0, "to": 5.4 },
                    "delta": 0.4,
                },
            },
            "33": { "recent": 6.1 },
        },
        "timestamp": "2024-03-02T00:00:00Z",
    }))
    .unwrap();
    let eligibility: AiFtpEligibility = serde_json::from_value(json!({
        "can": true,
        "additionalData": {
            "detection": {
                "projectedProgressionLevels": [
                    { "progressionId": 83, "displayFinalLevel": 6.2, "previousDisplayLevel": 5.4 },
                ],
                "currentProgressionLevels": [
                    { "progressionId": 83, "previousDisplayLevel": 5.4 },
                ],
            },
        },
    }))
    .unwrap();

    let records = build_levels_by_zone(&levels, Some(&eligibility));
    assert_eq!(records.len(), 2);
    // Endurance (33) sorts before Threshold (83).
    assert_eq!(records[0].zone_key, "endurance");
    assert_eq!(records[1].zone_key, "threshold");
    let threshold = &records[1];
    assert_eq!(threshold.recent_level, Some(5.4));
    assert_eq!(threshold.change_from, Some(5.0));
    assert_eq!(threshold.date_only.as_deref(), Some("2024-03-01"));
    assert_eq!(threshold.ai_projected_display_level, Some(6.2));
    assert_eq!(threshold.ai_current_display_level, Some(5.4));
    assert!((threshold.ai_delta.unwrap() - 0.8).abs() < 1e-9);
}

#[test]
fn unknown_zones_get_synthesized_labels_and_sort_last() {
    let levels: CareerLevels = serde_json::from_value(json!({
        "levels": {
            "999": { "recent": 1.0 },
            "85": { "recent": 4.0 },
        },
    }))
    .unwrap();
    let records = build_levels_by_zone(&levels, None);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].zone_key, "vo2-max");
    assert_eq!(records[1].zone_key, "progression-999");
    assert_eq!(records[1].zone_label, "Progression 999");
    assert!(records[1].sort_order > records[0].sort_order);
    assert!(records[1].ai_delta.is_none());
}

#[test]
fn personal_records_compact_from_either_casing() {
    let pascal = compact_personal_record(&json!({
        "Seconds": 300,
        "Watts": 310,
        "WorkoutDate": "2024-03-01T00:00:00",
        "WorkoutRecordName": "Mount Goode",
        "SurveyResponseTranslated": "Hard",
    }));
    assert_eq!(pascal.seconds, Some(300.0));
    assert_eq!(pascal.watts, Some(310.0));
    assert_eq!(pascal.workout_record_name.as_deref(), Some("Mount Goode"));

    let camel = compact_personal_record(&json!({ "seconds": 60, "watts": 401 }));
    assert_eq!(camel.seconds, Some(60.0));
    assert_eq!(camel.watts, Some(401.0));
}

#[test]
fn iso_date_slices_leading_calendar_dates() {
    assert_eq!(to_iso_date("2024-03-01T10:00:00Z").as_deref(), Some("2024-03-01"));
    assert_eq!(to_iso_date("2024-03-01").as_deref(), Some("2024-03-01"));
    assert!(to_iso_date("bogus").is_none());
}

#[test]
fn pick_tolerates_both_casings() {
    let value = json!({ "Tss": 88, "name": "x" });
    assert_eq!(pick(&value, "tss").and_then(serde_json::Value::as_i64), Some(88));
    assert_eq!(
        pick(&value, "Name").and_then(serde_json::Value::as_str),
        Some("x")
    );
    assert!(pick(&value, "missing").is_none());
}
