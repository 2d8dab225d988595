// ABOUTME: Pure mappers from raw upstream payloads to stable compact records
// ABOUTME: Tolerates both field casings and substitutes null instead of failing a batch

use std::collections::{BTreeSet, HashMap};

use chrono_tz::Tz;
use serde_json::Value;

use crate::constants::{annotation_type_label, zone_meta};
use crate::models::{
    AiFtpEligibility, CalendarDate, CareerLevels, CompactAnnotation, CompactEvent,
    CompactPersonalRecord, CompactWeight, CurrentPlan, DayAggregate, FitnessThreshold, FtpPoint,
    PlanPhase, PlanSummary, PlannedActivity, PublicTss, RawAnnotation, RawCurrentPlan, RawEvent,
    RawPersonalRecord, RawPlanPhase, RawPlanSummary, RawWeight, TimelineActivity, ZoneLevel,
};
use crate::timezone::{instant_date_only, is_date_only, parse_timestamp, to_local_date_only};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Tolerant field lookup on a JSON object: the key as given, then with the
/// first letter upper-cased, then lower-cased.
#[must_use]
pub fn pick<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let object = value.as_object()?;
    if let Some(found) = object.get(key) {
        return Some(found);
    }
    for flipped in [flip_first(key, true), flip_first(key, false)] {
        if flipped != key {
            if let Some(found) = object.get(&flipped) {
                return Some(found);
            }
        }
    }
    None
}

fn flip_first(key: &str, upper: bool) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => {
            let first = if upper {
                first.to_ascii_uppercase()
            } else {
                first.to_ascii_lowercase()
            };
            std::iter::once(first).chain(chars).collect()
        }
        None => String::new(),
    }
}

/// Numeric view of a JSON value: numbers directly, numeric strings parsed.
#[must_use]
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|n| n.is_finite()),
        Value::String(raw) => raw.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Canonical `YYYY-MM-DD` from an upstream date-ish string.
///
/// Strings that already lead with a calendar date are sliced; anything else
/// goes through timestamp parsing with the assume-UTC policy.
#[must_use]
pub fn to_iso_date(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if let Some(prefix) = trimmed.get(..10) {
        if is_date_only(prefix) {
            return Some(prefix.to_owned());
        }
    }
    parse_timestamp(trimmed, true).map(|instant| instant_date_only(instant, chrono_tz::UTC))
}

/// Flatten the nested week-of-days public aggregate into day records.
///
/// Weeks of irregular length are fine; days without a date are dropped, and
/// a repeated date keeps its first occurrence so the result stays unique.
#[must_use]
pub fn flatten_public_days(public_tss: &PublicTss) -> Vec<DayAggregate> {
    let mut seen = BTreeSet::new();
    let mut days = Vec::new();
    for week in &public_tss.tss_by_day {
        for day in week {
            let Some(date) = day.date.as_deref().and_then(to_iso_date) else {
                continue;
            };
            if !seen.insert(date.clone()) {
                continue;
            }
            let planned_tr = day.planned_tss_trainer_road.unwrap_or(0.0);
            let planned_other = day.planned_tss_other.unwrap_or(0.0);
            days.push(DayAggregate {
                date,
                tss: day.tss.unwrap_or(0.0),
                tss_trainer_road: day.tss_trainer_road.unwrap_or(0.0),
                tss_other: day.tss_other.unwrap_or(0.0),
                planned_tss_trainer_road: planned_tr,
                planned_tss_other: planned_other,
                planned_tss_total: planned_tr + planned_other,
                has_rides: day.has_rides.unwrap_or(false),
            });
        }
    }
    days
}

/// Compact one raw calendar event.
#[must_use]
pub fn compact_event(raw: &Value) -> CompactEvent {
    let event: RawEvent = serde_json::from_value(raw.clone()).unwrap_or_default();
    CompactEvent {
        date_only: event.date.as_ref().map(CalendarDate::date_only),
        id: event.id,
        name: event.name,
        date: event.date,
        time_of_day: event.time_of_day,
        started: event.started,
        race_priority: event.race_priority,
        activity_type: event.activity_type,
        activity_event_type: event.activity_event_type,
        tss: event.tss,
        activity_tss: event.activity_tss,
        is_triathlon_type: event.is_triathlon_type,
        manually_completed: event.manually_completed,
    }
}

/// Compact one raw calendar annotation.
///
/// Unknown type codes map to `"unknown"`; the raw duration in seconds is
/// rounded to whole days.
#[must_use]
pub fn compact_annotation(raw: &Value) -> CompactAnnotation {
    let annotation: RawAnnotation = serde_json::from_value(raw.clone()).unwrap_or_default();
    let label = annotation_type_label(annotation.type_id).to_owned();
    let duration_days = annotation
        .duration
        .filter(|seconds| seconds.is_finite())
        .map(|seconds| (seconds / SECONDS_PER_DAY).round() as i64);
    CompactAnnotation {
        date_only: annotation.date.as_ref().map(CalendarDate::date_only),
        id: annotation.id,
        kind: label.clone(),
        type_id: annotation.type_id,
        type_label: label.clone(),
        record_type: label,
        date: annotation.date,
        duration_seconds: annotation.duration,
        duration_days,
        group_id: annotation.group_id,
    }
}

/// Compact one raw weight-history entry.
#[must_use]
pub fn compact_weight(raw: &RawWeight) -> CompactWeight {
    CompactWeight {
        id: raw.id,
        value: raw.value.as_ref().and_then(value_as_f64),
        units: raw.units.clone(),
        date_only: raw.date.as_deref().and_then(to_iso_date),
        date: raw.date.clone(),
    }
}

/// Compact one raw plan summary.
#[must_use]
pub fn compact_plan_summary(raw: &RawPlanSummary) -> PlanSummary {
    PlanSummary {
        id: raw.id,
        name: raw.name.clone(),
        discipline: raw.discipline.clone(),
        volume: raw.volume.clone(),
        phase: raw.phase.clone(),
        date: raw.start.clone(),
        date_only: raw.start.as_deref().and_then(to_iso_date),
        start: raw.start.clone(),
        end: raw.end.clone(),
        is_ad_hoc: raw.is_ad_hoc,
        planned_activity_group_id: raw.planned_activity_group_id,
    }
}

/// Compact one raw plan phase.
#[must_use]
pub fn compact_plan_phase(raw: &RawPlanPhase) -> PlanPhase {
    PlanPhase {
        id: raw.id,
        custom_plan_id: raw.custom_plan_id,
        kind: raw.kind.clone(),
        volume: raw.volume.clone(),
        plan_id: raw.plan_id,
        plan_name: raw.plan_name.clone(),
        date: raw.start.clone(),
        date_only: raw.start.as_deref().and_then(to_iso_date),
        start: raw.start.clone(),
        end: raw.end.clone(),
        is_masters: raw.is_masters,
        is_polarized: raw.is_polarized,
    }
}

/// Compact the current custom plan with its phases.
#[must_use]
pub fn compact_current_plan(raw: Option<&RawCurrentPlan>) -> Option<CurrentPlan> {
    let plan = raw?;
    let phases: Vec<PlanPhase> = plan.phases.iter().map(compact_plan_phase).collect();
    Some(CurrentPlan {
        id: plan.id,
        name: plan.name.clone(),
        member_id: plan.member_id,
        discipline: plan.discipline.clone(),
        volume: plan.volume.clone(),
        date: plan.start.clone(),
        date_only: plan.start.as_deref().and_then(to_iso_date),
        start: plan.start.clone(),
        end: plan.end.clone(),
        can_edit: plan.can_edit,
        current_phase: plan.current_phase.clone(),
        current_phase_start: plan.current_phase_start.clone(),
        current_phase_end: plan.current_phase_end.clone(),
        planned_activity_group_type: plan.planned_activity_group_type.clone(),
        auto_update_applied: plan.auto_update_applied,
        phase_count: phases.len(),
        phases,
    })
}

/// Join raw per-zone levels with AI-projected and AI-current levels into one
/// record per zone.
///
/// Zones absent from the static metadata table get a synthesized
/// `progression-<id>` key and sort after every known zone.
#[must_use]
pub fn build_levels_by_zone(
    levels: &CareerLevels,
    eligibility: Option<&AiFtpEligibility>,
) -> Vec<ZoneLevel> {
    let detection = eligibility
        .and_then(|payload| payload.additional_data.as_ref())
        .and_then(|data| data.detection.as_ref());
    let ai_projected: HashMap<i64, _> = detection
        .map(|d| {
            d.projected_progression_levels
                .iter()
                .map(|level| (level.progression_id, level))
                .collect()
        })
        .unwrap_or_default();
    let ai_current: HashMap<i64, _> = detection
        .map(|d| {
            d.current_progression_levels
                .iter()
                .map(|level| (level.progression_id, level))
                .collect()
        })
        .unwrap_or_default();

    let mut records: Vec<ZoneLevel> = levels
        .levels
        .iter()
        .filter_map(|(raw_id, value)| {
            let progression_id: i64 = raw_id.trim().parse().ok()?;
            let (zone_key, zone_label, sort_order) = match zone_meta(progression_id) {
                Some(meta) => (
                    meta.zone_key.to_owned(),
                    meta.zone_label.to_owned(),
                    meta.sort_order,
                ),
                None => (
                    format!("progression-{progression_id}"),
                    format!("Progression {progression_id}"),
                    1000 + progression_id,
                ),
            };
            let projected = ai_projected.get(&progression_id);
            let current = ai_current.get(&progression_id);
            let change = value.change_event.as_ref();
            let change_date = change.and_then(|event| event.date.clone());
            let ai_current_level = current.and_then(|level| level.previous_display_level);
            let ai_projected_level = projected.and_then(|level| level.display_final_level);
            Some(ZoneLevel {
                progression_id,
                kind: zone_key.clone(),
                record_type: zone_key.clone(),
                zone_key,
                zone_label,
                sort_order,
                recent_level: value.recent,
                endpoint_predicted_level: value.predicted,
                activity_id: value.activity_id,
                date_only: change_date.as_deref().and_then(to_iso_date),
                date: change_date.clone(),
                change_date,
                change_reason: change.and_then(|event| event.reason.clone()),
                change_from: change.and_then(|event| event.level.as_ref()).and_then(|span| span.from),
                change_to: change.and_then(|event| event.level.as_ref()).and_then(|span| span.to),
                change_delta: change.and_then(|event| event.delta),
                ai_current_display_level: ai_current_level,
                ai_projected_display_level: ai_projected_level,
                ai_delta: match (ai_projected_level, ai_current_level) {
                    (Some(projected), Some(current)) => Some(projected - current),
                    _ => None,
                },
            })
        })
        .collect();

    records.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then(a.progression_id.cmp(&b.progression_id))
    });
    records
}

/// Normalize raw FTP history rows: dateless or non-numeric rows are dropped,
/// the rest sort ascending by timestamp.
#[must_use]
pub fn normalize_ftp_history(raw: &[Value]) -> Vec<FtpPoint> {
    let mut points: Vec<FtpPoint> = raw
        .iter()
        .filter_map(|row| {
            let date_raw = pick(row, "date")?.as_str()?;
            let value = pick(row, "value").and_then(value_as_f64)?;
            let instant = parse_timestamp(date_raw, true)?;
            Some(FtpPoint {
                date: instant.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
                date_only: instant_date_only(instant, chrono_tz::UTC),
                value,
            })
        })
        .collect();
    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}

/// Normalize raw fitness-threshold rows from the timeline, ascending by date.
#[must_use]
pub fn normalize_fitness_thresholds(raw: &[Value]) -> Vec<FitnessThreshold> {
    let mut rows: Vec<FitnessThreshold> = raw
        .iter()
        .filter_map(|row| {
            let date_raw = pick(row, "date")?.as_str()?;
            let value = pick(row, "value").and_then(value_as_f64)?;
            let instant = parse_timestamp(date_raw, true)?;
            Some(FitnessThreshold {
                id: pick(row, "id").and_then(Value::as_i64),
                date: instant.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
                date_only: instant_date_only(instant, chrono_tz::UTC),
                value,
                is_applied: pick(row, "isApplied").and_then(Value::as_bool).unwrap_or(false),
                is_enabled: pick(row, "isEnabled").and_then(Value::as_bool),
                source: pick(row, "source").cloned(),
                viewed: pick(row, "viewed").cloned(),
            })
        })
        .collect();
    rows.sort_by(|a, b| a.date.cmp(&b.date));
    rows
}

/// Compact one raw personal-record row.
#[must_use]
pub fn compact_personal_record(raw: &Value) -> CompactPersonalRecord {
    let record: RawPersonalRecord = serde_json::from_value(raw.clone()).unwrap_or_default();
    CompactPersonalRecord {
        seconds: record.seconds,
        watts: record.watts,
        workout_date: record.workout_date,
        workout_seconds: record.workout_seconds,
        workout_guid: record.workout_guid,
        workout_record_id: record.workout_record_id,
        workout_record_name: record.workout_record_name,
        survey_response: record.survey_response,
    }
}

/// Planned workouts scheduled inside an inclusive date range.
#[must_use]
pub fn filter_future_planned(
    planned: &[PlannedActivity],
    from_date: &str,
    to_date: Option<&str>,
) -> Vec<PlannedActivity> {
    planned
        .iter()
        .filter(|item| {
            let date = item.date.date_only();
            if date.as_str() < from_date {
                return false;
            }
            if let Some(to) = to_date {
                if date.as_str() > to {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}

/// Completed activities whose local start date falls inside the range,
/// newest first. Activities with unparsable starts are excluded.
#[must_use]
pub fn filter_past_activities(
    activities: &[TimelineActivity],
    from_date: Option<&str>,
    to_date: Option<&str>,
    zone: Tz,
) -> Vec<TimelineActivity> {
    let mut selected: Vec<TimelineActivity> = activities
        .iter()
        .filter(|item| {
            let Some(started_date) = item
                .started
                .as_deref()
                .and_then(|raw| to_local_date_only(raw, zone, true))
            else {
                return false;
            };
            if let Some(from) = from_date {
                if started_date.as_str() < from {
                    return false;
                }
            }
            if let Some(to) = to_date {
                if started_date.as_str() > to {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect();

    selected.sort_by(|a, b| {
        let left = a.started.as_deref().and_then(|raw| parse_timestamp(raw, true));
        let right = b.started.as_deref().and_then(|raw| parse_timestamp(raw, true));
        right.cmp(&left)
    });
    selected
}

/// Count planned slots in a range that carry a real workout (a library
/// workout id, or the plain-workout type code).
#[must_use]
pub fn count_planned_workouts_in_range(
    planned: &[PlannedActivity],
    from_date: &str,
    to_date: &str,
) -> usize {
    planned
        .iter()
        .filter(|item| {
            let date = item.date.date_only();
            if date.as_str() < from_date || date.as_str() > to_date {
                return false;
            }
            item.workout_id.is_some()
                || item
                    .kind
                    .as_ref()
                    .and_then(value_as_f64)
                    .is_some_and(|kind| (kind - 1.0).abs() < f64::EPSILON)
        })
        .count()
}
