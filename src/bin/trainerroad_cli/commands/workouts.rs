// ABOUTME: today/future/past workout commands over both query modes
// ABOUTME: Private mode serves timeline subsets with optional batched detail fetches

use chrono_tz::Tz;
use serde_json::{json, Value};
use trainerroad_export::context::{ContextData, QueryContext};
use trainerroad_export::filters::{apply_filters, FilterOutcome};
use trainerroad_export::models::DayAggregate;
use trainerroad_export::normalize::{
    filter_future_planned, filter_past_activities, pick, value_as_f64,
};
use trainerroad_export::timezone::{date_only_shift, summarize_activity_window};

use super::records::{count_of, field_display, field_str, filtered_text, records_of, reduce_if_records_only};
use super::{
    ensure_range, generated_at, member_json, public_member_json, resolve_date_or, CommandEnv,
    FilterArgs,
};
use crate::output::write_payload;

pub async fn future(env: &CommandEnv, days: i64, details: bool, filters: &FilterArgs) -> anyhow::Result<()> {
    let config = filters.to_config()?;
    let from_date = resolve_date_or(filters.from.as_deref(), date_only_shift(0, env.zone))?;
    let to_date = resolve_date_or(filters.to.as_deref(), date_only_shift(days, env.zone))?;
    ensure_range(&from_date, &to_date)?;

    let context = env.resolve().await?;
    if let ContextData::Private { timeline } = &context.data {
        let member = context.require_private("future")?.member.clone();
        let subset = filter_future_planned(&timeline.planned_activities, &from_date, Some(to_date.as_str()));

        let outcome = if details {
            let ids: Vec<i64> = subset.iter().map(|item| item.id).collect();
            let detail_records = context
                .client
                .get_planned_activities_by_ids(member.member_id, &member.username, &ids)
                .await?;
            apply_filters(&detail_records, &config)?
        } else {
            apply_filters(&subset, &config)?
        };

        let payload = json!({
            "mode": "private",
            "generatedAt": generated_at(),
            "command": "future",
            "query": { "fromDate": from_date, "toDate": to_date, "days": days, "details": details },
            "filters": outcome.summary,
            "member": member_json(&member),
            "count": outcome.records.len(),
            "records": outcome.records,
        });
        let payload = reduce_if_records_only(payload, filters);

        let header = format!(
            "Future workouts ({}) {from_date}..{to_date}",
            count_of(&payload)
        );
        let text = if filters.is_active() || filters.records_only {
            filtered_text(header, &payload)
        } else {
            let mut lines = vec![header];
            for item in records_of(&payload) {
                if details {
                    lines.push(format!(
                        "- {} {} | id={} | tss={} | duration={}s",
                        planned_date_display(item),
                        field_str(item, "name").unwrap_or_else(|| "(untitled)".into()),
                        field_display(item, "id"),
                        field_display(item, "tss"),
                        field_display(item, "durationInSeconds"),
                    ));
                } else {
                    lines.push(format!(
                        "- {} id={} type={} tss={}",
                        planned_date_display(item),
                        field_display(item, "id"),
                        field_display(item, "type"),
                        field_display(item, "tss"),
                    ));
                }
            }
            lines.join("\n")
        };
        return write_payload(&payload, &env.render, Some(text)).await;
    }

    let mut records: Vec<DayAggregate> = context
        .public_days()
        .iter()
        .filter(|day| day.date >= from_date && day.date <= to_date && day.planned_tss_total > 0.0)
        .cloned()
        .collect();
    records.sort_by(|a, b| a.date.cmp(&b.date));
    let outcome = apply_filters(&records, &config)?;

    let payload = public_payload(
        "future",
        json!({ "fromDate": from_date, "toDate": to_date, "days": days, "details": details }),
        &context,
        &outcome,
        &[
            "Public mode returns day-level planned TSS only.",
            "Detailed workout names/durations are unavailable in public mode.",
        ],
    );
    let payload = reduce_if_records_only(payload, filters);

    let header = format!(
        "Future plan signal ({}) {from_date}..{to_date} [public mode]",
        count_of(&payload)
    );
    let text = if filters.is_active() || filters.records_only {
        filtered_text(header, &payload)
    } else {
        let mut lines = vec![header];
        for day in records_of(&payload) {
            lines.push(format!(
                "- {} plannedTss={} (TR={}, other={})",
                field_display(day, "date"),
                field_display(day, "plannedTssTotal"),
                field_display(day, "plannedTssTrainerRoad"),
                field_display(day, "plannedTssOther"),
            ));
        }
        lines.push("Limitations: day-level planned TSS only.".into());
        lines.join("\n")
    };
    write_payload(&payload, &env.render, Some(text)).await
}

pub async fn past(
    env: &CommandEnv,
    days: i64,
    limit: usize,
    details: bool,
    filters: &FilterArgs,
) -> anyhow::Result<()> {
    let config = filters.to_config()?;
    let from_date = resolve_date_or(filters.from.as_deref(), date_only_shift(-days, env.zone))?;
    let to_date = resolve_date_or(filters.to.as_deref(), date_only_shift(0, env.zone))?;
    ensure_range(&from_date, &to_date)?;

    let context = env.resolve().await?;
    if let ContextData::Private { timeline } = &context.data {
        let member = context.require_private("past")?.member.clone();
        let mut selected =
            filter_past_activities(&timeline.activities, Some(from_date.as_str()), Some(to_date.as_str()), env.zone);
        selected.truncate(limit);

        let (outcome, personal_records) = if details {
            let ids: Vec<i64> = selected.iter().map(|item| item.id).collect();
            let detail_records = context
                .client
                .get_activities_by_ids(member.member_id, &member.username, &ids)
                .await?;
            let personal_records = context
                .client
                .get_personal_records_by_activity_ids(member.member_id, &member.username, &ids)
                .await?;
            let enriched: Vec<Value> = detail_records
                .iter()
                .map(|item| {
                    let with_count = with_personal_record_count(item, &personal_records);
                    with_window_summary(&with_count, env.zone)
                })
                .collect();
            (apply_filters(&enriched, &config)?, Some(personal_records))
        } else {
            let enriched: Vec<Value> = selected
                .iter()
                .filter_map(|item| serde_json::to_value(item).ok())
                .map(|value| with_window_summary(&value, env.zone))
                .collect();
            (apply_filters(&enriched, &config)?, None)
        };

        let mut payload = json!({
            "mode": "private",
            "generatedAt": generated_at(),
            "command": "past",
            "query": { "fromDate": from_date, "toDate": to_date, "days": days, "limit": limit, "details": details },
            "filters": outcome.summary,
            "member": member_json(&member),
            "count": outcome.records.len(),
            "records": outcome.records,
        });
        if let Some(personal_records) = personal_records {
            payload["personalRecords"] = Value::Object(personal_records);
        }
        let payload = reduce_if_records_only(payload, filters);

        let header = if details {
            format!(
                "Past workouts detailed ({}) {from_date}..{to_date}",
                count_of(&payload)
            )
        } else {
            format!("Past workouts ({}) {from_date}..{to_date}", count_of(&payload))
        };
        let text = if filters.is_active() || filters.records_only {
            filtered_text(header, &payload)
        } else {
            let mut lines = vec![header];
            for item in records_of(&payload) {
                let overnight = if item
                    .get("crossesMidnightLocal")
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
                {
                    " | overnight=true"
                } else {
                    ""
                };
                let when = field_str(item, "startedAtLocal")
                    .or_else(|| field_str(item, "started"))
                    .unwrap_or_else(|| "(unknown-start)".into());
                if details {
                    lines.push(format!(
                        "- {when} {} | id={} | tss={} | duration={}s | prs={}{overnight}",
                        field_str(item, "name").unwrap_or_else(|| "(untitled)".into()),
                        field_display(item, "id"),
                        field_display(item, "tss"),
                        field_display(item, "durationInSeconds"),
                        field_display(item, "personalRecordCount"),
                    ));
                } else {
                    lines.push(format!(
                        "- {when} id={} type={} tss={}{overnight}",
                        field_display(item, "id"),
                        field_display(item, "type"),
                        field_display(item, "tss"),
                    ));
                }
            }
            lines.join("\n")
        };
        return write_payload(&payload, &env.render, Some(text)).await;
    }

    let mut records: Vec<DayAggregate> = context
        .public_days()
        .iter()
        .filter(|day| {
            day.date >= from_date && day.date <= to_date && (day.has_rides || day.tss > 0.0)
        })
        .cloned()
        .collect();
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records.truncate(limit);
    let outcome = apply_filters(&records, &config)?;

    let payload = public_payload(
        "past",
        json!({ "fromDate": from_date, "toDate": to_date, "days": days, "limit": limit, "details": details }),
        &context,
        &outcome,
        &[
            "Public mode returns day-level historical load signals only.",
            "Detailed completed workout records are unavailable in public mode.",
        ],
    );
    let payload = reduce_if_records_only(payload, filters);

    let header = format!(
        "Past load signal ({}) {from_date}..{to_date} [public mode]",
        count_of(&payload)
    );
    let text = if filters.is_active() || filters.records_only {
        filtered_text(header, &payload)
    } else {
        let mut lines = vec![header];
        for day in records_of(&payload) {
            lines.push(format!(
                "- {} tss={} (TR={}, other={}) hasRides={}",
                field_display(day, "date"),
                field_display(day, "tss"),
                field_display(day, "tssTrainerRoad"),
                field_display(day, "tssOther"),
                field_display(day, "hasRides"),
            ));
        }
        lines.push("Limitations: day-level load signals only.".into());
        lines.join("\n")
    };
    write_payload(&payload, &env.render, Some(text)).await
}

pub async fn today(
    env: &CommandEnv,
    date: Option<&str>,
    details: bool,
    filters: &FilterArgs,
) -> anyhow::Result<()> {
    let config = filters.to_config()?;
    let today = resolve_date_or(date, date_only_shift(0, env.zone))?;

    let context = env.resolve().await?;
    if let ContextData::Private { timeline } = &context.data {
        let member = context.require_private("today")?.member.clone();
        let planned_today = filter_future_planned(&timeline.planned_activities, &today, Some(today.as_str()));
        let activities_today =
            filter_past_activities(&timeline.activities, Some(today.as_str()), Some(today.as_str()), env.zone);

        let (planned_records, activity_records, personal_records) = if details {
            let planned_ids: Vec<i64> = planned_today.iter().map(|item| item.id).collect();
            let activity_ids: Vec<i64> = activities_today.iter().map(|item| item.id).collect();
            let planned = context
                .client
                .get_planned_activities_by_ids(member.member_id, &member.username, &planned_ids)
                .await?;
            let activities = context
                .client
                .get_activities_by_ids(member.member_id, &member.username, &activity_ids)
                .await?;
            let personal = context
                .client
                .get_personal_records_by_activity_ids(member.member_id, &member.username, &activity_ids)
                .await?;
            (planned, activities, personal)
        } else {
            let planned: Vec<Value> = planned_today
                .iter()
                .filter_map(|item| serde_json::to_value(item).ok())
                .collect();
            let activities: Vec<Value> = activities_today
                .iter()
                .filter_map(|item| serde_json::to_value(item).ok())
                .collect();
            (planned, activities, serde_json::Map::new())
        };

        let completed: Vec<Value> = activity_records
            .iter()
            .map(|item| {
                let with_count = with_personal_record_count(item, &personal_records);
                with_window_summary(&with_count, env.zone)
            })
            .collect();
        let mut combined: Vec<Value> = Vec::with_capacity(planned_records.len() + completed.len());
        combined.extend(
            planned_records
                .iter()
                .map(|item| with_record_type(item, "planned")),
        );
        combined.extend(completed.iter().map(|item| with_record_type(item, "completed")));
        let outcome = apply_filters(&combined, &config)?;

        let payload = json!({
            "mode": "private",
            "generatedAt": generated_at(),
            "command": "today",
            "query": { "date": today, "details": details },
            "filters": outcome.summary,
            "member": member_json(&member),
            "counts": { "planned": planned_records.len(), "completed": completed.len() },
            "planned": planned_records,
            "completed": completed,
            "personalRecords": personal_records,
            "count": outcome.records.len(),
            "records": outcome.records,
        });
        let payload = reduce_if_records_only(payload, filters);

        let text = if filters.is_active() || filters.records_only {
            filtered_text(format!("Today ({today})"), &payload)
        } else {
            let mut lines = vec![format!("Today ({today})")];
            if let Some(counts) = payload.get("counts") {
                lines.push(format!("Planned: {}", field_display(counts, "planned")));
                lines.push(format!("Completed: {}", field_display(counts, "completed")));
            }
            for item in payload
                .get("planned")
                .and_then(Value::as_array)
                .map_or(&[][..], Vec::as_slice)
            {
                lines.push(format!(
                    "- planned {} id={} tss={}",
                    planned_date_display(item),
                    field_display(item, "id"),
                    field_display(item, "tss"),
                ));
            }
            for item in payload
                .get("completed")
                .and_then(Value::as_array)
                .map_or(&[][..], Vec::as_slice)
            {
                let overnight = if item
                    .get("crossesMidnightLocal")
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
                {
                    " | overnight=true"
                } else {
                    ""
                };
                let when = field_str(item, "startedAtLocal")
                    .or_else(|| field_str(item, "started"))
                    .unwrap_or_else(|| "(unknown-start)".into());
                lines.push(format!(
                    "- completed {when} id={} tss={}{overnight}",
                    field_display(item, "id"),
                    field_display(item, "tss"),
                ));
            }
            lines.join("\n")
        };
        return write_payload(&payload, &env.render, Some(text)).await;
    }

    let day = context
        .public_days()
        .iter()
        .find(|day| day.date == today)
        .cloned();
    let records: Vec<DayAggregate> = day.clone().into_iter().collect();
    let outcome = apply_filters(&records, &config)?;

    let mut payload = public_payload(
        "today",
        json!({ "date": today, "details": details }),
        &context,
        &outcome,
        &[
            "Public mode provides day-level load/plan signal only.",
            "No workout-level detail without authentication.",
        ],
    );
    payload["counts"] = json!({ "days": day.as_ref().map_or(0, |_| 1) });
    payload["day"] = serde_json::to_value(&day).unwrap_or(Value::Null);
    let payload = reduce_if_records_only(payload, filters);

    let text = if filters.is_active() || filters.records_only {
        filtered_text(format!("Today ({today}) [public mode]"), &payload)
    } else if let Some(day) = payload.get("day").filter(|value| !value.is_null()) {
        [
            format!("Today ({today}) [public mode]"),
            format!(
                "- tss={} (TR={}, other={})",
                field_display(day, "tss"),
                field_display(day, "tssTrainerRoad"),
                field_display(day, "tssOther"),
            ),
            format!(
                "- plannedTss={} (TR={}, other={})",
                field_display(day, "plannedTssTotal"),
                field_display(day, "plannedTssTrainerRoad"),
                field_display(day, "plannedTssOther"),
            ),
            format!("- hasRides={}", field_display(day, "hasRides")),
            "Limitations: day-level load/plan signal only.".to_owned(),
        ]
        .join("\n")
    } else {
        format!("Today ({today}) [public mode]\n- No day-level record returned.")
    };
    write_payload(&payload, &env.render, Some(text)).await
}

fn public_payload(
    command: &str,
    query: Value,
    context: &QueryContext,
    outcome: &FilterOutcome,
    limitations: &[&str],
) -> Value {
    json!({
        "mode": "public",
        "generatedAt": generated_at(),
        "command": command,
        "query": query,
        "filters": outcome.summary,
        "member": public_member_json(&context.target_username),
        "count": outcome.records.len(),
        "records": outcome.records,
        "limitations": limitations,
    })
}

/// Merge the activity's local time window into its JSON record; records
/// whose start cannot be parsed keep their original shape.
fn with_window_summary(record: &Value, zone: Tz) -> Value {
    let mut merged = record.clone();
    let Some(object) = merged.as_object_mut() else {
        return merged;
    };
    let Some(started) = pick(record, "started").and_then(Value::as_str) else {
        return merged;
    };
    let duration = pick(record, "durationInSeconds").and_then(value_as_f64);
    if let Some(summary) = summarize_activity_window(started, duration, zone) {
        if let Ok(Value::Object(map)) = serde_json::to_value(&summary) {
            object.extend(map);
        }
    }
    merged
}

fn with_personal_record_count(record: &Value, personal_records: &serde_json::Map<String, Value>) -> Value {
    let mut merged = record.clone();
    if let Some(object) = merged.as_object_mut() {
        let count = pick(record, "id")
            .and_then(Value::as_i64)
            .and_then(|id| personal_records.get(&id.to_string()))
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        object.insert("personalRecordCount".to_owned(), json!(count));
    }
    merged
}

fn with_record_type(record: &Value, record_type: &str) -> Value {
    let mut merged = record.clone();
    if let Some(object) = merged.as_object_mut() {
        if !object.contains_key("recordType") {
            object.insert("recordType".to_owned(), json!(record_type));
        }
    }
    merged
}

/// Planned records carry a `{year, month, day}` date object; render it as
/// the canonical date for text output.
fn planned_date_display(record: &Value) -> String {
    record
        .get("date")
        .and_then(|date| {
            let year = date.get("year").and_then(Value::as_i64)?;
            let month = date.get("month").and_then(Value::as_i64)?;
            let day = date.get("day").and_then(Value::as_i64)?;
            Some(format!("{year:04}-{month:02}-{day:02}"))
        })
        .unwrap_or_else(|| field_display(record, "dateOnly"))
}
