// ABOUTME: events/annotations/levels/weight-history command handlers
// ABOUTME: Private-only record listings run through the shared filter pipeline

use serde_json::{json, Value};
use trainerroad_export::filters::{apply_filters, FilterOutcome};
use trainerroad_export::normalize::{
    build_levels_by_zone, compact_annotation, compact_event, compact_weight,
};

use super::{generated_at, member_json, push_filter_lines, records_only_payload, CommandEnv, FilterArgs};
use crate::output::write_payload;

pub async fn events(env: &CommandEnv, full: bool, filters: &FilterArgs) -> anyhow::Result<()> {
    let config = filters.to_config()?;
    let context = env.resolve().await?;
    let view = context.require_private("events")?;
    let member = view.member.clone();

    let outcome = if full {
        apply_filters(&view.timeline.events, &config)?
    } else {
        let compact: Vec<_> = view.timeline.events.iter().map(compact_event).collect();
        apply_filters(&compact, &config)?
    };

    let payload = json!({
        "mode": "private",
        "generatedAt": generated_at(),
        "command": "events",
        "query": { "full": full },
        "filters": outcome.summary,
        "member": member_json(&member),
        "count": outcome.records.len(),
        "records": outcome.records,
    });
    let payload = reduce_if_records_only(payload, filters);

    let text = if filters.is_active() || filters.records_only || full {
        filtered_text(format!("Events ({})", count_of(&payload)), &payload)
    } else {
        let mut lines = vec![format!("Events ({})", count_of(&payload))];
        for event in records_of(&payload) {
            let when = field_str(event, "dateOnly")
                .or_else(|| field_str(event, "started"))
                .unwrap_or_else(|| "(unknown-date)".into());
            let name = field_str(event, "name").unwrap_or_else(|| "(unnamed-event)".into());
            lines.push(format!(
                "- {when} {name} | priority={} | tss={}",
                field_display(event, "racePriority"),
                field_display(event, "tss"),
            ));
        }
        lines.join("\n")
    };
    write_payload(&payload, &env.render, Some(text)).await
}

pub async fn annotations(env: &CommandEnv, full: bool, filters: &FilterArgs) -> anyhow::Result<()> {
    let config = filters.to_config()?;
    let context = env.resolve().await?;
    let view = context.require_private("annotations")?;
    let member = view.member.clone();

    let outcome = if full {
        apply_filters(&view.timeline.annotations, &config)?
    } else {
        let compact: Vec<_> = view
            .timeline
            .annotations
            .iter()
            .map(compact_annotation)
            .collect();
        apply_filters(&compact, &config)?
    };

    let payload = json!({
        "mode": "private",
        "generatedAt": generated_at(),
        "command": "annotations",
        "query": { "full": full },
        "filters": outcome.summary,
        "member": member_json(&member),
        "count": outcome.records.len(),
        "records": outcome.records,
    });
    let payload = reduce_if_records_only(payload, filters);

    let text = if filters.is_active() || filters.records_only || full {
        filtered_text(format!("Annotations ({})", count_of(&payload)), &payload)
    } else {
        let mut lines = vec![format!("Annotations ({})", count_of(&payload))];
        for annotation in records_of(&payload) {
            lines.push(format!(
                "- {} type={} durationDays={}",
                field_str(annotation, "dateOnly").unwrap_or_else(|| "(unknown-date)".into()),
                field_display(annotation, "typeLabel"),
                field_display(annotation, "durationDays"),
            ));
        }
        lines.join("\n")
    };
    write_payload(&payload, &env.render, Some(text)).await
}

pub async fn levels(env: &CommandEnv, filters: &FilterArgs) -> anyhow::Result<()> {
    let config = filters.to_config()?;
    let context = env.resolve().await?;
    let view = context.require_private("levels")?;
    let member = view.member.clone();

    let (levels_payload, eligibility) = tokio::try_join!(
        context
            .client
            .get_career_levels(member.member_id, &member.username),
        context
            .client
            .get_ai_ftp_eligibility(member.member_id, &member.username),
    )?;

    let records = build_levels_by_zone(&levels_payload, Some(&eligibility));
    let outcome: FilterOutcome = apply_filters(&records, &config)?;

    let ai_model_version = eligibility.model_version.clone().or_else(|| {
        eligibility
            .additional_data
            .as_ref()
            .and_then(|data| data.detection.as_ref())
            .and_then(|detection| detection.model_version.clone())
    });
    let payload = json!({
        "mode": "private",
        "generatedAt": generated_at(),
        "command": "levels",
        "filters": outcome.summary,
        "member": member_json(&member),
        "levelsTimestamp": levels_payload.timestamp,
        "aiModelVersion": ai_model_version,
        "count": outcome.records.len(),
        "records": outcome.records,
    });
    let payload = reduce_if_records_only(payload, filters);

    let text = if filters.is_active() || filters.records_only {
        filtered_text(
            format!("Progression levels ({})", count_of(&payload)),
            &payload,
        )
    } else {
        let mut lines = vec![format!("Progression levels ({})", count_of(&payload))];
        for record in records_of(&payload) {
            lines.push(format!(
                "- {} | recent={} | aiCurrent={} | aiProjected={} | delta={}",
                field_display(record, "zoneLabel"),
                field_display(record, "recentLevel"),
                field_display(record, "aiCurrentDisplayLevel"),
                field_display(record, "aiProjectedDisplayLevel"),
                field_display(record, "aiDelta"),
            ));
        }
        lines.join("\n")
    };
    write_payload(&payload, &env.render, Some(text)).await
}

pub async fn weight_history(env: &CommandEnv, filters: &FilterArgs) -> anyhow::Result<()> {
    let config = filters.to_config()?;
    let context = env.resolve().await?;
    let view = context.require_private("weight-history")?;
    let member = view.member.clone();

    let raw = context
        .client
        .get_weight_history(member.member_id, &member.username)
        .await?;
    let records: Vec<_> = raw.iter().map(compact_weight).collect();
    let outcome = apply_filters(&records, &config)?;

    let payload = json!({
        "mode": "private",
        "generatedAt": generated_at(),
        "command": "weight-history",
        "filters": outcome.summary,
        "member": member_json(&member),
        "count": outcome.records.len(),
        "records": outcome.records,
    });
    let payload = reduce_if_records_only(payload, filters);

    let text = if filters.is_active() || filters.records_only {
        filtered_text(format!("Weight history ({})", count_of(&payload)), &payload)
    } else {
        let mut lines = vec![format!("Weight history ({})", count_of(&payload))];
        for record in records_of(&payload) {
            lines.push(format!(
                "- {} {} (units={})",
                field_str(record, "dateOnly").unwrap_or_else(|| "(unknown-date)".into()),
                field_display(record, "value"),
                field_display(record, "units"),
            ));
        }
        lines.join("\n")
    };
    write_payload(&payload, &env.render, Some(text)).await
}

pub(super) fn reduce_if_records_only(payload: Value, filters: &FilterArgs) -> Value {
    if filters.records_only {
        records_only_payload(&payload)
    } else {
        payload
    }
}

pub(super) fn count_of(payload: &Value) -> u64 {
    payload.get("count").and_then(Value::as_u64).unwrap_or(0)
}

pub(super) fn records_of(payload: &Value) -> &[Value] {
    payload
        .get("records")
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

pub(super) fn field_str(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
}

pub(super) fn field_display(record: &Value, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => "n/a".to_owned(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

pub(super) fn filtered_text(header: String, payload: &Value) -> String {
    let mut lines = vec![header];
    let summary = payload.get("filters").cloned().unwrap_or(Value::Null);
    push_filter_lines(&mut lines, records_of(payload), &summary);
    if let Some(limitations) = payload.get("limitations").and_then(Value::as_array) {
        let joined = limitations
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!("Limitations: {joined}"));
    }
    lines.join("\n")
}
