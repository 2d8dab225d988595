// ABOUTME: plan command: current plan, phases, or all plans, fetched concurrently

use anyhow::Context as _;
use serde_json::json;
use trainerroad_export::errors::ExportError;
use trainerroad_export::filters::apply_filters;
use trainerroad_export::normalize::{
    compact_current_plan, compact_plan_phase, compact_plan_summary, to_iso_date,
};

use super::records::{count_of, field_display, field_str, filtered_text, records_of, reduce_if_records_only};
use super::{generated_at, member_json, CommandEnv, FilterArgs};
use crate::output::write_payload;

pub async fn plan(env: &CommandEnv, view: &str, full: bool, filters: &FilterArgs) -> anyhow::Result<()> {
    let view = view.trim().to_lowercase();
    if !matches!(view.as_str(), "current" | "phases" | "plans") {
        return Err(ExportError::invalid_input(format!(
            "invalid --view \"{view}\"; expected one of: current, phases, plans"
        ))
        .into());
    }

    let config = filters.to_config()?;
    let context = env.resolve().await?;
    let private = context.require_private("plan")?;
    let member = private.member.clone();

    let (current_raw, all_raw, phases_raw) = tokio::try_join!(
        context.client.get_current_custom_plan(&member.username),
        context.client.get_all_user_plans(&member.username),
        context.client.get_plan_phases(&member.username),
    )?;

    let current_plan = compact_current_plan(current_raw.as_ref());
    let plans: Vec<_> = all_raw.iter().map(compact_plan_summary).collect();
    let phases: Vec<_> = phases_raw.iter().map(compact_plan_phase).collect();

    let outcome = match view.as_str() {
        "current" => {
            let records: Vec<_> = current_plan.clone().into_iter().collect();
            apply_filters(&records, &config)?
        }
        "plans" => apply_filters(&plans, &config)?,
        _ => apply_filters(&phases, &config)?,
    };

    let mut payload = json!({
        "mode": "private",
        "generatedAt": generated_at(),
        "command": "plan",
        "query": { "view": view, "full": full },
        "filters": outcome.summary,
        "member": member_json(&member),
        "counts": {
            "plans": plans.len(),
            "phases": phases.len(),
            "currentPlan": current_plan.as_ref().map_or(0, |_| 1),
        },
        "currentPlan": current_plan,
        "count": outcome.records.len(),
        "records": outcome.records,
    });
    if full || view == "plans" {
        payload["plans"] = serde_json::to_value(&plans).context("serializing plans")?;
    }
    if full || view == "phases" {
        payload["phases"] = serde_json::to_value(&phases).context("serializing phases")?;
    }
    let payload = reduce_if_records_only(payload, filters);

    let text = if filters.is_active() || filters.records_only {
        filtered_text(
            format!("Plan view={view} records={}", count_of(&payload)),
            &payload,
        )
    } else {
        let mut lines = vec![format!("Plan view={view} records={}", count_of(&payload))];
        for record in records_of(&payload) {
            let name = field_str(record, "name")
                .or_else(|| field_str(record, "planName"))
                .unwrap_or_else(|| "(unnamed)".into());
            let end = field_str(record, "end")
                .and_then(|raw| to_iso_date(&raw))
                .unwrap_or_else(|| "n/a".into());
            lines.push(format!(
                "- {name} {} -> {end}",
                field_display(record, "dateOnly"),
            ));
        }
        lines.join("\n")
    };
    write_payload(&payload, &env.render, Some(text)).await
}
