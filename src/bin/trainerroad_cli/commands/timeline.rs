// ABOUTME: timeline command: summarize the resolved base data for either mode

use anyhow::Context as _;
use serde_json::json;
use trainerroad_export::context::ContextData;
use trainerroad_export::timezone::date_only_today;

use super::{generated_at, member_json, public_member_json, CommandEnv};
use crate::output::write_payload;

pub async fn timeline(env: &CommandEnv, full: bool) -> anyhow::Result<()> {
    let context = env.resolve().await?;

    match &context.data {
        ContextData::Private { timeline } => {
            let member = context
                .require_private("timeline")
                .context("private context lost its identity")?
                .member;
            let mut payload = json!({
                "mode": "private",
                "generatedAt": generated_at(),
                "member": member_json(member),
                "counts": {
                    "activities": timeline.activities.len(),
                    "plannedActivities": timeline.planned_activities.len(),
                    "events": timeline.events.len(),
                },
            });
            if full {
                payload["timeline"] =
                    serde_json::to_value(timeline).context("serializing timeline")?;
            }

            let text = if full {
                None
            } else {
                Some(
                    [
                        "Mode: private".to_owned(),
                        format!("User: {} ({})", member.username, member.member_id),
                        format!("Activities: {}", timeline.activities.len()),
                        format!("Planned: {}", timeline.planned_activities.len()),
                        format!("Events: {}", timeline.events.len()),
                        "Tip: add --json for machine output or --full --json for the full payload."
                            .to_owned(),
                    ]
                    .join("\n"),
                )
            };
            write_payload(&payload, &env.render, text).await
        }
        ContextData::Public { days, .. } => {
            let today = date_only_today(env.zone);
            let ride_days = days
                .iter()
                .filter(|day| day.has_rides || day.tss > 0.0)
                .count();
            let future_planned_days = days
                .iter()
                .filter(|day| day.date >= today && day.planned_tss_total > 0.0)
                .count();
            let limitations = json!([
                "Public mode does not expose detailed workout records.",
                "Use authenticated private mode for full workout detail.",
            ]);
            let mut payload = json!({
                "mode": "public",
                "generatedAt": generated_at(),
                "member": public_member_json(&context.target_username),
                "counts": {
                    "days": days.len(),
                    "rideDays": ride_days,
                    "futurePlannedDays": future_planned_days,
                },
                "limitations": limitations,
            });
            if full {
                let mut sorted = days.clone();
                sorted.sort_by(|a, b| a.date.cmp(&b.date));
                payload["days"] = serde_json::to_value(sorted).context("serializing days")?;
            }

            let text = if full {
                None
            } else {
                Some(
                    [
                        "Mode: public".to_owned(),
                        format!("Profile: {}", context.target_username),
                        format!("Total days: {}", days.len()),
                        format!("Ride days: {ride_days}"),
                        format!("Future planned days: {future_planned_days}"),
                        "Limitations: day-level load/plan signal only.".to_owned(),
                    ]
                    .join("\n"),
                )
            };
            write_payload(&payload, &env.render, text).await
        }
    }
}
