// ABOUTME: ftp and ftp-prediction command handlers
// ABOUTME: ftp works in both modes; the prediction flow fans out four private fetches

use anyhow::Context as _;
use serde_json::{json, Value};
use tracing::debug;
use trainerroad_export::context::ContextData;
use trainerroad_export::models::FtpPoint;
use trainerroad_export::normalize::{
    count_planned_workouts_in_range, normalize_fitness_thresholds, normalize_ftp_history,
};
use trainerroad_export::timezone::{date_only_diff_days, date_only_shift, to_local_date_only};

use super::records::{field_display, records_of};
use super::{generated_at, member_json, public_member_json, CommandEnv};
use crate::output::write_payload;

pub async fn ftp(env: &CommandEnv, history_limit: usize) -> anyhow::Result<()> {
    let context = env.resolve().await?;

    let (full_history, mode_private, member) = match &context.data {
        ContextData::Private { .. } => {
            let member = context.require_private("ftp")?.member.clone();
            // Private mode still reads FTP history from the public aggregate;
            // a private profile simply yields no history.
            let history = match context.client.get_public_tss(&member.username).await {
                Ok(payload) => normalize_ftp_history(&payload.ftp_records_date),
                Err(error) => {
                    debug!(%error, "ftp history unavailable for private profile");
                    Vec::new()
                }
            };
            (history, true, Some(member))
        }
        ContextData::Public { public_tss, .. } => {
            (normalize_ftp_history(&public_tss.ftp_records_date), false, None)
        }
    };

    let records: &[FtpPoint] = if history_limit > 0 && full_history.len() > history_limit {
        &full_history[full_history.len() - history_limit..]
    } else {
        &full_history
    };
    let latest = full_history.last();

    let payload = if let Some(member) = &member {
        json!({
            "mode": "private",
            "generatedAt": generated_at(),
            "command": "ftp",
            "member": member_json(member),
            "currentFtp": member.ftp.or(latest.map(|point| point.value)),
            "ftpHistoryCount": full_history.len(),
            "query": { "historyLimit": history_limit },
            "records": records,
        })
    } else {
        json!({
            "mode": "public",
            "generatedAt": generated_at(),
            "command": "ftp",
            "member": public_member_json(&context.target_username),
            "currentFtp": latest.map(|point| point.value),
            "ftpHistoryCount": full_history.len(),
            "query": { "historyLimit": history_limit },
            "records": records,
            "limitations": [
                "Public mode can expose FTP history only when profile data is public.",
                "No AI FTP detection or private progression internals in public mode.",
            ],
        })
    };

    let mode_tag = if mode_private { "private" } else { "public" };
    let mut lines = vec![
        format!("FTP: {} [{mode_tag} mode]", field_display(&payload, "currentFtp")),
        format!("History points: {}", full_history.len()),
    ];
    for point in records_of(&payload) {
        lines.push(format!(
            "- {} ftp={}",
            field_display(point, "dateOnly"),
            field_display(point, "value"),
        ));
    }
    if !mode_private {
        lines.push("Limitations: history only when the profile is public.".into());
    }
    write_payload(&payload, &env.render, Some(lines.join("\n"))).await
}

pub async fn ftp_prediction(env: &CommandEnv) -> anyhow::Result<()> {
    let context = env.resolve().await?;
    let member = context.require_private("ftp-prediction")?.member.clone();

    // Independent fetches; the timeline is re-read so the threshold data is
    // as fresh as the detection payloads it is joined with.
    let (eligibility, failure_status, levels, timeline) = tokio::try_join!(
        context
            .client
            .get_ai_ftp_eligibility(member.member_id, &member.username),
        context
            .client
            .get_ai_ftp_failure_status(member.member_id, &member.username),
        context
            .client
            .get_career_levels(member.member_id, &member.username),
        context.client.get_timeline(member.member_id, &member.username),
    )?;

    let detection = eligibility
        .additional_data
        .as_ref()
        .and_then(|data| data.detection.as_ref());
    let projected_levels = detection
        .map(|d| d.projected_progression_levels.clone())
        .unwrap_or_default();
    let current_levels = detection
        .map(|d| d.current_progression_levels.clone())
        .unwrap_or_default();
    let next_availability = eligibility
        .additional_data
        .as_ref()
        .and_then(|data| data.next_ai_ftp_availability.clone());
    let next_availability_date_only = next_availability
        .as_deref()
        .and_then(|raw| to_local_date_only(raw, env.zone, true));

    let today = date_only_shift(0, env.zone);
    let thresholds = normalize_fitness_thresholds(&timeline.fitness_thresholds);
    let current_ftp = detection
        .and_then(|d| d.ftp)
        .or(member.ftp)
        .filter(|value| value.is_finite());

    let predicted_threshold = next_availability_date_only
        .as_deref()
        .and_then(|date_only| {
            thresholds
                .iter()
                .filter(|row| row.date_only == date_only)
                .last()
        })
        .or_else(|| {
            thresholds
                .iter()
                .find(|row| row.date_only.as_str() >= today.as_str() && !row.is_applied)
        });

    let predicted_ftp = predicted_threshold.map(|row| row.value);
    let prediction_date = predicted_threshold
        .map(|row| row.date.clone())
        .or_else(|| next_availability.clone());
    let prediction_date_only = predicted_threshold
        .map(|row| row.date_only.clone())
        .or_else(|| next_availability_date_only.clone());
    let days_until_prediction = prediction_date_only
        .as_deref()
        .and_then(|date_only| date_only_diff_days(&today, date_only));
    let ftp_delta = match (current_ftp, predicted_ftp) {
        (Some(current), Some(predicted)) => Some(predicted - current),
        _ => None,
    };
    let ftp_delta_percent = match (ftp_delta, current_ftp) {
        (Some(delta), Some(current)) if current != 0.0 => {
            Some((delta / current * 100.0).round() as i64)
        }
        _ => None,
    };
    let planned_workout_count = prediction_date_only
        .as_deref()
        .map(|end| count_planned_workouts_in_range(&timeline.planned_activities, &today, end));
    let future_thresholds: Vec<_> = thresholds
        .iter()
        .filter(|row| row.date_only.as_str() >= today.as_str())
        .collect();

    let payload = json!({
        "mode": "private",
        "generatedAt": generated_at(),
        "command": "ftp-prediction",
        "member": member_json(&member),
        "canUseAiFtp": eligibility.can.unwrap_or(false),
        "reasonCode": eligibility.reason,
        "modelVersion": eligibility.model_version.clone()
            .or_else(|| detection.and_then(|d| d.model_version.clone())),
        "detectionFtp": detection.and_then(|d| d.ftp),
        "currentFtp": current_ftp,
        "predictedFtp": predicted_ftp,
        "predictionDate": prediction_date,
        "predictionDateOnly": prediction_date_only,
        "daysUntilPrediction": days_until_prediction,
        "ftpDelta": ftp_delta,
        "ftpDeltaPercent": ftp_delta_percent,
        "plannedWorkoutCount": planned_workout_count,
        "nextAiFtpAvailability": next_availability,
        "nextAiFtpAvailabilityDateOnly": next_availability_date_only,
        "lastViewed": eligibility.additional_data.as_ref().and_then(|data| data.last_viewed.clone()),
        "aiFailureStatus": failure_status.get("status").cloned().unwrap_or(Value::Null),
        "projectedProgressionLevels": projected_levels.clone(),
        "currentProgressionLevels": current_levels,
        "levels": levels.levels,
        "levelsTimestamp": levels.timestamp,
        "predictionThresholdSource": predicted_threshold,
        "futureFitnessThresholds": future_thresholds,
        "records": projected_levels.clone(),
    });

    let mut lines = vec![
        format!("AI FTP usable: {}", field_display(&payload, "canUseAiFtp")),
        format!("Reason code: {}", field_display(&payload, "reasonCode")),
        format!("Current FTP: {}", field_display(&payload, "currentFtp")),
        format!("Predicted FTP: {}", field_display(&payload, "predictedFtp")),
        format!(
            "Prediction date: {}",
            field_display(&payload, "predictionDateOnly")
        ),
        format!(
            "Days until prediction: {}",
            field_display(&payload, "daysUntilPrediction")
        ),
        format!(
            "FTP delta: {} ({}%)",
            field_display(&payload, "ftpDelta"),
            field_display(&payload, "ftpDeltaPercent")
        ),
        format!(
            "Planned workouts in window: {}",
            field_display(&payload, "plannedWorkoutCount")
        ),
        format!(
            "AI failure status: {}",
            field_display(&payload, "aiFailureStatus")
        ),
    ];
    lines.push(format!(
        "Projected progression updates: {}",
        projected_levels.len()
    ));
    for level in &projected_levels {
        let level = serde_json::to_value(level).context("serializing projected level")?;
        lines.push(format!(
            "- progressionId={} from={} to={}",
            field_display(&level, "progressionId"),
            field_display(&level, "previousDisplayLevel"),
            field_display(&level, "displayFinalLevel"),
        ));
    }
    write_payload(&payload, &env.render, Some(lines.join("\n"))).await
}
