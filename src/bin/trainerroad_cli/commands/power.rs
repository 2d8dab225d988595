// ABOUTME: power-ranking and power-records command handlers
// ABOUTME: Private-only power data: percentile rankings and date-ranged personal records

use serde_json::{json, Value};
use trainerroad_export::client::PersonalRecordQuery;
use trainerroad_export::normalize::{compact_personal_record, pick, to_iso_date, value_as_f64};
use trainerroad_export::timezone::date_only_shift;

use super::records::{field_display, records_of};
use super::{generated_at, member_json, resolve_date_or, CommandEnv};
use crate::output::write_payload;

pub async fn power_ranking(env: &CommandEnv) -> anyhow::Result<()> {
    let context = env.resolve().await?;
    let member = context.require_private("power-ranking")?.member.clone();

    let records = context
        .client
        .get_power_ranking(member.member_id, &member.username)
        .await?;
    let payload = json!({
        "mode": "private",
        "generatedAt": generated_at(),
        "command": "power-ranking",
        "member": member_json(&member),
        "count": records.len(),
        "records": records,
    });

    let mut lines = vec![format!("Power ranking entries: {}", records_of(&payload).len())];
    for item in records_of(&payload) {
        let watts = pick(item, "wattsRanking");
        let wkg = pick(item, "wattsPerKgRanking");
        lines.push(format!(
            "- {}s | watts={} (pct={}) | w/kg={} (pct={})",
            field_display(item, "duration"),
            ranking_part(watts, "value"),
            ranking_part(watts, "percentile"),
            ranking_part(wkg, "value"),
            ranking_part(wkg, "percentile"),
        ));
    }
    write_payload(&payload, &env.render, Some(lines.join("\n"))).await
}

/// Flags for the power-records command.
#[derive(Debug, Clone)]
pub struct PowerRecordsArgs {
    pub start_date: String,
    pub end_date: Option<String>,
    pub row_type: u32,
    pub indoor_only: bool,
    pub slot: u32,
    pub limit: usize,
    pub full: bool,
}

pub async fn power_records(env: &CommandEnv, args: PowerRecordsArgs) -> anyhow::Result<()> {
    let context = env.resolve().await?;
    let member = context.require_private("power-records")?.member.clone();

    let start_date = resolve_date_or(Some(&args.start_date), date_only_shift(0, env.zone))?;
    let end_date = resolve_date_or(args.end_date.as_deref(), date_only_shift(0, env.zone))?;
    let query = PersonalRecordQuery {
        start_date: start_date.clone(),
        end_date: end_date.clone(),
        row_type: args.row_type,
        indoor_only: args.indoor_only,
        slot: args.slot.max(1),
    };

    let raw = context
        .client
        .get_personal_records_for_date_range(member.member_id, &member.username, &query)
        .await?;
    let all_records: Vec<Value> = raw
        .results
        .first()
        .map(|result| result.personal_records.clone())
        .unwrap_or_default();

    let records: Vec<Value> = if args.full {
        all_records.clone()
    } else {
        let mut ranked = all_records.clone();
        ranked.sort_by(|a, b| {
            let left = pick(b, "watts").and_then(value_as_f64).unwrap_or(0.0);
            let right = pick(a, "watts").and_then(value_as_f64).unwrap_or(0.0);
            left.partial_cmp(&right).unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
            .iter()
            .take(args.limit)
            .map(|item| {
                serde_json::to_value(compact_personal_record(item)).unwrap_or(Value::Null)
            })
            .collect()
    };

    let mut payload = json!({
        "mode": "private",
        "generatedAt": generated_at(),
        "command": "power-records",
        "member": member_json(&member),
        "query": {
            "startDate": start_date,
            "endDate": end_date,
            "rowType": args.row_type,
            "indoorOnly": args.indoor_only,
            "slot": query.slot,
            "limit": args.limit,
            "full": args.full,
        },
        "totalRecords": all_records.len(),
        "count": records.len(),
        "records": records,
    });
    if args.full {
        payload["results"] = serde_json::to_value(
            raw.results
                .iter()
                .map(|result| {
                    let mut object = result.extra.clone();
                    object.insert(
                        "personalRecords".to_owned(),
                        Value::Array(result.personal_records.clone()),
                    );
                    Value::Object(object)
                })
                .collect::<Vec<_>>(),
        )
        .unwrap_or(Value::Null);
    }

    let mut lines = vec![
        format!(
            "Power records: returned {} of {}",
            records_of(&payload).len(),
            all_records.len()
        ),
        format!(
            "Range: {start_date}..{end_date} | rowType={} | indoorOnly={}",
            args.row_type, args.indoor_only
        ),
    ];
    for item in records_of(&payload) {
        let date_label = pick(item, "workoutDate")
            .and_then(Value::as_str)
            .and_then(to_iso_date)
            .unwrap_or_else(|| "(unknown-date)".into());
        let seconds = pick(item, "seconds").map_or_else(|| "n/a".into(), ToString::to_string);
        let watts = pick(item, "watts").map_or_else(|| "n/a".into(), ToString::to_string);
        let name = pick(item, "workoutRecordName")
            .and_then(Value::as_str)
            .unwrap_or("(unknown)");
        lines.push(format!("- {date_label} {seconds}s {watts}W | ride={name}"));
    }
    if !args.full {
        lines.push("Tip: add --full --json for the complete personal-record payload.".into());
    }
    write_payload(&payload, &env.render, Some(lines.join("\n"))).await
}

fn ranking_part(ranking: Option<&Value>, key: &str) -> String {
    ranking
        .and_then(|value| pick(value, key))
        .filter(|value| !value.is_null())
        .map_or_else(|| "n/a".to_owned(), ToString::to_string)
}
