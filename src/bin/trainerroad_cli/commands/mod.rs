// ABOUTME: Shared command plumbing: environment, filter flags, payload helpers
// ABOUTME: Each submodule holds the handlers for one command group

pub mod auth;
pub mod ftp;
pub mod plan;
pub mod power;
pub mod records;
pub mod timeline;
pub mod workouts;

use chrono_tz::Tz;
use serde_json::{json, Value};
use trainerroad_export::client::TrainerRoadClient;
use trainerroad_export::config::Settings;
use trainerroad_export::context::{resolve_query_context, QueryContext, QueryIntent};
use trainerroad_export::errors::{ExportError, ExportResult};
use trainerroad_export::filters::{FilterConfig, SortKey};
use trainerroad_export::models::MemberInfo;
use trainerroad_export::timezone::validate_date_only;

use crate::output::RenderOptions;

/// Everything a command handler needs besides its own flags.
#[derive(Debug)]
pub struct CommandEnv {
    /// Resolved process settings
    pub settings: Settings,
    /// Working timezone
    pub zone: Tz,
    /// Output rendering options
    pub render: RenderOptions,
    /// Mode-resolution intent from the global flags
    pub intent: QueryIntent,
}

impl CommandEnv {
    /// Client with the persisted session loaded.
    pub async fn client(&self) -> TrainerRoadClient {
        let client = TrainerRoadClient::new(self.settings.clone());
        client.load_session().await;
        client
    }

    /// Resolve the query context for this invocation.
    pub async fn resolve(&self) -> ExportResult<QueryContext> {
        resolve_query_context(self.client().await, &self.intent).await
    }
}

/// Agent filter flags shared by every record-listing command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FilterArgs {
    /// Inclusive start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Inclusive end date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Comma-separated type candidates (names or numeric codes)
    #[arg(long = "type")]
    pub type_filters: Option<String>,

    /// Case-insensitive substring against record text
    #[arg(long)]
    pub contains: Option<String>,

    /// Minimum TSS, inclusive
    #[arg(long = "min-tss")]
    pub min_tss: Option<f64>,

    /// Maximum TSS, inclusive
    #[arg(long = "max-tss")]
    pub max_tss: Option<f64>,

    /// Sort: date, date-desc, tss, tss-desc, name, name-desc
    #[arg(long)]
    pub sort: Option<String>,

    /// Keep only the first N records after sorting
    #[arg(long = "result-limit")]
    pub result_limit: Option<usize>,

    /// Comma-separated dotted projection paths (e.g. id,name,tss)
    #[arg(long)]
    pub fields: Option<String>,

    /// Reduce the JSON payload to the records envelope
    #[arg(long = "records-only")]
    pub records_only: bool,
}

impl FilterArgs {
    /// Build the engine configuration, validating caller input.
    pub fn to_config(&self) -> ExportResult<FilterConfig> {
        let from_date = self
            .from
            .as_deref()
            .map(validate_date_only)
            .transpose()?;
        let to_date = self.to.as_deref().map(validate_date_only).transpose()?;
        Ok(FilterConfig {
            from_date,
            to_date,
            type_filters: split_csv(self.type_filters.as_deref())
                .into_iter()
                .map(|value| value.to_lowercase())
                .collect(),
            contains: self
                .contains
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_lowercase),
            min_load: self.min_tss.filter(|value| value.is_finite()),
            max_load: self.max_tss.filter(|value| value.is_finite()),
            sort: SortKey::from_flag(self.sort.as_deref()),
            result_limit: self.result_limit.filter(|limit| *limit >= 1),
            fields: split_csv(self.fields.as_deref()),
        })
    }

    /// Whether any transform flag was given (drives the text rendering).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.from.is_some()
            || self.to.is_some()
            || self.type_filters.is_some()
            || self.contains.is_some()
            || self.min_tss.is_some()
            || self.max_tss.is_some()
            || self.sort.is_some()
            || self.result_limit.is_some()
            || self.fields.is_some()
    }
}

fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

/// Caller date with validation, or the computed fallback.
pub fn resolve_date_or(value: Option<&str>, fallback: String) -> ExportResult<String> {
    match value.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => validate_date_only(raw),
        None => Ok(fallback),
    }
}

/// Reject inverted date ranges.
pub fn ensure_range(from_date: &str, to_date: &str) -> ExportResult<()> {
    if to_date < from_date {
        return Err(ExportError::invalid_input(format!(
            "invalid range: --to ({to_date}) is before --from ({from_date})"
        )));
    }
    Ok(())
}

/// `member` object for private-mode payload envelopes.
#[must_use]
pub fn member_json(member: &MemberInfo) -> Value {
    json!({ "memberId": member.member_id, "username": member.username })
}

/// `member` object for public-mode payload envelopes.
#[must_use]
pub fn public_member_json(target_username: &str) -> Value {
    json!({ "username": target_username })
}

/// Timestamp for payload envelopes.
#[must_use]
pub fn generated_at() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Reduce a payload to the records envelope, mirroring what agent callers
/// need for further queries.
#[must_use]
pub fn records_only_payload(payload: &Value) -> Value {
    let records = payload
        .get("records")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let mut reduced = json!({
        "mode": payload.get("mode").cloned().unwrap_or(Value::Null),
        "generatedAt": payload.get("generatedAt").cloned().unwrap_or_else(|| json!(generated_at())),
        "command": payload.get("command").cloned().unwrap_or(Value::Null),
        "query": payload.get("query").cloned().unwrap_or(Value::Null),
        "filters": payload.get("filters").cloned().unwrap_or(Value::Null),
        "member": payload.get("member").cloned().unwrap_or(Value::Null),
        "count": records.len(),
        "records": records,
    });
    if let Some(limitations) = payload.get("limitations") {
        if let Some(object) = reduced.as_object_mut() {
            object.insert("limitations".to_owned(), limitations.clone());
        }
    }
    reduced
}

/// Append the standard filter-summary line to a text rendering.
pub fn push_filter_lines(lines: &mut Vec<String>, records: &[Value], summary: &Value) {
    for record in records {
        lines.push(format!("- {record}"));
    }
    if let (Some(output), Some(input)) = (
        summary.get("outputCount").and_then(Value::as_u64),
        summary.get("inputCount").and_then(Value::as_u64),
    ) {
        lines.push(format!("Filter output: {output}/{input}"));
    }
}
