// ABOUTME: Generic filter/sort/project pipeline applied uniformly to all record types
// ABOUTME: Records opt in through the Filterable capability trait; non-matching shapes filter out

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use crate::errors::{ExportError, ExportResult};
use crate::models::{
    CompactAnnotation, CompactEvent, CompactWeight, CurrentPlan, DayAggregate, PlanPhase,
    PlanSummary, PlannedActivity, TimelineActivity, ZoneLevel,
};
use crate::normalize::{pick, to_iso_date, value_as_f64};

/// A record's type discriminator: one value matchable as text or number.
#[derive(Debug, Clone)]
pub struct TypeValue {
    text: String,
    number: Option<f64>,
}

impl TypeValue {
    /// Discriminator from a string.
    #[must_use]
    pub fn text(raw: impl Into<String>) -> Self {
        let text = raw.into();
        let number = text.trim().parse::<f64>().ok().filter(|n| n.is_finite());
        Self { text, number }
    }

    /// Discriminator from a number.
    #[must_use]
    pub fn number(raw: f64) -> Self {
        Self {
            text: format!("{raw}"),
            number: Some(raw).filter(|n| n.is_finite()),
        }
    }

    /// Discriminator from a JSON value, when it is text- or number-shaped.
    #[must_use]
    pub fn from_json(raw: &Value) -> Option<Self> {
        match raw {
            Value::String(text) => Some(Self::text(text.clone())),
            Value::Number(number) => number.as_f64().map(Self::number),
            _ => None,
        }
    }

    /// Whether a lowercased candidate matches by string or numeric equality.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        if self.text.to_lowercase() == candidate {
            return true;
        }
        match (candidate.trim().parse::<f64>(), self.number) {
            (Ok(wanted), Some(actual)) if wanted.is_finite() => {
                (wanted - actual).abs() < f64::EPSILON
            }
            _ => false,
        }
    }
}

/// Capability contract the filter engine resolves against.
///
/// Every record variant implements the four resolutions; a shape that cannot
/// resolve one returns `None`/empty and is treated as non-matching by the
/// corresponding filter rather than erroring.
pub trait Filterable {
    /// Canonical `YYYY-MM-DD` the record belongs to.
    fn date_only(&self) -> Option<String>;
    /// Type discriminator.
    fn type_value(&self) -> Option<TypeValue>;
    /// Training-load (TSS-equivalent) value.
    fn load(&self) -> Option<f64>;
    /// Free text searched by substring filters, lowercased.
    fn text(&self) -> String;
}

/// Sort modes, all stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// By date ascending
    Date,
    /// By date descending
    DateDesc,
    /// By load ascending
    Load,
    /// By load descending
    LoadDesc,
    /// By resolved text ascending
    Text,
    /// By resolved text descending
    TextDesc,
}

impl SortKey {
    /// Parse a sort flag; unrecognized values mean "no sort".
    #[must_use]
    pub fn from_flag(raw: Option<&str>) -> Option<Self> {
        match raw?.trim().to_lowercase().as_str() {
            "date" => Some(Self::Date),
            "date-desc" => Some(Self::DateDesc),
            "tss" => Some(Self::Load),
            "tss-desc" => Some(Self::LoadDesc),
            "name" => Some(Self::Text),
            "name-desc" => Some(Self::TextDesc),
            _ => None,
        }
    }

    /// Canonical flag spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::DateDesc => "date-desc",
            Self::Load => "tss",
            Self::LoadDesc => "tss-desc",
            Self::Text => "name",
            Self::TextDesc => "name-desc",
        }
    }
}

/// Declarative filter configuration, derived once per invocation.
///
/// Every field is independently optional; an absent field is a no-op.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Inclusive range start (`YYYY-MM-DD`)
    pub from_date: Option<String>,
    /// Inclusive range end (`YYYY-MM-DD`)
    pub to_date: Option<String>,
    /// Type candidates, lowercased; any match keeps the record
    pub type_filters: Vec<String>,
    /// Case-insensitive substring against resolved text, lowercased
    pub contains: Option<String>,
    /// Minimum load, inclusive
    pub min_load: Option<f64>,
    /// Maximum load, inclusive
    pub max_load: Option<f64>,
    /// Sort mode
    pub sort: Option<SortKey>,
    /// Prefix-preserving result cap
    pub result_limit: Option<usize>,
    /// Dotted-path projection list
    pub fields: Vec<String>,
}

impl FilterConfig {
    /// Whether this configuration transforms anything at all.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.from_date.is_none()
            && self.to_date.is_none()
            && self.type_filters.is_empty()
            && self.contains.is_none()
            && self.min_load.is_none()
            && self.max_load.is_none()
            && self.sort.is_none()
            && self.result_limit.is_none()
            && self.fields.is_empty()
    }
}

/// Echo of the resolved configuration plus input/output counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSummary {
    /// Resolved range start
    pub from: Option<String>,
    /// Resolved range end
    pub to: Option<String>,
    /// Resolved type candidates
    #[serde(rename = "type")]
    pub type_filters: Vec<String>,
    /// Resolved substring
    pub contains: Option<String>,
    /// Resolved minimum load
    pub min_tss: Option<f64>,
    /// Resolved maximum load
    pub max_tss: Option<f64>,
    /// Resolved sort mode
    pub sort: Option<String>,
    /// Resolved result cap
    pub result_limit: Option<usize>,
    /// Resolved projection paths
    pub fields: Vec<String>,
    /// Records before filtering
    pub input_count: usize,
    /// Records after the full pipeline
    pub output_count: usize,
}

/// Filtered records plus the summary describing how they got that way.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Surviving records, serialized (projected when paths were requested)
    pub records: Vec<Value>,
    /// Configuration echo and counts
    pub summary: FilterSummary,
}

/// Run the fixed pipeline: date range, type, substring, load range, sort,
/// limit, projection. The stage order never changes.
pub fn apply_filters<T>(records: &[T], config: &FilterConfig) -> ExportResult<FilterOutcome>
where
    T: Filterable + Serialize,
{
    let input_count = records.len();
    let mut selected: Vec<&T> = records.iter().collect();

    if config.from_date.is_some() || config.to_date.is_some() {
        selected.retain(|record| {
            let Some(date_only) = record.date_only() else {
                return false;
            };
            if let Some(from) = &config.from_date {
                if date_only < *from {
                    return false;
                }
            }
            if let Some(to) = &config.to_date {
                if date_only > *to {
                    return false;
                }
            }
            true
        });
    }

    if !config.type_filters.is_empty() {
        selected.retain(|record| {
            record.type_value().is_some_and(|value| {
                config
                    .type_filters
                    .iter()
                    .any(|candidate| value.matches(candidate))
            })
        });
    }

    if let Some(needle) = &config.contains {
        selected.retain(|record| record.text().contains(needle.as_str()));
    }

    if config.min_load.is_some() || config.max_load.is_some() {
        selected.retain(|record| {
            let Some(load) = record.load().filter(|value| value.is_finite()) else {
                return false;
            };
            if let Some(min) = config.min_load {
                if load < min {
                    return false;
                }
            }
            if let Some(max) = config.max_load {
                if load > max {
                    return false;
                }
            }
            true
        });
    }

    if let Some(sort) = config.sort {
        match sort {
            SortKey::Date => selected.sort_by(|a, b| cmp_dates(*a, *b)),
            SortKey::DateDesc => selected.sort_by(|a, b| cmp_dates(*b, *a)),
            SortKey::Load => selected.sort_by(|a, b| cmp_loads(a.load(), b.load())),
            SortKey::LoadDesc => selected.sort_by(|a, b| cmp_loads(b.load(), a.load())),
            SortKey::Text => selected.sort_by(|a, b| a.text().cmp(&b.text())),
            SortKey::TextDesc => selected.sort_by(|a, b| b.text().cmp(&a.text())),
        }
    }

    if let Some(limit) = config.result_limit {
        selected.truncate(limit);
    }

    let mut output = Vec::with_capacity(selected.len());
    for record in &selected {
        let value = serde_json::to_value(record).map_err(|source| ExportError::Json {
            context: "filtered record",
            source,
        })?;
        output.push(if config.fields.is_empty() {
            value
        } else {
            project_fields(&value, &config.fields)
        });
    }

    let summary = FilterSummary {
        from: config.from_date.clone(),
        to: config.to_date.clone(),
        type_filters: config.type_filters.clone(),
        contains: config.contains.clone(),
        min_tss: config.min_load,
        max_tss: config.max_load,
        sort: config.sort.map(|key| key.as_str().to_owned()),
        result_limit: config.result_limit,
        fields: config.fields.clone(),
        input_count,
        output_count: output.len(),
    };

    Ok(FilterOutcome {
        records: output,
        summary,
    })
}

fn cmp_dates<T: Filterable>(a: &T, b: &T) -> Ordering {
    let left = a.date_only().unwrap_or_default();
    let right = b.date_only().unwrap_or_default();
    left.cmp(&right)
}

/// Ascending load ordering with unresolvable values last; descending callers
/// swap the arguments, which keeps unresolvables last either way.
fn cmp_loads(a: Option<f64>, b: Option<f64>) -> Ordering {
    let left = a.filter(|value| value.is_finite());
    let right = b.filter(|value| value.is_finite());
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
    }
}

/// Replace a record with an object holding only the requested dotted paths.
/// A missing path resolves to `null`; the key is always present.
fn project_fields(record: &Value, fields: &[String]) -> Value {
    let mut output = serde_json::Map::new();
    for field in fields {
        let resolved = get_by_path(record, field).cloned().unwrap_or(Value::Null);
        output.insert(field.clone(), resolved);
    }
    Value::Object(output)
}

fn get_by_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut cursor = record;
    for segment in path.split('.').map(str::trim).filter(|s| !s.is_empty()) {
        cursor = cursor.as_object()?.get(segment)?;
    }
    Some(cursor)
}

fn join_text_parts(parts: &[Option<String>]) -> String {
    parts
        .iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn value_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

impl Filterable for TimelineActivity {
    fn date_only(&self) -> Option<String> {
        self.started.as_deref().and_then(to_iso_date)
    }

    fn type_value(&self) -> Option<TypeValue> {
        self.kind.as_ref().and_then(TypeValue::from_json)
    }

    fn load(&self) -> Option<f64> {
        self.tss.filter(|value| value.is_finite())
    }

    fn text(&self) -> String {
        join_text_parts(&[self.name.clone(), value_text(self.kind.as_ref())])
    }
}

impl Filterable for PlannedActivity {
    fn date_only(&self) -> Option<String> {
        Some(self.date.date_only())
    }

    fn type_value(&self) -> Option<TypeValue> {
        self.kind.as_ref().and_then(TypeValue::from_json)
    }

    fn load(&self) -> Option<f64> {
        self.tss.filter(|value| value.is_finite())
    }

    fn text(&self) -> String {
        join_text_parts(&[self.name.clone(), value_text(self.kind.as_ref())])
    }
}

impl Filterable for CompactEvent {
    fn date_only(&self) -> Option<String> {
        self.date_only.clone()
    }

    fn type_value(&self) -> Option<TypeValue> {
        self.activity_type.as_ref().and_then(TypeValue::from_json)
    }

    fn load(&self) -> Option<f64> {
        self.tss.filter(|value| value.is_finite())
    }

    fn text(&self) -> String {
        join_text_parts(&[self.name.clone()])
    }
}

impl Filterable for CompactAnnotation {
    fn date_only(&self) -> Option<String> {
        self.date_only.clone()
    }

    fn type_value(&self) -> Option<TypeValue> {
        Some(TypeValue::text(self.record_type.clone()))
    }

    fn load(&self) -> Option<f64> {
        None
    }

    fn text(&self) -> String {
        self.type_label.to_lowercase()
    }
}

impl Filterable for CompactWeight {
    fn date_only(&self) -> Option<String> {
        self.date_only.clone()
    }

    fn type_value(&self) -> Option<TypeValue> {
        None
    }

    fn load(&self) -> Option<f64> {
        None
    }

    fn text(&self) -> String {
        String::new()
    }
}

impl Filterable for PlanSummary {
    fn date_only(&self) -> Option<String> {
        self.date_only.clone()
    }

    fn type_value(&self) -> Option<TypeValue> {
        None
    }

    fn load(&self) -> Option<f64> {
        None
    }

    fn text(&self) -> String {
        join_text_parts(&[self.name.clone()])
    }
}

impl Filterable for PlanPhase {
    fn date_only(&self) -> Option<String> {
        self.date_only.clone()
    }

    fn type_value(&self) -> Option<TypeValue> {
        self.kind.as_ref().and_then(TypeValue::from_json)
    }

    fn load(&self) -> Option<f64> {
        None
    }

    fn text(&self) -> String {
        join_text_parts(&[self.plan_name.clone(), value_text(self.kind.as_ref())])
    }
}

impl Filterable for CurrentPlan {
    fn date_only(&self) -> Option<String> {
        self.date_only.clone()
    }

    fn type_value(&self) -> Option<TypeValue> {
        None
    }

    fn load(&self) -> Option<f64> {
        None
    }

    fn text(&self) -> String {
        join_text_parts(&[self.name.clone()])
    }
}

impl Filterable for ZoneLevel {
    fn date_only(&self) -> Option<String> {
        self.date_only.clone()
    }

    fn type_value(&self) -> Option<TypeValue> {
        Some(TypeValue::text(self.record_type.clone()))
    }

    fn load(&self) -> Option<f64> {
        None
    }

    fn text(&self) -> String {
        join_text_parts(&[
            Some(self.zone_label.clone()),
            Some(self.zone_key.clone()),
            Some(self.record_type.clone()),
        ])
    }
}

impl Filterable for DayAggregate {
    fn date_only(&self) -> Option<String> {
        Some(self.date.clone())
    }

    fn type_value(&self) -> Option<TypeValue> {
        None
    }

    fn load(&self) -> Option<f64> {
        Some(self.tss).filter(|value| value.is_finite())
    }

    fn text(&self) -> String {
        String::new()
    }
}

/// Fallback resolution for raw JSON records (detail fetches and any shape
/// the engine has not seen): probe the conventional keys in a fixed order,
/// tolerating both casings.
impl Filterable for Value {
    fn date_only(&self) -> Option<String> {
        if let Some(date_only) = pick(self, "dateOnly").and_then(Value::as_str) {
            return Some(date_only.to_owned());
        }
        if let Some(date) = pick(self, "date") {
            if date.is_object() {
                if let Ok(calendar) =
                    serde_json::from_value::<crate::models::CalendarDate>(date.clone())
                {
                    return Some(calendar.date_only());
                }
            }
            if let Some(raw) = date.as_str() {
                return to_iso_date(raw);
            }
        }
        for key in ["started", "workoutDate"] {
            if let Some(raw) = pick(self, key).and_then(Value::as_str) {
                return to_iso_date(raw);
            }
        }
        None
    }

    fn type_value(&self) -> Option<TypeValue> {
        for key in ["recordType", "type", "activityType", "typeId", "progressionId"] {
            if let Some(found) = pick(self, key).and_then(TypeValue::from_json) {
                return Some(found);
            }
        }
        None
    }

    fn load(&self) -> Option<f64> {
        for key in ["tss", "actualTss", "plannedTssTotal", "estimatedTss"] {
            if let Some(load) = pick(self, key).and_then(value_as_f64) {
                return Some(load);
            }
        }
        None
    }

    fn text(&self) -> String {
        let parts: Vec<Option<String>> = [
            "name",
            "title",
            "planName",
            "zoneLabel",
            "zoneKey",
            "typeLabel",
            "workoutRecordName",
            "recordType",
            "type",
        ]
        .iter()
        .map(|key| value_text(pick(self, key)))
        .collect();
        join_text_parts(&parts)
    }
}
