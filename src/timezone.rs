// ABOUTME: Canonical date handling for inconsistent upstream timestamp shapes
// ABOUTME: Resolves IANA zones and renders instants as local date-only or datetime strings

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::Serialize;

use crate::errors::{ExportError, ExportResult};

static DATE_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static pattern"));
static DATE_TIME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T").expect("static pattern"));
static OFFSET_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(Z|[+-]\d{2}:\d{2})$").expect("static pattern"));

/// Resolve the working IANA zone: explicit argument, then the configured
/// default, then the host zone, then UTC.
///
/// # Errors
///
/// `InvalidTimeZone` when the winning candidate is not a recognized zone.
pub fn resolve_time_zone(explicit: Option<&str>, default: Option<&str>) -> ExportResult<Tz> {
    let host = iana_time_zone::get_timezone().ok();
    let candidate = [explicit, default, host.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or("UTC");

    Tz::from_str(candidate).map_err(|_| ExportError::InvalidTimeZone {
        zone: candidate.to_owned(),
    })
}

/// Whether a string is already in canonical `YYYY-MM-DD` form.
#[must_use]
pub fn is_date_only(raw: &str) -> bool {
    DATE_ONLY.is_match(raw)
}

/// Parse an upstream timestamp string into an instant.
///
/// Date-only strings are interpreted as UTC midnight. Offset-bearing ISO
/// strings are honored. Offsetless datetime strings are taken as UTC only
/// when `assume_utc_when_offsetless` is set; otherwise they are read in the
/// host zone, the way the platform's own web client would. Unparsable input
/// yields `None`, never an error: callers treat it as "unknown date".
#[must_use]
pub fn parse_timestamp(raw: &str, assume_utc_when_offsetless: bool) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if is_date_only(raw) {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }

    if DATE_TIME_PREFIX.is_match(raw) && !OFFSET_SUFFIX.is_match(raw) {
        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
        if assume_utc_when_offsetless {
            return Some(Utc.from_utc_datetime(&naive));
        }
        return match chrono::Local.from_local_datetime(&naive) {
            LocalResult::Single(local) | LocalResult::Ambiguous(local, _) => {
                Some(local.with_timezone(&Utc))
            }
            LocalResult::None => None,
        };
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Parse a JSON-shaped timestamp: a string per [`parse_timestamp`] or a
/// numeric epoch in milliseconds.
#[must_use]
pub fn parse_timestamp_value(
    value: &serde_json::Value,
    assume_utc_when_offsetless: bool,
) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(raw) => parse_timestamp(raw, assume_utc_when_offsetless),
        serde_json::Value::Number(number) => {
            let millis = number.as_f64()?;
            if !millis.is_finite() {
                return None;
            }
            Utc.timestamp_millis_opt(millis as i64).single()
        }
        _ => None,
    }
}

/// Format an instant as the target zone's calendar date.
#[must_use]
pub fn instant_date_only(instant: DateTime<Utc>, zone: Tz) -> String {
    instant.with_timezone(&zone).format("%Y-%m-%d").to_string()
}

/// Convert an upstream timestamp string to the target zone's calendar date.
///
/// Strings already in date-only form pass through verbatim.
#[must_use]
pub fn to_local_date_only(raw: &str, zone: Tz, assume_utc_when_offsetless: bool) -> Option<String> {
    let trimmed = raw.trim();
    if is_date_only(trimmed) {
        return Some(trimmed.to_owned());
    }
    parse_timestamp(trimmed, assume_utc_when_offsetless)
        .map(|instant| instant_date_only(instant, zone))
}

/// Format an instant as a local datetime string with zone abbreviation.
#[must_use]
pub fn format_local_datetime(instant: DateTime<Utc>, zone: Tz) -> String {
    instant
        .with_timezone(&zone)
        .format("%Y-%m-%dT%H:%M:%S %Z")
        .to_string()
}

/// Shift a canonical date by a number of days.
#[must_use]
pub fn shift_date_only(date_only: &str, days: i64) -> Option<String> {
    let date = NaiveDate::parse_from_str(date_only.trim(), "%Y-%m-%d").ok()?;
    let shifted = date.checked_add_signed(Duration::days(days))?;
    Some(shifted.format("%Y-%m-%d").to_string())
}

/// Today's calendar date in the target zone.
#[must_use]
pub fn date_only_today(zone: Tz) -> String {
    instant_date_only(Utc::now(), zone)
}

/// Today shifted by `days` in the target zone.
#[must_use]
pub fn date_only_shift(days: i64, zone: Tz) -> String {
    shift_date_only(&date_only_today(zone), days).unwrap_or_else(|| date_only_today(zone))
}

/// Validate caller-supplied date input, trimming it to canonical form.
///
/// # Errors
///
/// `InvalidInput` when the value is not `YYYY-MM-DD`.
pub fn validate_date_only(raw: &str) -> ExportResult<String> {
    let trimmed = raw.trim();
    if is_date_only(trimmed) {
        Ok(trimmed.to_owned())
    } else {
        Err(ExportError::invalid_input(format!(
            "invalid date \"{raw}\"; expected YYYY-MM-DD"
        )))
    }
}

/// Whole days between two canonical dates (`to - from`).
#[must_use]
pub fn date_only_diff_days(from: &str, to: &str) -> Option<i64> {
    let from = NaiveDate::parse_from_str(from.trim(), "%Y-%m-%d").ok()?;
    let to = NaiveDate::parse_from_str(to.trim(), "%Y-%m-%d").ok()?;
    Some((to - from).num_days())
}

/// Local start/end view of one activity, with overnight detection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityWindow {
    /// Start instant in RFC 3339 UTC
    pub started_at_utc: String,
    /// Start rendered in the target zone
    pub started_at_local: String,
    /// End instant in RFC 3339 UTC, when a duration was available
    pub ended_at_utc: Option<String>,
    /// End rendered in the target zone
    pub ended_at_local: Option<String>,
    /// Calendar date of the local start
    pub local_date: String,
    /// Calendar date of the local end
    pub end_local_date: Option<String>,
    /// True when the local start and end fall on different dates
    pub crosses_midnight_local: bool,
}

/// Summarize an activity's local time window.
///
/// Returns `None` when the start is unparsable. A missing or non-finite
/// duration leaves the end fields empty rather than failing the record.
#[must_use]
pub fn summarize_activity_window(
    started: &str,
    duration_seconds: Option<f64>,
    zone: Tz,
) -> Option<ActivityWindow> {
    let start = parse_timestamp(started, true)?;
    let end = duration_seconds
        .filter(|seconds| seconds.is_finite())
        .and_then(|seconds| {
            start.checked_add_signed(Duration::milliseconds((seconds * 1000.0) as i64))
        });

    let local_date = instant_date_only(start, zone);
    let end_local_date = end.map(|instant| instant_date_only(instant, zone));
    let crosses_midnight_local = end_local_date
        .as_deref()
        .is_some_and(|ended| ended != local_date);

    Some(ActivityWindow {
        started_at_utc: start.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        started_at_local: format_local_datetime(start, zone),
        ended_at_utc: end.map(|instant| instant.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
        ended_at_local: end.map(|instant| format_local_datetime(instant, zone)),
        local_date,
        end_local_date,
        crosses_midnight_local,
    })
}
