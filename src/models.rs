// ABOUTME: Raw upstream payload DTOs and the stable normalized record shapes
// ABOUTME: Every raw field tolerates both camelCase and PascalCase via serde aliases

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Authenticated member identity, as returned by the member-info endpoint.
///
/// Only the fields the export pipeline relies on are typed; the rest of the
/// payload rides along in `extra` so `whoami` can echo it unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    /// Numeric member id used by the calendar endpoints
    #[serde(alias = "MemberId")]
    pub member_id: i64,
    /// Username used by the career endpoints and referers
    #[serde(alias = "Username")]
    pub username: String,
    /// Current FTP when present
    #[serde(alias = "Ftp", default)]
    pub ftp: Option<f64>,
    /// Remainder of the member-info payload
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Calendar date triple used by planned workouts, events, and annotations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CalendarDate {
    /// Four-digit year
    #[serde(alias = "Year")]
    pub year: i64,
    /// Month 1..=12
    #[serde(alias = "Month")]
    pub month: i64,
    /// Day of month
    #[serde(alias = "Day")]
    pub day: i64,
}

impl CalendarDate {
    /// Render as canonical `YYYY-MM-DD`.
    #[must_use]
    pub fn date_only(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// One completed activity as it appears in the timeline summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineActivity {
    /// Activity id, the key for batched detail fetches
    #[serde(alias = "Id")]
    pub id: i64,
    /// Start timestamp as sent by upstream (offsetless strings are UTC)
    #[serde(alias = "Started", default)]
    pub started: Option<String>,
    /// Upstream activity type discriminator
    #[serde(rename = "type", alias = "Type", default)]
    pub kind: Option<Value>,
    /// Training load of the activity
    #[serde(alias = "Tss", default)]
    pub tss: Option<f64>,
    /// Duration in seconds
    #[serde(alias = "DurationInSeconds", default)]
    pub duration_in_seconds: Option<f64>,
    /// Workout name when present in the summary
    #[serde(alias = "Name", default)]
    pub name: Option<String>,
    /// Remaining summary fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One planned workout as it appears in the timeline summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedActivity {
    /// Planned-activity id, the key for batched detail fetches
    #[serde(alias = "Id")]
    pub id: i64,
    /// Scheduled calendar date
    #[serde(alias = "Date")]
    pub date: CalendarDate,
    /// Upstream planned-activity type discriminator
    #[serde(rename = "type", alias = "Type", default)]
    pub kind: Option<Value>,
    /// Planned training load
    #[serde(alias = "Tss", default)]
    pub tss: Option<f64>,
    /// Library workout backing this slot, when any
    #[serde(alias = "WorkoutId", default)]
    pub workout_id: Option<i64>,
    /// Workout name when present in the summary
    #[serde(alias = "Name", default)]
    pub name: Option<String>,
    /// Remaining summary fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Full private-mode base payload from the timeline endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timeline {
    /// Completed activities, newest last
    #[serde(alias = "Activities")]
    pub activities: Vec<TimelineActivity>,
    /// Scheduled workouts
    #[serde(alias = "PlannedActivities")]
    pub planned_activities: Vec<PlannedActivity>,
    /// Calendar events (races, goals)
    #[serde(alias = "Events")]
    pub events: Vec<Value>,
    /// Calendar annotations (notes, time off, injury, illness)
    #[serde(alias = "Annotations")]
    pub annotations: Vec<Value>,
    /// FTP change entries, applied and pending
    #[serde(alias = "FitnessThresholds")]
    pub fitness_thresholds: Vec<Value>,
}

/// One day inside the public per-user aggregate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublicDay {
    /// Calendar date of the day
    #[serde(alias = "Date")]
    pub date: Option<String>,
    /// Actual total load
    #[serde(alias = "Tss")]
    pub tss: Option<f64>,
    /// Actual load from platform workouts
    #[serde(alias = "TssTrainerRoad")]
    pub tss_trainer_road: Option<f64>,
    /// Actual load from other sources
    #[serde(alias = "TssOther")]
    pub tss_other: Option<f64>,
    /// Planned load from platform workouts
    #[serde(alias = "PlannedTssTrainerRoad")]
    pub planned_tss_trainer_road: Option<f64>,
    /// Planned load from other sources
    #[serde(alias = "PlannedTssOther")]
    pub planned_tss_other: Option<f64>,
    /// Whether any ride was recorded that day
    #[serde(alias = "HasRides")]
    pub has_rides: Option<bool>,
}

/// Public per-user aggregate payload: weeks of days plus FTP history.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublicTss {
    /// Nested week-of-days structure; weeks may be irregular in length
    #[serde(alias = "TssByDay")]
    pub tss_by_day: Vec<Vec<PublicDay>>,
    /// FTP history points
    #[serde(alias = "FtpRecordsDate")]
    pub ftp_records_date: Vec<Value>,
}

/// Flattened day-level aggregate, the unit of public-mode data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAggregate {
    /// Canonical calendar date, unique within one flattened result
    pub date: String,
    /// Actual total load
    pub tss: f64,
    /// Actual load from platform workouts
    pub tss_trainer_road: f64,
    /// Actual load from other sources
    pub tss_other: f64,
    /// Planned load from platform workouts
    pub planned_tss_trainer_road: f64,
    /// Planned load from other sources
    pub planned_tss_other: f64,
    /// Sum of the two planned components
    pub planned_tss_total: f64,
    /// Whether any ride was recorded that day
    pub has_rides: bool,
}

/// Raw calendar event fields the compact shape keeps.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEvent {
    #[serde(alias = "Id")]
    pub id: Option<i64>,
    #[serde(alias = "Name")]
    pub name: Option<String>,
    #[serde(alias = "Date")]
    pub date: Option<CalendarDate>,
    #[serde(alias = "TimeOfDay")]
    pub time_of_day: Option<Value>,
    #[serde(alias = "Started")]
    pub started: Option<String>,
    #[serde(alias = "RacePriority")]
    pub race_priority: Option<Value>,
    #[serde(alias = "ActivityType")]
    pub activity_type: Option<Value>,
    #[serde(alias = "ActivityEventType")]
    pub activity_event_type: Option<Value>,
    #[serde(alias = "Tss")]
    pub tss: Option<f64>,
    #[serde(alias = "ActivityTss")]
    pub activity_tss: Option<f64>,
    #[serde(alias = "IsTriathlonType")]
    pub is_triathlon_type: Option<bool>,
    #[serde(alias = "ManuallyCompleted")]
    pub manually_completed: Option<bool>,
}

/// Compacted calendar event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactEvent {
    /// Event id
    pub id: Option<i64>,
    /// Event name
    pub name: Option<String>,
    /// Raw calendar date triple
    pub date: Option<CalendarDate>,
    /// Canonical calendar date derived from `date`
    pub date_only: Option<String>,
    /// Scheduled time of day
    pub time_of_day: Option<Value>,
    /// Start timestamp when the event was completed
    pub started: Option<String>,
    /// Race priority (A/B/C encoded upstream)
    pub race_priority: Option<Value>,
    /// Upstream activity type discriminator
    pub activity_type: Option<Value>,
    /// Upstream event type discriminator
    pub activity_event_type: Option<Value>,
    /// Event load
    pub tss: Option<f64>,
    /// Load of the linked activity
    pub activity_tss: Option<f64>,
    /// Whether the event is a triathlon type
    pub is_triathlon_type: Option<bool>,
    /// Whether the event was manually completed
    pub manually_completed: Option<bool>,
}

/// Raw calendar annotation fields the compact shape keeps.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAnnotation {
    #[serde(alias = "Id")]
    pub id: Option<i64>,
    #[serde(alias = "TypeId")]
    pub type_id: Option<i64>,
    #[serde(alias = "Date")]
    pub date: Option<CalendarDate>,
    #[serde(alias = "Duration")]
    pub duration: Option<f64>,
    #[serde(alias = "GroupId")]
    pub group_id: Option<i64>,
}

/// Compacted calendar annotation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactAnnotation {
    /// Annotation id
    pub id: Option<i64>,
    /// Human label for the annotation type
    #[serde(rename = "type")]
    pub kind: String,
    /// Upstream numeric type code
    pub type_id: Option<i64>,
    /// Same label, kept under the name the filter contract resolves
    pub type_label: String,
    /// Record discriminator for the filter engine
    pub record_type: String,
    /// Raw calendar date triple
    pub date: Option<CalendarDate>,
    /// Canonical calendar date derived from `date`
    pub date_only: Option<String>,
    /// Raw span in seconds
    pub duration_seconds: Option<f64>,
    /// Span in whole days, rounded
    pub duration_days: Option<i64>,
    /// Grouping id for multi-day annotations
    pub group_id: Option<i64>,
}

/// Raw weight-history entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawWeight {
    #[serde(alias = "Id")]
    pub id: Option<i64>,
    #[serde(alias = "Value")]
    pub value: Option<Value>,
    #[serde(alias = "Units")]
    pub units: Option<String>,
    #[serde(alias = "Date")]
    pub date: Option<String>,
}

/// Compacted weight-history entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactWeight {
    /// Entry id
    pub id: Option<i64>,
    /// Weight value, dropped when not numeric
    pub value: Option<f64>,
    /// Unit label
    pub units: Option<String>,
    /// Raw timestamp
    pub date: Option<String>,
    /// Canonical calendar date
    pub date_only: Option<String>,
}

/// Raw training-plan summary from the plan-builder endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPlanSummary {
    #[serde(alias = "Id")]
    pub id: Option<i64>,
    #[serde(alias = "Name")]
    pub name: Option<String>,
    #[serde(alias = "Discipline")]
    pub discipline: Option<Value>,
    #[serde(alias = "Volume")]
    pub volume: Option<Value>,
    #[serde(alias = "Phase")]
    pub phase: Option<Value>,
    #[serde(alias = "Start")]
    pub start: Option<String>,
    #[serde(alias = "End")]
    pub end: Option<String>,
    #[serde(alias = "IsAdHoc")]
    pub is_ad_hoc: Option<bool>,
    #[serde(alias = "PlannedActivityGroupId")]
    pub planned_activity_group_id: Option<i64>,
}

/// Compacted training-plan summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    /// Plan id
    pub id: Option<i64>,
    /// Plan name
    pub name: Option<String>,
    /// Sport discipline
    pub discipline: Option<Value>,
    /// Training volume tier
    pub volume: Option<Value>,
    /// Plan phase discriminator
    pub phase: Option<Value>,
    /// Start timestamp
    pub start: Option<String>,
    /// End timestamp
    pub end: Option<String>,
    /// Copy of `start` under the filter contract's date key
    pub date: Option<String>,
    /// Canonical start date
    pub date_only: Option<String>,
    /// Whether the plan is ad hoc
    pub is_ad_hoc: Option<bool>,
    /// Group id tying the plan to planned activities
    pub planned_activity_group_id: Option<i64>,
}

/// Raw plan phase from the plan-builder endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPlanPhase {
    #[serde(alias = "Id")]
    pub id: Option<i64>,
    #[serde(alias = "CustomPlanId")]
    pub custom_plan_id: Option<i64>,
    #[serde(rename = "type", alias = "Type")]
    pub kind: Option<Value>,
    #[serde(alias = "Volume")]
    pub volume: Option<Value>,
    #[serde(alias = "PlanId")]
    pub plan_id: Option<i64>,
    #[serde(alias = "PlanName")]
    pub plan_name: Option<String>,
    #[serde(alias = "Start")]
    pub start: Option<String>,
    #[serde(alias = "End")]
    pub end: Option<String>,
    #[serde(alias = "IsMasters")]
    pub is_masters: Option<bool>,
    #[serde(alias = "IsPolarized")]
    pub is_polarized: Option<bool>,
}

/// Compacted plan phase.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPhase {
    /// Phase id
    pub id: Option<i64>,
    /// Owning custom plan id
    pub custom_plan_id: Option<i64>,
    /// Phase type discriminator
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    /// Training volume tier
    pub volume: Option<Value>,
    /// Library plan id backing this phase
    pub plan_id: Option<i64>,
    /// Library plan name
    pub plan_name: Option<String>,
    /// Start timestamp
    pub start: Option<String>,
    /// End timestamp
    pub end: Option<String>,
    /// Copy of `start` under the filter contract's date key
    pub date: Option<String>,
    /// Canonical start date
    pub date_only: Option<String>,
    /// Masters variant flag
    pub is_masters: Option<bool>,
    /// Polarized variant flag
    pub is_polarized: Option<bool>,
}

/// Raw current custom plan.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCurrentPlan {
    #[serde(alias = "Id")]
    pub id: Option<i64>,
    #[serde(alias = "Name")]
    pub name: Option<String>,
    #[serde(alias = "MemberId")]
    pub member_id: Option<i64>,
    #[serde(alias = "Discipline")]
    pub discipline: Option<Value>,
    #[serde(alias = "Volume")]
    pub volume: Option<Value>,
    #[serde(alias = "Start")]
    pub start: Option<String>,
    #[serde(alias = "End")]
    pub end: Option<String>,
    #[serde(alias = "CanEdit")]
    pub can_edit: Option<bool>,
    #[serde(alias = "CurrentPhase")]
    pub current_phase: Option<Value>,
    #[serde(alias = "CurrentPhaseStart")]
    pub current_phase_start: Option<String>,
    #[serde(alias = "CurrentPhaseEnd")]
    pub current_phase_end: Option<String>,
    #[serde(alias = "PlannedActivityGroupType")]
    pub planned_activity_group_type: Option<Value>,
    #[serde(alias = "AutoUpdateApplied")]
    pub auto_update_applied: Option<bool>,
    #[serde(alias = "Phases")]
    pub phases: Vec<RawPlanPhase>,
}

/// Compacted current custom plan with its phases.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPlan {
    /// Plan id
    pub id: Option<i64>,
    /// Plan name
    pub name: Option<String>,
    /// Owning member id
    pub member_id: Option<i64>,
    /// Sport discipline
    pub discipline: Option<Value>,
    /// Training volume tier
    pub volume: Option<Value>,
    /// Start timestamp
    pub start: Option<String>,
    /// End timestamp
    pub end: Option<String>,
    /// Copy of `start` under the filter contract's date key
    pub date: Option<String>,
    /// Canonical start date
    pub date_only: Option<String>,
    /// Whether the plan is editable
    pub can_edit: Option<bool>,
    /// Current phase discriminator
    pub current_phase: Option<Value>,
    /// Current phase start
    pub current_phase_start: Option<String>,
    /// Current phase end
    pub current_phase_end: Option<String>,
    /// Group type of the plan's planned activities
    pub planned_activity_group_type: Option<Value>,
    /// Whether an auto-update was applied
    pub auto_update_applied: Option<bool>,
    /// Number of phases
    pub phase_count: usize,
    /// Compacted phases
    pub phases: Vec<PlanPhase>,
}

/// Career progression-levels payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CareerLevels {
    /// Per-zone level values keyed by progression id
    #[serde(alias = "Levels")]
    pub levels: std::collections::BTreeMap<String, ZoneLevelValue>,
    /// Snapshot timestamp
    #[serde(alias = "Timestamp")]
    pub timestamp: Option<String>,
}

/// One zone's raw level value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoneLevelValue {
    /// Recently earned level
    #[serde(alias = "Recent")]
    pub recent: Option<f64>,
    /// Endpoint-predicted level
    #[serde(alias = "Predicted")]
    pub predicted: Option<f64>,
    /// Activity that produced the latest change
    #[serde(alias = "ActivityId")]
    pub activity_id: Option<i64>,
    /// Latest change event
    #[serde(alias = "ChangeEvent")]
    pub change_event: Option<LevelChangeEvent>,
}

/// Change event attached to a zone level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelChangeEvent {
    /// When the change happened
    #[serde(alias = "Date")]
    pub date: Option<String>,
    /// Upstream reason code
    #[serde(alias = "Reason")]
    pub reason: Option<Value>,
    /// From/to pair
    #[serde(alias = "Level")]
    pub level: Option<LevelChangeSpan>,
    /// Level delta
    #[serde(alias = "Delta")]
    pub delta: Option<f64>,
}

/// From/to pair inside a level change event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelChangeSpan {
    /// Level before the change
    #[serde(alias = "From")]
    pub from: Option<f64>,
    /// Level after the change
    #[serde(alias = "To")]
    pub to: Option<f64>,
}

/// AI-FTP eligibility payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiFtpEligibility {
    /// Whether AI FTP detection can run now
    #[serde(alias = "Can")]
    pub can: Option<bool>,
    /// Upstream reason code when it cannot
    #[serde(alias = "Reason")]
    pub reason: Option<Value>,
    /// Detection model version
    #[serde(alias = "ModelVersion")]
    pub model_version: Option<String>,
    /// Detection details and availability window
    #[serde(alias = "AdditionalData")]
    pub additional_data: Option<AiFtpAdditionalData>,
}

/// Nested detection data inside the eligibility payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiFtpAdditionalData {
    /// Current detection snapshot
    #[serde(alias = "Detection")]
    pub detection: Option<AiFtpDetection>,
    /// When AI FTP detection next becomes available
    #[serde(alias = "NextAiFtpAvailability")]
    pub next_ai_ftp_availability: Option<String>,
    /// When the member last viewed the detection
    #[serde(alias = "LastViewed")]
    pub last_viewed: Option<Value>,
}

/// AI detection snapshot: FTP plus per-zone level projections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiFtpDetection {
    /// FTP the detection is based on
    #[serde(alias = "Ftp")]
    pub ftp: Option<f64>,
    /// Detection model version
    #[serde(alias = "ModelVersion")]
    pub model_version: Option<String>,
    /// Projected post-detection progression levels
    #[serde(alias = "ProjectedProgressionLevels")]
    pub projected_progression_levels: Vec<AiProgressionLevel>,
    /// Current progression levels as the detection sees them
    #[serde(alias = "CurrentProgressionLevels")]
    pub current_progression_levels: Vec<AiProgressionLevel>,
}

/// One AI-projected or AI-current progression level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiProgressionLevel {
    /// Progression zone id
    #[serde(alias = "ProgressionId")]
    pub progression_id: i64,
    /// Final level the detection projects
    #[serde(alias = "DisplayFinalLevel", default)]
    pub display_final_level: Option<f64>,
    /// Level before the projected change
    #[serde(alias = "PreviousDisplayLevel", default)]
    pub previous_display_level: Option<f64>,
    /// Remaining projection fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Joined per-zone progression record, the `levels` command's unit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneLevel {
    /// Progression zone id
    pub progression_id: i64,
    /// Zone key under the filter contract's type key
    #[serde(rename = "type")]
    pub kind: String,
    /// Record discriminator for the filter engine
    pub record_type: String,
    /// Stable machine key for the zone
    pub zone_key: String,
    /// Human label for the zone
    pub zone_label: String,
    /// Ordering among zones; unknown zones sort last
    pub sort_order: i64,
    /// Recently earned level
    pub recent_level: Option<f64>,
    /// Endpoint-predicted level
    pub endpoint_predicted_level: Option<f64>,
    /// Activity that produced the latest change
    pub activity_id: Option<i64>,
    /// Raw change timestamp
    pub change_date: Option<String>,
    /// Copy of `change_date` under the filter contract's date key
    pub date: Option<String>,
    /// Canonical change date
    pub date_only: Option<String>,
    /// Upstream change reason
    pub change_reason: Option<Value>,
    /// Level before the change
    pub change_from: Option<f64>,
    /// Level after the change
    pub change_to: Option<f64>,
    /// Change delta
    pub change_delta: Option<f64>,
    /// AI-current display level
    pub ai_current_display_level: Option<f64>,
    /// AI-projected display level
    pub ai_projected_display_level: Option<f64>,
    /// Projected minus current AI level
    pub ai_delta: Option<f64>,
}

/// One normalized FTP history point.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FtpPoint {
    /// Timestamp in RFC 3339 UTC
    pub date: String,
    /// Canonical calendar date
    pub date_only: String,
    /// FTP value
    pub value: f64,
}

/// One normalized fitness-threshold entry from the timeline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessThreshold {
    /// Entry id
    pub id: Option<i64>,
    /// Timestamp in RFC 3339 UTC
    pub date: String,
    /// Canonical calendar date
    pub date_only: String,
    /// Threshold (FTP) value
    pub value: f64,
    /// Whether the threshold has been applied
    pub is_applied: bool,
    /// Whether the threshold is enabled
    pub is_enabled: Option<bool>,
    /// Source discriminator
    pub source: Option<Value>,
    /// Whether the member viewed the entry
    pub viewed: Option<Value>,
}

/// Raw personal record row; upstream sends these PascalCase-first.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPersonalRecord {
    #[serde(alias = "seconds", rename = "Seconds")]
    pub seconds: Option<f64>,
    #[serde(alias = "watts", rename = "Watts")]
    pub watts: Option<f64>,
    #[serde(alias = "workoutDate", rename = "WorkoutDate")]
    pub workout_date: Option<String>,
    #[serde(alias = "workoutSeconds", rename = "WorkoutSeconds")]
    pub workout_seconds: Option<f64>,
    #[serde(alias = "workoutGuid", rename = "WorkoutGuid")]
    pub workout_guid: Option<String>,
    #[serde(alias = "workoutRecordId", rename = "WorkoutRecordId")]
    pub workout_record_id: Option<i64>,
    #[serde(alias = "workoutRecordName", rename = "WorkoutRecordName")]
    pub workout_record_name: Option<String>,
    #[serde(alias = "surveyResponseTranslated", rename = "SurveyResponseTranslated")]
    pub survey_response: Option<Value>,
}

/// Compacted personal record for date-range power queries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactPersonalRecord {
    /// Record duration in seconds
    pub seconds: Option<f64>,
    /// Best average watts over the duration
    pub watts: Option<f64>,
    /// When the record ride happened
    pub workout_date: Option<String>,
    /// Second offset of the effort inside the ride
    pub workout_seconds: Option<f64>,
    /// Ride guid
    pub workout_guid: Option<String>,
    /// Ride record id
    pub workout_record_id: Option<i64>,
    /// Ride name
    pub workout_record_name: Option<String>,
    /// Post-ride survey response
    pub survey_response: Option<Value>,
}

/// Date-range personal-records response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalRecordRangeResponse {
    /// One result per requested slot
    #[serde(alias = "Results")]
    pub results: Vec<PersonalRecordRangeResult>,
}

/// One slot's worth of date-range personal records.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalRecordRangeResult {
    /// Personal-record rows for the slot
    #[serde(alias = "PersonalRecords")]
    pub personal_records: Vec<Value>,
    /// Remainder of the slot payload
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Outcome of a successful login handshake.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    /// Always true on return; failures raise instead
    pub ok: bool,
    /// Redirect target from the credential POST
    pub redirect: String,
    /// Whether the auth cookie is present in the jar
    pub has_auth_cookie: bool,
}
