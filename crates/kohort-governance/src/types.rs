//! Batch configuration types.
//!
//! Caller-supplied configs (`*Input`) keep their fields optional so the
//! rule engine, not the deserializer, decides which omissions are errors.
//! Normalized types are closed: once validation has run, every field is
//! present and the tagged enums can be matched exhaustively.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Day of the week for training schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
            Weekday::Sun => "sun",
        };
        f.write_str(s)
    }
}

/// Caller-supplied training schedule; completeness is a validation rule,
/// not a deserialization constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TrainingScheduleInput {
    /// Weekdays sessions run on.
    #[serde(default)]
    pub days: Vec<Weekday>,

    /// Daily session start time.
    pub start_time: Option<NaiveTime>,

    /// Daily session end time.
    pub end_time: Option<NaiveTime>,
}

/// A complete training schedule, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TrainingSchedule {
    /// Weekdays sessions run on; never empty.
    pub days: Vec<Weekday>,

    /// Daily session start time.
    pub start_time: NaiveTime,

    /// Daily session end time.
    pub end_time: NaiveTime,
}

/// Lab access configuration, keyed by access mode.
///
/// The mode set is closed; an unknown mode fails at the serde boundary
/// before reaching the rule engine. Mode-specific sub-fields are accepted
/// as supplied; a missing sub-field is a data-quality warning, not a
/// rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum LabAccess {
    /// A fixed number of lab hours per day.
    Fixed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hours_per_day: Option<u32>,
    },
    /// A total hour quota spent freely over the batch.
    Quota {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        total_hours: Option<u32>,
    },
    /// Unrestricted access within a date range.
    DateRange {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        starts_on: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ends_on: Option<NaiveDate>,
    },
}

impl LabAccess {
    /// Stable mode name, used in logs and warnings.
    #[must_use]
    pub fn mode(&self) -> &'static str {
        match self {
            LabAccess::Fixed { .. } => "fixed",
            LabAccess::Quota { .. } => "quota",
            LabAccess::DateRange { .. } => "date_range",
        }
    }

    /// Description of the missing mode-specific detail, if any.
    #[must_use]
    pub fn missing_detail(&self) -> Option<String> {
        match self {
            LabAccess::Fixed { hours_per_day: None } => {
                Some("lab mode 'fixed' supplied without hours_per_day".to_string())
            }
            LabAccess::Quota { total_hours: None } => {
                Some("lab mode 'quota' supplied without total_hours".to_string())
            }
            LabAccess::DateRange { starts_on, ends_on } if starts_on.is_none() || ends_on.is_none() => {
                Some("lab mode 'date_range' supplied without a complete date range".to_string())
            }
            _ => None,
        }
    }
}

/// Caller-supplied assessment window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AssessmentWindowInput {
    /// When the assessment window opens.
    pub starts_at: Option<DateTime<Utc>>,

    /// When the assessment window closes.
    pub ends_at: Option<DateTime<Utc>>,
}

/// Scheduling state of a trainer-managed assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum TrainerAssessmentStatus {
    /// Waiting for the trainer to fix a schedule.
    PendingTrainer,
}

/// The normalized, persistable assessment configuration.
///
/// Which variant applies is derived, never caller-chosen: training present
/// means the trainer owns assessment scheduling; otherwise an administrator
/// fixed the window up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum AssessmentPlan {
    /// Schedule deferred to the instructor.
    TrainerManaged { status: TrainerAssessmentStatus },
    /// Window fixed up front by an administrator.
    AdminManaged {
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    },
}

/// A proposed batch configuration, as submitted by create and update calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BatchConfigInput {
    /// Whether scheduled training sessions are active.
    #[serde(default)]
    pub training_enabled: bool,

    /// Whether lab access is active.
    #[serde(default)]
    pub lab_enabled: bool,

    /// Whether assessments are active.
    #[serde(default)]
    pub assessment_enabled: bool,

    /// Training schedule; required when training is enabled.
    pub training: Option<TrainingScheduleInput>,

    /// Lab access config; required when labs are enabled.
    pub lab: Option<LabAccess>,

    /// Assessment window; required when assessments are enabled without
    /// training, discarded when training is also enabled.
    pub assessment: Option<AssessmentWindowInput>,
}

/// The validator's accepted output: flags plus normalized configs, ready
/// for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedBatchConfig {
    pub training_enabled: bool,
    pub lab_enabled: bool,
    pub assessment_enabled: bool,

    /// Present iff training is enabled.
    pub training: Option<TrainingSchedule>,

    /// Present iff labs are enabled.
    pub lab: Option<LabAccess>,

    /// Present iff assessments are enabled.
    pub assessment: Option<AssessmentPlan>,

    /// Data-quality findings that do not block acceptance (e.g. a lab mode
    /// supplied without its sub-fields). Surfaced to callers and logged;
    /// never silently dropped.
    pub warnings: Vec<String>,
}

impl NormalizedBatchConfig {
    /// Serialize the three configs into their JSONB column values.
    pub fn config_columns(
        &self,
    ) -> Result<
        (
            Option<serde_json::Value>,
            Option<serde_json::Value>,
            Option<serde_json::Value>,
        ),
        serde_json::Error,
    > {
        let training = self.training.as_ref().map(serde_json::to_value).transpose()?;
        let lab = self.lab.as_ref().map(serde_json::to_value).transpose()?;
        let assessment = self.assessment.as_ref().map(serde_json::to_value).transpose()?;
        Ok((training, lab, assessment))
    }
}
