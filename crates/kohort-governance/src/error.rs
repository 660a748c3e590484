//! Error types for batch governance.

use kohort_core::PrivilegeTier;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// A batch configuration rejected by the admissibility rules.
///
/// Rules are evaluated in a fixed order and the first failure wins, so a
/// rejection always names exactly one rule. Serializes to a
/// machine-checkable `kind` tag; the human-readable reason comes from
/// `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatchConfigError {
    /// None of the three feature flags is enabled.
    #[error("At least one of training, labs or assessments must be enabled")]
    NoFeatureSelected,

    /// Labs and assessments were combined without training.
    #[error("Labs and assessments can only be combined when training is also enabled")]
    LabsAndAssessmentsRequireTraining,

    /// Training is enabled but the schedule is missing days or times.
    #[error("Training requires at least one weekday and both a start and end time")]
    TrainingScheduleIncomplete,

    /// Labs are enabled without a declared access mode.
    #[error("Labs require an access mode (fixed, quota or date_range)")]
    LabModeRequired,

    /// An assessment-only batch is missing its window.
    #[error("Assessments without training require an explicit start and end window")]
    AssessmentWindowRequired,
}

/// Errors from the batch lifecycle service.
#[derive(Debug, Error)]
pub enum GovernanceError {
    /// The proposed configuration violated an admissibility rule.
    #[error(transparent)]
    Config(#[from] BatchConfigError),

    /// The caller's privilege tier is insufficient.
    #[error("Permission denied: requires {required} privilege")]
    PermissionDenied {
        /// The tier the rejected operation requires.
        required: PrivilegeTier,
    },

    /// The target organization does not exist.
    #[error("Organization {0} not found")]
    OrganizationNotFound(Uuid),

    /// The target batch does not exist in the given organization.
    #[error("Batch {0} not found")]
    BatchNotFound(Uuid),

    /// The proposed owner is not a user of the batch's organization.
    #[error("Owner {0} not found in organization")]
    OwnerNotFound(Uuid),

    /// Config serialization failed before persistence.
    #[error("Failed to serialize batch configuration: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying store failure. The transaction wrapping each operation
    /// guarantees no half-created batch/program pair is left behind.
    #[error("Persistence error: {0}")]
    Database(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_serializes_with_kind_tag() {
        let json = serde_json::to_string(&BatchConfigError::NoFeatureSelected).unwrap();
        assert!(json.contains("\"kind\":\"no_feature_selected\""));
    }

    #[test]
    fn config_error_display_is_human_readable() {
        let msg = BatchConfigError::LabsAndAssessmentsRequireTraining.to_string();
        assert!(msg.contains("training"));
    }

    #[test]
    fn governance_error_wraps_config_transparently() {
        let err: GovernanceError = BatchConfigError::LabModeRequired.into();
        assert_eq!(err.to_string(), BatchConfigError::LabModeRequired.to_string());
    }
}
