//! Batch configuration admissibility rules.
//!
//! Pure: no I/O, no clock, no store. Create and update both call
//! [`validate_batch_config`]; there is no second rule set.

use crate::error::BatchConfigError;
use crate::types::{
    AssessmentPlan, BatchConfigInput, NormalizedBatchConfig, TrainerAssessmentStatus,
    TrainingSchedule,
};

/// Decide whether a proposed batch configuration is admissible and, if so,
/// produce the normalized configs to persist.
///
/// Rules run in a fixed order and the first failure wins:
///
/// 1. at least one feature flag must be set;
/// 2. labs and assessments may only be combined when training is also
///    enabled (training is the governing feature for compound schedules);
/// 3. training requires a non-empty weekday set and both times;
/// 4. labs require a declared access mode (sub-fields are accepted as
///    supplied; gaps become warnings on the output);
/// 5. assessments with training are forced to a trainer-managed plan with
///    any supplied window discarded; assessments alone require an explicit
///    window, normalized to an admin-managed plan.
pub fn validate_batch_config(
    input: &BatchConfigInput,
) -> Result<NormalizedBatchConfig, BatchConfigError> {
    let mut warnings = Vec::new();

    if !(input.training_enabled || input.lab_enabled || input.assessment_enabled) {
        return Err(BatchConfigError::NoFeatureSelected);
    }

    if input.lab_enabled && input.assessment_enabled && !input.training_enabled {
        return Err(BatchConfigError::LabsAndAssessmentsRequireTraining);
    }

    let training = if input.training_enabled {
        let schedule = input
            .training
            .as_ref()
            .ok_or(BatchConfigError::TrainingScheduleIncomplete)?;
        match (schedule.start_time, schedule.end_time) {
            (Some(start_time), Some(end_time)) if !schedule.days.is_empty() => {
                Some(TrainingSchedule {
                    days: schedule.days.clone(),
                    start_time,
                    end_time,
                })
            }
            _ => return Err(BatchConfigError::TrainingScheduleIncomplete),
        }
    } else {
        None
    };

    let lab = if input.lab_enabled {
        let access = input.lab.clone().ok_or(BatchConfigError::LabModeRequired)?;
        if let Some(detail) = access.missing_detail() {
            warnings.push(detail);
        }
        Some(access)
    } else {
        None
    };

    let assessment = if input.assessment_enabled {
        if input.training_enabled {
            // Scheduling authority transfers to the instructor once
            // training exists; a caller-supplied window is discarded.
            Some(AssessmentPlan::TrainerManaged {
                status: TrainerAssessmentStatus::PendingTrainer,
            })
        } else {
            let window = input
                .assessment
                .as_ref()
                .ok_or(BatchConfigError::AssessmentWindowRequired)?;
            match (window.starts_at, window.ends_at) {
                (Some(starts_at), Some(ends_at)) => {
                    Some(AssessmentPlan::AdminManaged { starts_at, ends_at })
                }
                _ => return Err(BatchConfigError::AssessmentWindowRequired),
            }
        }
    } else {
        None
    };

    Ok(NormalizedBatchConfig {
        training_enabled: input.training_enabled,
        lab_enabled: input.lab_enabled,
        assessment_enabled: input.assessment_enabled,
        training,
        lab,
        assessment,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssessmentWindowInput, LabAccess, TrainingScheduleInput, Weekday};
    use chrono::{NaiveTime, TimeZone, Utc};

    fn complete_training() -> TrainingScheduleInput {
        TrainingScheduleInput {
            days: vec![Weekday::Mon, Weekday::Wed],
            start_time: NaiveTime::from_hms_opt(10, 0, 0),
            end_time: NaiveTime::from_hms_opt(12, 0, 0),
        }
    }

    fn window() -> AssessmentWindowInput {
        AssessmentWindowInput {
            starts_at: Some(Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap()),
            ends_at: Some(Utc.with_ymd_and_hms(2026, 9, 5, 17, 0, 0).unwrap()),
        }
    }

    #[test]
    fn all_flags_off_is_rejected() {
        let input = BatchConfigInput::default();
        assert_eq!(
            validate_batch_config(&input).unwrap_err(),
            BatchConfigError::NoFeatureSelected
        );
    }

    #[test]
    fn all_flags_off_is_rejected_even_with_configs_supplied() {
        let input = BatchConfigInput {
            training: Some(complete_training()),
            lab: Some(LabAccess::Fixed { hours_per_day: Some(2) }),
            assessment: Some(window()),
            ..Default::default()
        };
        assert_eq!(
            validate_batch_config(&input).unwrap_err(),
            BatchConfigError::NoFeatureSelected
        );
    }

    #[test]
    fn labs_plus_assessments_without_training_is_rejected() {
        let input = BatchConfigInput {
            lab_enabled: true,
            assessment_enabled: true,
            lab: Some(LabAccess::Quota { total_hours: Some(40) }),
            assessment: Some(window()),
            ..Default::default()
        };
        assert_eq!(
            validate_batch_config(&input).unwrap_err(),
            BatchConfigError::LabsAndAssessmentsRequireTraining
        );
    }

    #[test]
    fn labs_plus_assessments_rule_fires_before_config_checks() {
        // No configs at all: rule 2 must still win over rules 4 and 5.
        let input = BatchConfigInput {
            lab_enabled: true,
            assessment_enabled: true,
            ..Default::default()
        };
        assert_eq!(
            validate_batch_config(&input).unwrap_err(),
            BatchConfigError::LabsAndAssessmentsRequireTraining
        );
    }

    #[test]
    fn training_without_config_is_incomplete() {
        let input = BatchConfigInput {
            training_enabled: true,
            ..Default::default()
        };
        assert_eq!(
            validate_batch_config(&input).unwrap_err(),
            BatchConfigError::TrainingScheduleIncomplete
        );
    }

    #[test]
    fn training_with_empty_days_is_incomplete() {
        let input = BatchConfigInput {
            training_enabled: true,
            training: Some(TrainingScheduleInput {
                days: vec![],
                ..complete_training()
            }),
            ..Default::default()
        };
        assert_eq!(
            validate_batch_config(&input).unwrap_err(),
            BatchConfigError::TrainingScheduleIncomplete
        );
    }

    #[test]
    fn training_with_missing_end_time_is_incomplete() {
        let input = BatchConfigInput {
            training_enabled: true,
            training: Some(TrainingScheduleInput {
                end_time: None,
                ..complete_training()
            }),
            ..Default::default()
        };
        assert_eq!(
            validate_batch_config(&input).unwrap_err(),
            BatchConfigError::TrainingScheduleIncomplete
        );
    }

    #[test]
    fn training_only_with_complete_schedule_is_accepted() {
        let input = BatchConfigInput {
            training_enabled: true,
            training: Some(complete_training()),
            ..Default::default()
        };
        let normalized = validate_batch_config(&input).unwrap();
        let schedule = normalized.training.expect("training schedule present");
        assert_eq!(schedule.days, vec![Weekday::Mon, Weekday::Wed]);
        assert!(normalized.lab.is_none());
        assert!(normalized.assessment.is_none());
        assert!(normalized.warnings.is_empty());
    }

    #[test]
    fn lab_without_mode_is_rejected() {
        let input = BatchConfigInput {
            lab_enabled: true,
            ..Default::default()
        };
        assert_eq!(
            validate_batch_config(&input).unwrap_err(),
            BatchConfigError::LabModeRequired
        );
    }

    #[test]
    fn lab_mode_without_subfields_is_accepted_with_warning() {
        let input = BatchConfigInput {
            lab_enabled: true,
            lab: Some(LabAccess::Fixed { hours_per_day: None }),
            ..Default::default()
        };
        let normalized = validate_batch_config(&input).unwrap();
        assert_eq!(normalized.warnings.len(), 1);
        assert!(normalized.warnings[0].contains("fixed"));
        assert_eq!(
            normalized.lab,
            Some(LabAccess::Fixed { hours_per_day: None })
        );
    }

    #[test]
    fn lab_subfields_are_carried_as_supplied() {
        let input = BatchConfigInput {
            lab_enabled: true,
            lab: Some(LabAccess::Quota { total_hours: Some(64) }),
            ..Default::default()
        };
        let normalized = validate_batch_config(&input).unwrap();
        assert_eq!(
            normalized.lab,
            Some(LabAccess::Quota { total_hours: Some(64) })
        );
        assert!(normalized.warnings.is_empty());
    }

    #[test]
    fn assessment_with_training_is_forced_to_trainer_managed() {
        let input = BatchConfigInput {
            training_enabled: true,
            assessment_enabled: true,
            training: Some(complete_training()),
            assessment: Some(window()),
            ..Default::default()
        };
        let normalized = validate_batch_config(&input).unwrap();
        assert_eq!(
            normalized.assessment,
            Some(AssessmentPlan::TrainerManaged {
                status: TrainerAssessmentStatus::PendingTrainer
            })
        );
    }

    #[test]
    fn forced_trainer_managed_plan_is_idempotent_across_windows() {
        let base = BatchConfigInput {
            training_enabled: true,
            assessment_enabled: true,
            training: Some(complete_training()),
            assessment: Some(window()),
            ..Default::default()
        };
        let different_window = BatchConfigInput {
            assessment: Some(AssessmentWindowInput {
                starts_at: Some(Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap()),
                ends_at: Some(Utc.with_ymd_and_hms(2027, 2, 1, 0, 0, 0).unwrap()),
            }),
            ..base.clone()
        };
        let a = validate_batch_config(&base).unwrap();
        let b = validate_batch_config(&different_window).unwrap();
        assert_eq!(a.assessment, b.assessment, "supplied windows must be discarded");
    }

    #[test]
    fn assessment_only_without_window_is_rejected() {
        let input = BatchConfigInput {
            assessment_enabled: true,
            ..Default::default()
        };
        assert_eq!(
            validate_batch_config(&input).unwrap_err(),
            BatchConfigError::AssessmentWindowRequired
        );
    }

    #[test]
    fn assessment_only_with_partial_window_is_rejected() {
        let input = BatchConfigInput {
            assessment_enabled: true,
            assessment: Some(AssessmentWindowInput {
                ends_at: None,
                ..window()
            }),
            ..Default::default()
        };
        assert_eq!(
            validate_batch_config(&input).unwrap_err(),
            BatchConfigError::AssessmentWindowRequired
        );
    }

    #[test]
    fn assessment_only_with_window_becomes_admin_managed() {
        let input = BatchConfigInput {
            assessment_enabled: true,
            assessment: Some(window()),
            ..Default::default()
        };
        let normalized = validate_batch_config(&input).unwrap();
        match normalized.assessment {
            Some(AssessmentPlan::AdminManaged { starts_at, ends_at }) => {
                assert_eq!(Some(starts_at), window().starts_at);
                assert_eq!(Some(ends_at), window().ends_at);
            }
            other => panic!("expected admin-managed plan, got {other:?}"),
        }
    }

    #[test]
    fn all_three_features_together_are_accepted() {
        let input = BatchConfigInput {
            training_enabled: true,
            lab_enabled: true,
            assessment_enabled: true,
            training: Some(complete_training()),
            lab: Some(LabAccess::DateRange {
                starts_on: chrono::NaiveDate::from_ymd_opt(2026, 9, 1),
                ends_on: chrono::NaiveDate::from_ymd_opt(2026, 10, 1),
            }),
            assessment: None,
        };
        let normalized = validate_batch_config(&input).unwrap();
        assert!(normalized.training.is_some());
        assert!(normalized.lab.is_some());
        assert_eq!(
            normalized.assessment,
            Some(AssessmentPlan::TrainerManaged {
                status: TrainerAssessmentStatus::PendingTrainer
            })
        );
    }
}
