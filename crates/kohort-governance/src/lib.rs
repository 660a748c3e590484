//! Batch configuration governance.
//!
//! Two components live here:
//!
//! - [`services::validation`]: the pure admissibility rules deciding
//!   whether a batch's feature toggles (training, labs, assessments) and
//!   per-feature configs form a legal combination, producing the normalized
//!   configuration that gets persisted;
//! - [`services::lifecycle`]: batch create/update, which couples every
//!   batch 1:1 with its generated program container inside one transaction.
//!
//! The create and update paths call the same validation function; the rules
//! can never diverge between them.

pub mod error;
pub mod services;
pub mod types;

pub use error::{BatchConfigError, GovernanceError};
pub use services::lifecycle::{BatchLifecycleService, CreateBatchInput, UpdateBatchInput};
pub use services::validation::validate_batch_config;
pub use types::{
    AssessmentPlan, AssessmentWindowInput, BatchConfigInput, LabAccess, NormalizedBatchConfig,
    TrainerAssessmentStatus, TrainingSchedule, TrainingScheduleInput, Weekday,
};
