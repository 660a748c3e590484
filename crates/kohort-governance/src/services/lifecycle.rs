//! Batch lifecycle service.
//!
//! Owns the coupling between a batch and its generated program container:
//! both are written inside one transaction, so a failure on either side
//! rolls the pair back and no orphaned program is ever visible.

use std::sync::Arc;

use chrono::NaiveDate;
use kohort_core::{AuthorizationGate, BatchId, CallerContext, OrgId, PrivilegeTier, UserId};
use kohort_db::models::{Batch, BatchStatus, CreateBatch, Organization, Program, UpdateBatch, User};
use sqlx::PgPool;

use crate::error::GovernanceError;
use crate::services::validation::validate_batch_config;
use crate::types::BatchConfigInput;

/// Input for creating a batch.
#[derive(Debug, Clone)]
pub struct CreateBatchInput {
    /// Organization the batch (and its program) will belong to.
    pub org_id: OrgId,
    /// Batch name; the generated program takes it as its title.
    pub name: String,
    /// First day of the batch.
    pub starts_on: NaiveDate,
    /// Last day of the batch.
    pub ends_on: NaiveDate,
    /// Proposed feature flags and configs.
    pub config: BatchConfigInput,
}

/// Input for updating a batch.
///
/// Carries the full proposed state; the same admissibility rules run as on
/// create. `owner_id` is applied independently of the feature-flag rules.
#[derive(Debug, Clone)]
pub struct UpdateBatchInput {
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub status: BatchStatus,
    pub owner_id: Option<UserId>,
    pub config: BatchConfigInput,
}

/// Service for batch create/update and the coupled program container.
#[derive(Clone)]
pub struct BatchLifecycleService {
    pool: PgPool,
    gate: Arc<dyn AuthorizationGate>,
}

impl BatchLifecycleService {
    /// Tier required to create or update batches.
    pub const REQUIRED_TIER: PrivilegeTier = PrivilegeTier::Platform;

    /// Tier required for read paths.
    pub const READ_TIER: PrivilegeTier = PrivilegeTier::Instructor;

    /// Create a new lifecycle service.
    pub fn new(pool: PgPool, gate: Arc<dyn AuthorizationGate>) -> Self {
        Self { pool, gate }
    }

    /// Create a batch and its program container.
    ///
    /// On success the batch starts in status `planned` and references a
    /// freshly created program titled after it. A validator rejection is
    /// returned untouched with no writes.
    pub async fn create_batch(
        &self,
        caller: &CallerContext,
        input: CreateBatchInput,
    ) -> Result<Batch, GovernanceError> {
        if !self.gate.has_privilege(caller, Self::REQUIRED_TIER) {
            return Err(GovernanceError::PermissionDenied {
                required: Self::REQUIRED_TIER,
            });
        }

        let normalized = validate_batch_config(&input.config)?;
        for warning in &normalized.warnings {
            tracing::warn!(org_id = %input.org_id, batch_name = %input.name, "{warning}");
        }
        let (training_config, lab_config, assessment_config) = normalized.config_columns()?;

        if !Organization::exists(&self.pool, *input.org_id.as_uuid()).await? {
            return Err(GovernanceError::OrganizationNotFound(*input.org_id.as_uuid()));
        }

        let mut tx = self.pool.begin().await?;
        let program =
            Program::create_in_tx(&mut tx, *input.org_id.as_uuid(), &input.name).await?;
        let batch = Batch::create_in_tx(
            &mut tx,
            &CreateBatch {
                organization_id: *input.org_id.as_uuid(),
                program_id: program.id,
                name: input.name.clone(),
                starts_on: input.starts_on,
                ends_on: input.ends_on,
                training_enabled: normalized.training_enabled,
                lab_enabled: normalized.lab_enabled,
                assessment_enabled: normalized.assessment_enabled,
                training_config,
                lab_config,
                assessment_config,
            },
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            org_id = %input.org_id,
            batch_id = %batch.id,
            program_id = %program.id,
            "Batch created"
        );
        Ok(batch)
    }

    /// Update a batch, renaming its program when the name changed.
    ///
    /// On a validator rejection the batch is left unchanged.
    pub async fn update_batch(
        &self,
        caller: &CallerContext,
        org_id: OrgId,
        batch_id: BatchId,
        input: UpdateBatchInput,
    ) -> Result<Batch, GovernanceError> {
        if !self.gate.has_privilege(caller, Self::REQUIRED_TIER) {
            return Err(GovernanceError::PermissionDenied {
                required: Self::REQUIRED_TIER,
            });
        }

        let existing = Batch::find_by_id_in_org(
            &self.pool,
            *org_id.as_uuid(),
            *batch_id.as_uuid(),
        )
        .await?
        .ok_or_else(|| GovernanceError::BatchNotFound(*batch_id.as_uuid()))?;

        let normalized = validate_batch_config(&input.config)?;
        for warning in &normalized.warnings {
            tracing::warn!(org_id = %org_id, batch_id = %batch_id, "{warning}");
        }
        let (training_config, lab_config, assessment_config) = normalized.config_columns()?;

        // Owner reassignment is independent of the feature-flag rules, but
        // the owner must be a user of the batch's organization.
        if let Some(owner_id) = input.owner_id {
            User::find_by_id_in_org(&self.pool, *org_id.as_uuid(), *owner_id.as_uuid())
                .await?
                .ok_or_else(|| GovernanceError::OwnerNotFound(*owner_id.as_uuid()))?;
        }

        let mut tx = self.pool.begin().await?;
        let updated = Batch::update_in_tx(
            &mut tx,
            *org_id.as_uuid(),
            *batch_id.as_uuid(),
            &UpdateBatch {
                name: input.name.clone(),
                starts_on: input.starts_on,
                ends_on: input.ends_on,
                status: input.status,
                owner_id: input.owner_id.map(|id| *id.as_uuid()),
                training_enabled: normalized.training_enabled,
                lab_enabled: normalized.lab_enabled,
                assessment_enabled: normalized.assessment_enabled,
                training_config,
                lab_config,
                assessment_config,
            },
        )
        .await?
        .ok_or_else(|| GovernanceError::BatchNotFound(*batch_id.as_uuid()))?;

        if updated.name != existing.name {
            Program::rename_in_tx(&mut tx, *org_id.as_uuid(), existing.program_id, &updated.name)
                .await?;
        }
        tx.commit().await?;

        tracing::info!(
            org_id = %org_id,
            batch_id = %batch_id,
            renamed = updated.name != existing.name,
            "Batch updated"
        );
        Ok(updated)
    }

    /// Fetch a batch by ID within an organization.
    pub async fn get_batch(
        &self,
        caller: &CallerContext,
        org_id: OrgId,
        batch_id: BatchId,
    ) -> Result<Batch, GovernanceError> {
        if !self.gate.has_privilege(caller, Self::READ_TIER) {
            return Err(GovernanceError::PermissionDenied {
                required: Self::READ_TIER,
            });
        }
        Batch::find_by_id_in_org(&self.pool, *org_id.as_uuid(), *batch_id.as_uuid())
            .await?
            .ok_or_else(|| GovernanceError::BatchNotFound(*batch_id.as_uuid()))
    }

    /// List an organization's batches, newest first, with the total count.
    pub async fn list_batches(
        &self,
        caller: &CallerContext,
        org_id: OrgId,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Batch>, i64), GovernanceError> {
        if !self.gate.has_privilege(caller, Self::READ_TIER) {
            return Err(GovernanceError::PermissionDenied {
                required: Self::READ_TIER,
            });
        }
        let batches =
            Batch::list_by_org(&self.pool, *org_id.as_uuid(), limit, offset).await?;
        let total = Batch::count_by_org(&self.pool, *org_id.as_uuid()).await?;
        Ok((batches, total))
    }
}
