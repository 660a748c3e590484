//! Batch model.
//!
//! A batch is a scheduled delivery of a program to a cohort. The three
//! feature flags and their JSONB config columns are only ever written with
//! the validator's normalized output; the lifecycle service owns that
//! contract.

use chrono::{DateTime, NaiveDate, Utc};
use kohort_core::{BatchId, OrgId, OrgScoped};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction, Type};
use uuid::Uuid;

/// Lifecycle status of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Type, Serialize, Deserialize)]
#[sqlx(type_name = "batch_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum BatchStatus {
    /// Created but not yet scheduled to run.
    #[default]
    Planned,
    /// Currently running.
    Active,
    /// Scheduled with a future start date.
    Upcoming,
    /// Finished.
    Completed,
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BatchStatus::Planned => "planned",
            BatchStatus::Active => "active",
            BatchStatus::Upcoming => "upcoming",
            BatchStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// A training batch (cohort).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Batch {
    /// Unique identifier for the batch.
    pub id: Uuid,

    /// The organization this batch belongs to.
    pub organization_id: Uuid,

    /// The program container created alongside this batch.
    pub program_id: Uuid,

    /// Batch name; the linked program's title mirrors it.
    pub name: String,

    /// First day of the batch.
    pub starts_on: NaiveDate,

    /// Last day of the batch.
    pub ends_on: NaiveDate,

    /// Lifecycle status.
    pub status: BatchStatus,

    /// Optional lead (a user of the same organization).
    pub owner_id: Option<Uuid>,

    /// Whether scheduled training sessions are active.
    pub training_enabled: bool,

    /// Whether lab access is active.
    pub lab_enabled: bool,

    /// Whether assessments are active.
    pub assessment_enabled: bool,

    /// Normalized training schedule, present iff training is enabled.
    pub training_config: Option<serde_json::Value>,

    /// Normalized lab access config, present iff labs are enabled.
    pub lab_config: Option<serde_json::Value>,

    /// Normalized assessment plan, present iff assessments are enabled.
    pub assessment_config: Option<serde_json::Value>,

    /// When the batch was created.
    pub created_at: DateTime<Utc>,

    /// When the batch was last updated.
    pub updated_at: DateTime<Utc>,
}

impl OrgScoped for Batch {
    fn org_id(&self) -> OrgId {
        OrgId::from_uuid(self.organization_id)
    }
}

/// Data required to insert a new batch.
#[derive(Debug)]
pub struct CreateBatch {
    pub organization_id: Uuid,
    pub program_id: Uuid,
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub training_enabled: bool,
    pub lab_enabled: bool,
    pub assessment_enabled: bool,
    pub training_config: Option<serde_json::Value>,
    pub lab_config: Option<serde_json::Value>,
    pub assessment_config: Option<serde_json::Value>,
}

/// Data applied to an existing batch.
#[derive(Debug)]
pub struct UpdateBatch {
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub status: BatchStatus,
    pub owner_id: Option<Uuid>,
    pub training_enabled: bool,
    pub lab_enabled: bool,
    pub assessment_enabled: bool,
    pub training_config: Option<serde_json::Value>,
    pub lab_config: Option<serde_json::Value>,
    pub assessment_config: Option<serde_json::Value>,
}

impl Batch {
    /// Get the batch ID as a typed [`BatchId`].
    #[must_use]
    pub fn batch_id(&self) -> BatchId {
        BatchId::from_uuid(self.id)
    }

    /// Insert a new batch inside an open transaction.
    ///
    /// Status always starts as [`BatchStatus::Planned`].
    pub async fn create_in_tx<'e>(
        tx: &mut Transaction<'e, Postgres>,
        data: &CreateBatch,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO batches (
                organization_id, program_id, name, starts_on, ends_on, status,
                training_enabled, lab_enabled, assessment_enabled,
                training_config, lab_config, assessment_config
            )
            VALUES ($1, $2, $3, $4, $5, 'planned', $6, $7, $8, $9, $10, $11)
            RETURNING *
            ",
        )
        .bind(data.organization_id)
        .bind(data.program_id)
        .bind(&data.name)
        .bind(data.starts_on)
        .bind(data.ends_on)
        .bind(data.training_enabled)
        .bind(data.lab_enabled)
        .bind(data.assessment_enabled)
        .bind(&data.training_config)
        .bind(&data.lab_config)
        .bind(&data.assessment_config)
        .fetch_one(&mut **tx)
        .await
    }

    /// Apply an update inside an open transaction.
    pub async fn update_in_tx<'e>(
        tx: &mut Transaction<'e, Postgres>,
        org_id: Uuid,
        id: Uuid,
        data: &UpdateBatch,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            UPDATE batches
            SET name = $3,
                starts_on = $4,
                ends_on = $5,
                status = $6,
                owner_id = $7,
                training_enabled = $8,
                lab_enabled = $9,
                assessment_enabled = $10,
                training_config = $11,
                lab_config = $12,
                assessment_config = $13,
                updated_at = NOW()
            WHERE id = $1 AND organization_id = $2
            RETURNING *
            ",
        )
        .bind(id)
        .bind(org_id)
        .bind(&data.name)
        .bind(data.starts_on)
        .bind(data.ends_on)
        .bind(data.status)
        .bind(data.owner_id)
        .bind(data.training_enabled)
        .bind(data.lab_enabled)
        .bind(data.assessment_enabled)
        .bind(&data.training_config)
        .bind(&data.lab_config)
        .bind(&data.assessment_config)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Find a batch by ID within an organization.
    pub async fn find_by_id_in_org(
        pool: &PgPool,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM batches WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(org_id)
            .fetch_optional(pool)
            .await
    }

    /// List batches for an organization, newest first.
    pub async fn list_by_org(
        pool: &PgPool,
        org_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM batches
            WHERE organization_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(org_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Count batches for an organization.
    pub async fn count_by_org(pool: &PgPool, org_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM batches WHERE organization_id = $1")
            .bind(org_id)
            .fetch_one(pool)
            .await
    }
}
