//! Request and response models for the batch API.

use chrono::{DateTime, NaiveDate, Utc};
use kohort_db::models::{Batch, BatchStatus};
use kohort_governance::BatchConfigInput;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Request to create a new batch.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateBatchRequest {
    /// Batch name; the generated program takes it as its title.
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    /// First day of the batch.
    pub starts_on: NaiveDate,

    /// Last day of the batch.
    pub ends_on: NaiveDate,

    /// Feature flags and per-feature configs.
    pub config: BatchConfigInput,
}

/// Request to update an existing batch.
///
/// Carries the full proposed state; the same admissibility rules run as on
/// create.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct UpdateBatchRequest {
    /// New batch name; renames the linked program when changed.
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    /// First day of the batch.
    pub starts_on: NaiveDate,

    /// Last day of the batch.
    pub ends_on: NaiveDate,

    /// Lifecycle status.
    pub status: BatchStatus,

    /// Optional lead; must be a user of the batch's organization.
    #[serde(default)]
    pub owner_id: Option<Uuid>,

    /// Feature flags and per-feature configs.
    pub config: BatchConfigInput,
}

/// Query parameters for listing batches.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListBatchesQuery {
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: Option<i64>,

    /// Maximum number of batches to return (default: 20, max: 100).
    #[serde(default)]
    pub limit: Option<i64>,
}

impl ListBatchesQuery {
    /// Default page size.
    pub const DEFAULT_LIMIT: i64 = 20;

    /// Maximum allowed page size.
    pub const MAX_LIMIT: i64 = 100;

    /// Get the offset, defaulting to 0.
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    /// Get the limit, clamped to valid range.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

/// A batch as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub program_id: Uuid,
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub status: BatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    pub training_enabled: bool,
    pub lab_enabled: bool,
    pub assessment_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_config: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lab_config: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_config: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Batch> for BatchResponse {
    fn from(batch: Batch) -> Self {
        Self {
            id: batch.id,
            organization_id: batch.organization_id,
            program_id: batch.program_id,
            name: batch.name,
            starts_on: batch.starts_on,
            ends_on: batch.ends_on,
            status: batch.status,
            owner_id: batch.owner_id,
            training_enabled: batch.training_enabled,
            lab_enabled: batch.lab_enabled,
            assessment_enabled: batch.assessment_enabled,
            training_config: batch.training_config,
            lab_config: batch.lab_config,
            assessment_config: batch.assessment_config,
            created_at: batch.created_at,
            updated_at: batch.updated_at,
        }
    }
}

/// Paginated batch listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchListResponse {
    /// The page of batches, newest first.
    pub batches: Vec<BatchResponse>,

    /// Total batches in the organization.
    pub total: i64,

    /// Offset used for this page.
    pub offset: i64,

    /// Limit used for this page.
    pub limit: i64,
}
