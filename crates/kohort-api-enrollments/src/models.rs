//! Request and response models for the enrollment API.

use kohort_db::models::{Enrollment, EnrollmentStatus, UserRole};
use kohort_enrollment::{BulkEnrollmentReport, EnrollmentRow, ReconcileOutcome, RowFailure};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// One submitted enrollment row.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EnrollmentRowRequest {
    /// Email identifying the account, platform-wide.
    pub email: String,

    /// Display name.
    pub name: String,

    /// Role for a newly created account (default: learner).
    #[serde(default)]
    pub role: Option<UserRole>,
}

impl From<EnrollmentRowRequest> for EnrollmentRow {
    fn from(request: EnrollmentRowRequest) -> Self {
        Self {
            email: request.email,
            name: request.name,
            role: request.role,
        }
    }
}

/// Request body for both enrollment endpoints.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EnrollmentRowsRequest {
    /// Rows to enroll, processed in order.
    pub rows: Vec<EnrollmentRowRequest>,
}

impl EnrollmentRowsRequest {
    /// Convert into domain rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<EnrollmentRow> {
        self.rows.into_iter().map(EnrollmentRow::from).collect()
    }
}

/// Response from a successful atomic reconciliation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReconcileResponse {
    /// Rows processed.
    pub enrolled_count: usize,

    /// Rows that produced a new enrollment.
    pub newly_enrolled: usize,
}

impl From<ReconcileOutcome> for ReconcileResponse {
    fn from(outcome: ReconcileOutcome) -> Self {
        Self {
            enrolled_count: outcome.enrolled_count,
            newly_enrolled: outcome.newly_enrolled,
        }
    }
}

/// Response from a best-effort bulk run.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkEnrollResponse {
    /// Rows whose enrollment was ensured.
    pub success: usize,

    /// Rows skipped after an error.
    pub failed: usize,

    /// Successful rows that created a new user.
    pub new_users: usize,

    /// Successful rows that matched an existing user.
    pub existing: usize,

    /// Per-row detail for every failed row.
    pub errors: Vec<RowFailure>,
}

impl From<BulkEnrollmentReport> for BulkEnrollResponse {
    fn from(report: BulkEnrollmentReport) -> Self {
        Self {
            success: report.success,
            failed: report.failed,
            new_users: report.new_users,
            existing: report.existing,
            errors: report.errors,
        }
    }
}

/// Query parameters for listing enrollments.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListEnrollmentsQuery {
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: Option<i64>,

    /// Maximum number of enrollments to return (default: 50, max: 200).
    #[serde(default)]
    pub limit: Option<i64>,
}

impl ListEnrollmentsQuery {
    /// Default page size.
    pub const DEFAULT_LIMIT: i64 = 50;

    /// Maximum allowed page size.
    pub const MAX_LIMIT: i64 = 200;

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

/// An enrollment as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub batch_id: Uuid,
    pub status: EnrollmentStatus,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            id: enrollment.id,
            user_id: enrollment.user_id,
            batch_id: enrollment.batch_id,
            status: enrollment.status,
            enrolled_at: enrollment.enrolled_at,
        }
    }
}

/// Paginated enrollment listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnrollmentListResponse {
    /// The page of enrollments, oldest first.
    pub enrollments: Vec<EnrollmentResponse>,

    /// Total enrollments in the batch.
    pub total: i64,

    /// Offset used for this page.
    pub offset: i64,

    /// Limit used for this page.
    pub limit: i64,
}
