//! Enrollment model.
//!
//! Links one user to one batch. The schema enforces at most one enrollment
//! per (user, batch) pair, so `ensure` is an idempotent upsert: absent rows
//! are created with status `active`, existing rows are left untouched
//! whatever their status.

use chrono::{DateTime, Utc};
use kohort_core::EnrollmentId;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Type};
use uuid::Uuid;

/// Membership status of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Type, Serialize, Deserialize)]
#[sqlx(type_name = "enrollment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum EnrollmentStatus {
    /// Participating.
    #[default]
    Active,
    /// Withdrew before completion.
    Dropped,
    /// Finished the batch.
    Completed,
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Dropped => "dropped",
            EnrollmentStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// A user's membership in a batch.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Enrollment {
    /// Unique identifier for the enrollment.
    pub id: Uuid,

    /// The enrolled user.
    pub user_id: Uuid,

    /// The batch the user is enrolled in.
    pub batch_id: Uuid,

    /// Membership status.
    pub status: EnrollmentStatus,

    /// When the enrollment was first created.
    pub enrolled_at: DateTime<Utc>,
}

/// Data required to ensure an enrollment exists.
#[derive(Debug, Clone, Copy)]
pub struct NewEnrollment {
    pub user_id: Uuid,
    pub batch_id: Uuid,
}

impl Enrollment {
    /// Get the enrollment ID as a typed [`EnrollmentId`].
    #[must_use]
    pub fn enrollment_id(&self) -> EnrollmentId {
        EnrollmentId::from_uuid(self.id)
    }

    /// Idempotently ensure an enrollment exists.
    ///
    /// Returns the created row, or `None` when the (user, batch) pair was
    /// already enrolled, in which case the existing row is untouched.
    /// Works against the pool or an open transaction.
    pub async fn ensure<'e, E>(executor: E, data: NewEnrollment) -> Result<Option<Self>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query_as(
            r"
            INSERT INTO enrollments (user_id, batch_id, status)
            VALUES ($1, $2, 'active')
            ON CONFLICT (user_id, batch_id) DO NOTHING
            RETURNING *
            ",
        )
        .bind(data.user_id)
        .bind(data.batch_id)
        .fetch_optional(executor)
        .await
    }

    /// Find an enrollment by (user, batch).
    pub async fn find_by_user_and_batch(
        pool: &PgPool,
        user_id: Uuid,
        batch_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM enrollments WHERE user_id = $1 AND batch_id = $2")
            .bind(user_id)
            .bind(batch_id)
            .fetch_optional(pool)
            .await
    }

    /// List enrollments for a batch, oldest first.
    pub async fn list_by_batch(
        pool: &PgPool,
        batch_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM enrollments
            WHERE batch_id = $1
            ORDER BY enrolled_at ASC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(batch_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Count enrollments for a batch.
    pub async fn count_by_batch(pool: &PgPool, batch_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE batch_id = $1")
            .bind(batch_id)
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serde_uses_snake_case() {
        let json = serde_json::to_string(&EnrollmentStatus::Dropped).unwrap();
        assert_eq!(json, "\"dropped\"");
    }

    #[test]
    fn default_status_is_active() {
        assert_eq!(EnrollmentStatus::default(), EnrollmentStatus::Active);
    }
}
