//! Program model.
//!
//! A program is the lightweight content container created 1:1 with each
//! batch. Its title mirrors the batch name and is renamed whenever the
//! batch is renamed; both writes happen inside the lifecycle service's
//! transaction.

use chrono::{DateTime, Utc};
use kohort_core::{OrgId, OrgScoped};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

/// A content container tied to a batch.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Program {
    /// Unique identifier for the program.
    pub id: Uuid,

    /// The organization this program belongs to.
    pub organization_id: Uuid,

    /// Title, kept in sync with the owning batch's name.
    pub title: String,

    /// Opaque curriculum payload; not interpreted by this core.
    pub curriculum: serde_json::Value,

    /// When the program was created.
    pub created_at: DateTime<Utc>,

    /// When the program was last updated.
    pub updated_at: DateTime<Utc>,
}

impl OrgScoped for Program {
    fn org_id(&self) -> OrgId {
        OrgId::from_uuid(self.organization_id)
    }
}

impl Program {
    /// Create a program inside an open transaction.
    pub async fn create_in_tx<'e>(
        tx: &mut Transaction<'e, Postgres>,
        org_id: Uuid,
        title: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO programs (organization_id, title)
            VALUES ($1, $2)
            RETURNING *
            ",
        )
        .bind(org_id)
        .bind(title)
        .fetch_one(&mut **tx)
        .await
    }

    /// Rename a program inside an open transaction.
    pub async fn rename_in_tx<'e>(
        tx: &mut Transaction<'e, Postgres>,
        org_id: Uuid,
        id: Uuid,
        title: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            UPDATE programs
            SET title = $3, updated_at = NOW()
            WHERE id = $1 AND organization_id = $2
            RETURNING *
            ",
        )
        .bind(id)
        .bind(org_id)
        .bind(title)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Find a program by ID within an organization.
    pub async fn find_by_id_in_org(
        pool: &PgPool,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM programs WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(org_id)
            .fetch_optional(pool)
            .await
    }
}
