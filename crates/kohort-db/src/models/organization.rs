//! Organization model.
//!
//! The multi-tenancy root: users, programs and batches all hang off an
//! organization. Organizations are never deleted by this core.

use chrono::{DateTime, Utc};
use kohort_core::{OrgId, OrgScoped};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// An isolated customer account.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Organization {
    /// Unique identifier for the organization.
    pub id: Uuid,

    /// Human-readable name (e.g., "Acme Corp").
    pub name: String,

    /// Optional email domain, unique across organizations when present.
    pub domain: Option<String>,

    /// When the organization was created.
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated.
    pub updated_at: DateTime<Utc>,
}

impl OrgScoped for Organization {
    fn org_id(&self) -> OrgId {
        OrgId::from_uuid(self.id)
    }
}

impl Organization {
    /// Create a new organization.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        domain: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO organizations (name, domain)
            VALUES ($1, $2)
            RETURNING *
            ",
        )
        .bind(name)
        .bind(domain)
        .fetch_one(pool)
        .await
    }

    /// Find an organization by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM organizations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether an organization with this ID exists.
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM organizations WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
