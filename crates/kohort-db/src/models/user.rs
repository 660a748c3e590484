//! User entity model.
//!
//! A user account belongs to exactly one organization, but the account's
//! email address is unique across the entire platform: a second
//! organization can never claim an email already bound elsewhere. That
//! global constraint lives in the schema (`users.email UNIQUE`) so
//! concurrent writers cannot both win; the query methods here surface it.

use chrono::{DateTime, Utc};
use kohort_core::{OrgId, OrgScoped, PrivilegeTier, UserId};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Type};
use uuid::Uuid;

/// Role held by a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Type, Serialize, Deserialize)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum UserRole {
    /// Platform operator.
    SuperAdmin,
    /// Organization administrator.
    OrgAdmin,
    /// Trainer / batch lead.
    Instructor,
    /// Enrolled participant.
    #[default]
    Learner,
    /// Invited but not yet registered.
    Guest,
}

impl UserRole {
    /// The privilege tier this role grants.
    #[must_use]
    pub fn privilege_tier(&self) -> PrivilegeTier {
        match self {
            UserRole::SuperAdmin => PrivilegeTier::Platform,
            UserRole::OrgAdmin => PrivilegeTier::OrgAdmin,
            UserRole::Instructor => PrivilegeTier::Instructor,
            UserRole::Learner => PrivilegeTier::Learner,
            UserRole::Guest => PrivilegeTier::Guest,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::OrgAdmin => "org_admin",
            UserRole::Instructor => "instructor",
            UserRole::Learner => "learner",
            UserRole::Guest => "guest",
        };
        f.write_str(s)
    }
}

/// A user account.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Unique identifier for the user.
    pub id: Uuid,

    /// The organization this user belongs to.
    pub organization_id: Uuid,

    /// Email address, unique across all organizations.
    pub email: String,

    /// Display name.
    pub name: String,

    /// Role held within the organization.
    pub role: UserRole,

    /// Placeholder credential marker. Credential issuance is handled by the
    /// external identity system; enrollment only stamps a marker.
    pub credential_ref: String,

    /// Whether the account is active.
    pub is_active: bool,

    /// When the user was created.
    pub created_at: DateTime<Utc>,

    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl OrgScoped for User {
    fn org_id(&self) -> OrgId {
        OrgId::from_uuid(self.organization_id)
    }
}

impl User {
    /// Get the user ID as a typed [`UserId`].
    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.id)
    }

    /// Find a user by ID within a specific organization.
    pub async fn find_by_id_in_org(
        pool: &PgPool,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(org_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email, across all organizations.
    ///
    /// Email is globally unique, so this returns at most one account
    /// regardless of tenant.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Of the given emails, return those already bound to a user of an
    /// organization other than `org_id`.
    ///
    /// Used by the enrollment services as the tenant-pollution probe.
    pub async fn emails_in_other_org(
        pool: &PgPool,
        org_id: Uuid,
        emails: &[String],
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            r"
            SELECT email FROM users
            WHERE email = ANY($1) AND organization_id <> $2
            ORDER BY email
            ",
        )
        .bind(emails)
        .bind(org_id)
        .fetch_all(pool)
        .await
    }

    /// Create a user in an organization.
    pub async fn create(
        pool: &PgPool,
        org_id: Uuid,
        email: &str,
        name: &str,
        role: UserRole,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO users (organization_id, email, name, role, credential_ref)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            ",
        )
        .bind(org_id)
        .bind(email)
        .bind(name)
        .bind(role)
        .bind(pending_credential_ref())
        .fetch_one(pool)
        .await
    }

    /// Upsert a user by email, guarded to `org_id`.
    ///
    /// - If no account holds the email, one is created in `org_id` with the
    ///   given role and a placeholder credential marker.
    /// - If an account in `org_id` holds it, the display name is refreshed.
    /// - If an account in a **different** organization holds it, the
    ///   statement matches nothing and `None` is returned: the `WHERE`
    ///   guard on the conflict arm makes the cross-org check part of the
    ///   write itself, so a conflicting account created between a caller's
    ///   read and this write fails closed instead of being captured.
    pub async fn upsert_by_email_in_org<'e, E>(
        executor: E,
        org_id: Uuid,
        email: &str,
        name: &str,
        role: UserRole,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query_as(
            r"
            INSERT INTO users (organization_id, email, name, role, credential_ref)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO UPDATE
                SET name = EXCLUDED.name,
                    updated_at = NOW()
                WHERE users.organization_id = $1
            RETURNING *
            ",
        )
        .bind(org_id)
        .bind(email)
        .bind(name)
        .bind(role)
        .bind(pending_credential_ref())
        .fetch_optional(executor)
        .await
    }

}

/// Marker stamped into `credential_ref` for accounts created by enrollment.
///
/// The external identity system replaces it when the user first signs in.
fn pending_credential_ref() -> &'static str {
    "pending:enrollment"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_maps_to_privilege_tier() {
        assert_eq!(
            UserRole::SuperAdmin.privilege_tier(),
            PrivilegeTier::Platform
        );
        assert_eq!(UserRole::OrgAdmin.privilege_tier(), PrivilegeTier::OrgAdmin);
        assert_eq!(UserRole::Guest.privilege_tier(), PrivilegeTier::Guest);
    }

    #[test]
    fn default_role_is_learner() {
        assert_eq!(UserRole::default(), UserRole::Learner);
    }

    #[test]
    fn role_serde_uses_snake_case() {
        let json = serde_json::to_string(&UserRole::OrgAdmin).unwrap();
        assert_eq!(json, "\"org_admin\"");
    }

    #[test]
    fn user_id_conversion() {
        let uuid = Uuid::new_v4();
        let user = User {
            id: uuid,
            organization_id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            role: UserRole::Learner,
            credential_ref: String::new(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(*user.user_id().as_uuid(), uuid);
    }
}
