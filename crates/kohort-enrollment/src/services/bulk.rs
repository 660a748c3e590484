//! Best-effort bulk enrollment.

use std::sync::Arc;

use kohort_core::{AuthorizationGate, BatchId, CallerContext, OrgId, PrivilegeTier};
use kohort_db::models::{Batch, Enrollment, NewEnrollment, User};
use sqlx::PgPool;

use crate::error::EnrollmentError;
use crate::types::{BulkEnrollmentReport, EnrollmentRow, RowFailure};

/// Outcome of one processed row.
enum RowOutcome {
    /// Enrollment ensured; a new user account was created.
    CreatedUser,
    /// Enrollment ensured against an existing account of the target org.
    ExistingUser,
}

/// Best-effort enrollment service for large imports.
///
/// Each row is processed independently: a failing row increments the
/// `failed` counter and processing continues. Rows committed before a
/// failure are **never rolled back**; that is this runner's defining
/// difference from [`crate::EnrollmentReconciler`]. Do not use it where
/// all-or-nothing semantics are required.
#[derive(Clone)]
pub struct BulkEnrollmentRunner {
    pool: PgPool,
    gate: Arc<dyn AuthorizationGate>,
}

impl BulkEnrollmentRunner {
    /// Tier required to run bulk enrollment.
    pub const REQUIRED_TIER: PrivilegeTier = PrivilegeTier::OrgAdmin;

    /// Create a new runner.
    pub fn new(pool: PgPool, gate: Arc<dyn AuthorizationGate>) -> Self {
        Self { pool, gate }
    }

    /// Process every row independently and report aggregate counters.
    ///
    /// Only a privilege failure or a missing target batch fails the call
    /// as a whole; everything else is per-row.
    pub async fn run(
        &self,
        caller: &CallerContext,
        org_id: OrgId,
        batch_id: BatchId,
        rows: &[EnrollmentRow],
    ) -> Result<BulkEnrollmentReport, EnrollmentError> {
        if !self.gate.has_privilege(caller, Self::REQUIRED_TIER) {
            return Err(EnrollmentError::PermissionDenied {
                required: Self::REQUIRED_TIER,
            });
        }

        let batch = Batch::find_by_id_in_org(&self.pool, *org_id.as_uuid(), *batch_id.as_uuid())
            .await?
            .ok_or_else(|| EnrollmentError::BatchNotFound(*batch_id.as_uuid()))?;

        let mut report = BulkEnrollmentReport::default();
        for (index, row) in rows.iter().enumerate() {
            match self.process_row(org_id, &batch, row).await {
                Ok(RowOutcome::CreatedUser) => {
                    report.success += 1;
                    report.new_users += 1;
                }
                Ok(RowOutcome::ExistingUser) => {
                    report.success += 1;
                    report.existing += 1;
                }
                Err(reason) => {
                    tracing::warn!(
                        org_id = %org_id,
                        batch_id = %batch_id,
                        row = index,
                        email = %row.email,
                        reason = %reason,
                        "Bulk enrollment row failed"
                    );
                    report.failed += 1;
                    report.errors.push(RowFailure {
                        index,
                        email: row.email.clone(),
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            org_id = %org_id,
            batch_id = %batch_id,
            success = report.success,
            failed = report.failed,
            new_users = report.new_users,
            existing = report.existing,
            "Bulk enrollment finished"
        );
        Ok(report)
    }

    /// Process a single row: validate, find-or-create the user, ensure the
    /// enrollment. Every failure is returned as a reason string and folded
    /// into the report by the caller.
    async fn process_row(
        &self,
        org_id: OrgId,
        batch: &Batch,
        row: &EnrollmentRow,
    ) -> Result<RowOutcome, String> {
        if let Some(problem) = row.email_problem() {
            return Err(problem);
        }

        // Classify new vs existing before the write; the guarded upsert
        // below re-checks tenancy at the statement level, so a cross-org
        // account created in between still fails instead of being captured.
        let existing = User::find_by_email(&self.pool, &row.email)
            .await
            .map_err(|e| format!("persistence failure: {e}"))?;
        if let Some(user) = &existing {
            if user.organization_id != *org_id.as_uuid() {
                return Err(format!(
                    "email '{}' belongs to another organization",
                    row.email
                ));
            }
        }

        let user = User::upsert_by_email_in_org(
            &self.pool,
            *org_id.as_uuid(),
            &row.email,
            &row.name,
            row.role.unwrap_or_default(),
        )
        .await
        .map_err(|e| format!("persistence failure: {e}"))?
        .ok_or_else(|| {
            format!("email '{}' belongs to another organization", row.email)
        })?;

        Enrollment::ensure(
            &self.pool,
            NewEnrollment {
                user_id: user.id,
                batch_id: batch.id,
            },
        )
        .await
        .map_err(|e| format!("persistence failure: {e}"))?;

        if existing.is_some() {
            Ok(RowOutcome::ExistingUser)
        } else {
            Ok(RowOutcome::CreatedUser)
        }
    }
}
