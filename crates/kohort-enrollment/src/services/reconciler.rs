//! All-or-nothing enrollment reconciliation.

use std::sync::Arc;

use kohort_core::{AuthorizationGate, BatchId, CallerContext, OrgId, PrivilegeTier};
use kohort_db::models::{Batch, Enrollment, NewEnrollment, User};
use sqlx::PgPool;

use crate::error::EnrollmentError;
use crate::types::{validate_rows, EnrollmentRow, ReconcileOutcome};

/// Atomic enrollment service: every submitted row is enrolled, or none are.
#[derive(Clone)]
pub struct EnrollmentReconciler {
    pool: PgPool,
    gate: Arc<dyn AuthorizationGate>,
}

impl EnrollmentReconciler {
    /// Tier required to reconcile enrollments.
    pub const REQUIRED_TIER: PrivilegeTier = PrivilegeTier::OrgAdmin;

    /// Create a new reconciler.
    pub fn new(pool: PgPool, gate: Arc<dyn AuthorizationGate>) -> Self {
        Self { pool, gate }
    }

    /// Enroll every row into the batch, or nothing.
    ///
    /// 1. Local syntactic validation: any bad row fails the whole call
    ///    before any I/O.
    /// 2. The target batch must exist in `org_id`.
    /// 3. Tenant-pollution probe: any submitted email bound to a different
    ///    organization fails the whole call.
    /// 4. One transaction, rows in submitted order: upsert the user by
    ///    email (create in `org_id` with the row's role, or refresh the
    ///    display name), then idempotently ensure the enrollment. The user
    ///    upsert is guarded to `org_id` at the statement level, so an
    ///    account captured by another organization between steps 3 and 4
    ///    still fails closed and rolls everything back.
    pub async fn reconcile(
        &self,
        caller: &CallerContext,
        org_id: OrgId,
        batch_id: BatchId,
        rows: &[EnrollmentRow],
    ) -> Result<ReconcileOutcome, EnrollmentError> {
        if !self.gate.has_privilege(caller, Self::REQUIRED_TIER) {
            return Err(EnrollmentError::PermissionDenied {
                required: Self::REQUIRED_TIER,
            });
        }

        let reasons = validate_rows(rows);
        if !reasons.is_empty() {
            return Err(EnrollmentError::ValidationFailed { reasons });
        }

        let batch = Batch::find_by_id_in_org(&self.pool, *org_id.as_uuid(), *batch_id.as_uuid())
            .await?
            .ok_or_else(|| EnrollmentError::BatchNotFound(*batch_id.as_uuid()))?;

        let emails: Vec<String> = rows.iter().map(|row| row.email.clone()).collect();
        let offenders =
            User::emails_in_other_org(&self.pool, *org_id.as_uuid(), &emails).await?;
        if !offenders.is_empty() {
            tracing::warn!(
                org_id = %org_id,
                batch_id = %batch_id,
                offending = offenders.len(),
                "Cross-org conflict rejected enrollment"
            );
            return Err(EnrollmentError::CrossOrgConflict { emails: offenders });
        }

        let mut tx = self.pool.begin().await?;
        let mut newly_enrolled = 0;
        for row in rows {
            let user = User::upsert_by_email_in_org(
                &mut *tx,
                *org_id.as_uuid(),
                &row.email,
                &row.name,
                row.role.unwrap_or_default(),
            )
            .await?;
            let Some(user) = user else {
                // Captured by another organization after the probe; the
                // guarded upsert matched nothing.
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "Rollback failed after cross-org conflict");
                }
                return Err(EnrollmentError::CrossOrgConflict {
                    emails: vec![row.email.clone()],
                });
            };

            let created = Enrollment::ensure(
                &mut *tx,
                NewEnrollment {
                    user_id: user.id,
                    batch_id: batch.id,
                },
            )
            .await?;
            if created.is_some() {
                newly_enrolled += 1;
            }
        }
        tx.commit().await?;

        tracing::info!(
            org_id = %org_id,
            batch_id = %batch_id,
            rows = rows.len(),
            newly_enrolled,
            "Enrollment reconciled"
        );
        Ok(ReconcileOutcome {
            enrolled_count: rows.len(),
            newly_enrolled,
        })
    }
}
