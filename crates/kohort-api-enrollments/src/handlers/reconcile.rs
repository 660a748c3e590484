//! Atomic enrollment endpoint handler.
//!
//! POST /orgs/:org_id/batches/:batch_id/enrollments/reconcile

use axum::{extract::Path, Extension, Json};
use kohort_core::{BatchId, CallerContext, OrgId};
use kohort_enrollment::EnrollmentReconciler;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiEnrollmentsError;
use crate::handlers::ensure_org_scope;
use crate::models::{EnrollmentRowsRequest, ReconcileResponse};

/// Enrolls every submitted row into the batch, or none of them.
///
/// All-or-nothing: a validation failure or cross-organization conflict on
/// any row rejects the entire call with nothing committed.
#[utoipa::path(
    post,
    path = "/orgs/{org_id}/batches/{batch_id}/enrollments/reconcile",
    params(
        ("org_id" = Uuid, Path, description = "Owning organization"),
        ("batch_id" = Uuid, Path, description = "Target batch"),
    ),
    request_body = EnrollmentRowsRequest,
    responses(
        (status = 200, description = "All rows enrolled", body = ReconcileResponse),
        (status = 400, description = "Row validation failed; nothing committed"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Org-admin privilege required"),
        (status = 404, description = "Batch not found"),
        (status = 409, description = "Cross-organization conflict; nothing committed"),
    ),
    tag = "Enrollments"
)]
pub async fn reconcile_enrollment_handler(
    Extension(caller): Extension<CallerContext>,
    Extension(reconciler): Extension<Arc<EnrollmentReconciler>>,
    Path((org_id, batch_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<EnrollmentRowsRequest>,
) -> Result<Json<ReconcileResponse>, ApiEnrollmentsError> {
    let org_id = OrgId::from_uuid(org_id);
    ensure_org_scope(&caller, org_id)?;

    tracing::info!(
        caller = %caller.user_id,
        org_id = %org_id,
        batch_id = %batch_id,
        rows = request.rows.len(),
        "Reconciling enrollment"
    );

    let rows = request.into_rows();
    let outcome = reconciler
        .reconcile(&caller, org_id, BatchId::from_uuid(batch_id), &rows)
        .await?;

    Ok(Json(outcome.into()))
}
