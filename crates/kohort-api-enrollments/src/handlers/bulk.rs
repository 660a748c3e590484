//! Best-effort bulk enrollment endpoint handler.
//!
//! POST /orgs/:org_id/batches/:batch_id/enrollments/bulk

use axum::{extract::Path, Extension, Json};
use kohort_core::{BatchId, CallerContext, OrgId};
use kohort_enrollment::BulkEnrollmentRunner;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiEnrollmentsError;
use crate::handlers::ensure_org_scope;
use crate::models::{BulkEnrollResponse, EnrollmentRowsRequest};

/// Processes each row independently and reports aggregate counters.
///
/// Best-effort: rows committed before a failure stay committed. The call
/// succeeds even with a non-zero `failed` count; per-row errors are
/// returned so the caller can resubmit exactly the failed subset. Do not
/// use this endpoint where all-or-nothing semantics are required; use the
/// reconcile endpoint instead.
#[utoipa::path(
    post,
    path = "/orgs/{org_id}/batches/{batch_id}/enrollments/bulk",
    params(
        ("org_id" = Uuid, Path, description = "Owning organization"),
        ("batch_id" = Uuid, Path, description = "Target batch"),
    ),
    request_body = EnrollmentRowsRequest,
    responses(
        (status = 200, description = "Run finished; see counters", body = BulkEnrollResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Org-admin privilege required"),
        (status = 404, description = "Batch not found"),
    ),
    tag = "Enrollments"
)]
pub async fn bulk_enroll_handler(
    Extension(caller): Extension<CallerContext>,
    Extension(runner): Extension<Arc<BulkEnrollmentRunner>>,
    Path((org_id, batch_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<EnrollmentRowsRequest>,
) -> Result<Json<BulkEnrollResponse>, ApiEnrollmentsError> {
    let org_id = OrgId::from_uuid(org_id);
    ensure_org_scope(&caller, org_id)?;

    tracing::info!(
        caller = %caller.user_id,
        org_id = %org_id,
        batch_id = %batch_id,
        rows = request.rows.len(),
        "Running bulk enrollment"
    );

    let rows = request.into_rows();
    let report = runner
        .run(&caller, org_id, BatchId::from_uuid(batch_id), &rows)
        .await?;

    Ok(Json(report.into()))
}
