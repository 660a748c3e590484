//! Enrollment listing endpoint.
//!
//! GET /orgs/:org_id/batches/:batch_id/enrollments

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use kohort_core::{CallerContext, OrgId};
use kohort_db::models::{Batch, Enrollment};
use kohort_enrollment::EnrollmentError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiEnrollmentsError;
use crate::handlers::ensure_org_scope;
use crate::models::{EnrollmentListResponse, EnrollmentResponse, ListEnrollmentsQuery};

/// List a batch's enrollments.
#[utoipa::path(
    get,
    path = "/orgs/{org_id}/batches/{batch_id}/enrollments",
    params(
        ("org_id" = Uuid, Path, description = "Owning organization"),
        ("batch_id" = Uuid, Path, description = "Target batch"),
        ListEnrollmentsQuery,
    ),
    responses(
        (status = 200, description = "Page of enrollments", body = EnrollmentListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Batch not found"),
    ),
    tag = "Enrollments"
)]
pub async fn list_enrollments_handler(
    Extension(caller): Extension<CallerContext>,
    Extension(pool): Extension<PgPool>,
    Path((org_id, batch_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<ListEnrollmentsQuery>,
) -> Result<Json<EnrollmentListResponse>, ApiEnrollmentsError> {
    let org_id = OrgId::from_uuid(org_id);
    ensure_org_scope(&caller, org_id)?;

    // Resolve the batch within the org so cross-tenant IDs 404.
    let batch = Batch::find_by_id_in_org(&pool, *org_id.as_uuid(), batch_id)
        .await
        .map_err(EnrollmentError::from)?
        .ok_or(EnrollmentError::BatchNotFound(batch_id))?;

    let (limit, offset) = (query.limit(), query.offset());
    let enrollments = Enrollment::list_by_batch(&pool, batch.id, limit, offset)
        .await
        .map_err(EnrollmentError::from)?;
    let total = Enrollment::count_by_batch(&pool, batch.id)
        .await
        .map_err(EnrollmentError::from)?;

    Ok(Json(EnrollmentListResponse {
        enrollments: enrollments.into_iter().map(EnrollmentResponse::from).collect(),
        total,
        offset,
        limit,
    }))
}
