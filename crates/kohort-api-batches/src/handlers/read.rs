//! Batch read endpoints.
//!
//! GET /orgs/:org_id/batches
//! GET /orgs/:org_id/batches/:batch_id

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use kohort_core::{BatchId, CallerContext, OrgId};
use kohort_governance::BatchLifecycleService;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiBatchesError;
use crate::handlers::ensure_org_scope;
use crate::models::{BatchListResponse, BatchResponse, ListBatchesQuery};

/// Fetch one batch.
#[utoipa::path(
    get,
    path = "/orgs/{org_id}/batches/{batch_id}",
    params(
        ("org_id" = Uuid, Path, description = "Owning organization"),
        ("batch_id" = Uuid, Path, description = "Batch to fetch"),
    ),
    responses(
        (status = 200, description = "The batch", body = BatchResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Insufficient privilege"),
        (status = 404, description = "Batch not found"),
    ),
    tag = "Batches"
)]
pub async fn get_batch_handler(
    Extension(caller): Extension<CallerContext>,
    Extension(service): Extension<Arc<BatchLifecycleService>>,
    Path((org_id, batch_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BatchResponse>, ApiBatchesError> {
    let org_id = OrgId::from_uuid(org_id);
    ensure_org_scope(&caller, org_id)?;

    let batch = service
        .get_batch(&caller, org_id, BatchId::from_uuid(batch_id))
        .await?;
    Ok(Json(batch.into()))
}

/// List an organization's batches.
#[utoipa::path(
    get,
    path = "/orgs/{org_id}/batches",
    params(
        ("org_id" = Uuid, Path, description = "Owning organization"),
        ListBatchesQuery,
    ),
    responses(
        (status = 200, description = "Page of batches", body = BatchListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Insufficient privilege"),
    ),
    tag = "Batches"
)]
pub async fn list_batches_handler(
    Extension(caller): Extension<CallerContext>,
    Extension(service): Extension<Arc<BatchLifecycleService>>,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ListBatchesQuery>,
) -> Result<Json<BatchListResponse>, ApiBatchesError> {
    let org_id = OrgId::from_uuid(org_id);
    ensure_org_scope(&caller, org_id)?;

    let (limit, offset) = (query.limit(), query.offset());
    let (batches, total) = service.list_batches(&caller, org_id, limit, offset).await?;

    Ok(Json(BatchListResponse {
        batches: batches.into_iter().map(BatchResponse::from).collect(),
        total,
        offset,
        limit,
    }))
}
