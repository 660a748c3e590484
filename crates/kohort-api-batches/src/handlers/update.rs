//! Update batch endpoint handler.
//!
//! PUT /orgs/:org_id/batches/:batch_id

use axum::{extract::Path, Extension, Json};
use kohort_core::{BatchId, CallerContext, OrgId, UserId};
use kohort_governance::{BatchLifecycleService, UpdateBatchInput};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiBatchesError;
use crate::handlers::ensure_org_scope;
use crate::models::{BatchResponse, UpdateBatchRequest};

/// Updates a batch; renames the linked program when the name changed.
#[utoipa::path(
    put,
    path = "/orgs/{org_id}/batches/{batch_id}",
    params(
        ("org_id" = Uuid, Path, description = "Owning organization"),
        ("batch_id" = Uuid, Path, description = "Batch to update"),
    ),
    request_body = UpdateBatchRequest,
    responses(
        (status = 200, description = "Batch updated", body = BatchResponse),
        (status = 400, description = "Configuration rejected"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Platform privilege required"),
        (status = 404, description = "Batch or owner not found"),
    ),
    tag = "Batches"
)]
pub async fn update_batch_handler(
    Extension(caller): Extension<CallerContext>,
    Extension(service): Extension<Arc<BatchLifecycleService>>,
    Path((org_id, batch_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateBatchRequest>,
) -> Result<Json<BatchResponse>, ApiBatchesError> {
    let org_id = OrgId::from_uuid(org_id);
    ensure_org_scope(&caller, org_id)?;
    request
        .validate()
        .map_err(|e| ApiBatchesError::Validation(e.to_string()))?;

    tracing::info!(caller = %caller.user_id, org_id = %org_id, batch_id = %batch_id, "Updating batch");

    let batch = service
        .update_batch(
            &caller,
            org_id,
            BatchId::from_uuid(batch_id),
            UpdateBatchInput {
                name: request.name,
                starts_on: request.starts_on,
                ends_on: request.ends_on,
                status: request.status,
                owner_id: request.owner_id.map(UserId::from_uuid),
                config: request.config,
            },
        )
        .await?;

    Ok(Json(batch.into()))
}
