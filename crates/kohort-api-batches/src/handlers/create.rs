//! Create batch endpoint handler.
//!
//! POST /orgs/:org_id/batches

use axum::{extract::Path, http::StatusCode, Extension, Json};
use kohort_core::{CallerContext, OrgId};
use kohort_governance::{BatchLifecycleService, CreateBatchInput};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiBatchesError;
use crate::handlers::ensure_org_scope;
use crate::models::{BatchResponse, CreateBatchRequest};

/// Creates a batch and its program container in the target organization.
#[utoipa::path(
    post,
    path = "/orgs/{org_id}/batches",
    params(("org_id" = Uuid, Path, description = "Target organization")),
    request_body = CreateBatchRequest,
    responses(
        (status = 201, description = "Batch created", body = BatchResponse),
        (status = 400, description = "Configuration rejected"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Platform privilege required"),
    ),
    tag = "Batches"
)]
pub async fn create_batch_handler(
    Extension(caller): Extension<CallerContext>,
    Extension(service): Extension<Arc<BatchLifecycleService>>,
    Path(org_id): Path<Uuid>,
    Json(request): Json<CreateBatchRequest>,
) -> Result<(StatusCode, Json<BatchResponse>), ApiBatchesError> {
    let org_id = OrgId::from_uuid(org_id);
    ensure_org_scope(&caller, org_id)?;
    request
        .validate()
        .map_err(|e| ApiBatchesError::Validation(e.to_string()))?;

    tracing::info!(caller = %caller.user_id, org_id = %org_id, "Creating batch");

    let batch = service
        .create_batch(
            &caller,
            CreateBatchInput {
                org_id,
                name: request.name,
                starts_on: request.starts_on,
                ends_on: request.ends_on,
                config: request.config,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(batch.into())))
}
