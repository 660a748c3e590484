//! OpenAPI document assembly.

use axum::Json;
use utoipa::OpenApi;

/// The service's OpenAPI description.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kohort API",
        description = "Batch governance and enrollment for the kohort training platform"
    ),
    paths(
        kohort_api_batches::handlers::create::create_batch_handler,
        kohort_api_batches::handlers::update::update_batch_handler,
        kohort_api_batches::handlers::read::get_batch_handler,
        kohort_api_batches::handlers::read::list_batches_handler,
        kohort_api_enrollments::handlers::reconcile::reconcile_enrollment_handler,
        kohort_api_enrollments::handlers::bulk::bulk_enroll_handler,
        kohort_api_enrollments::handlers::list::list_enrollments_handler,
    ),
    components(schemas(
        kohort_api_batches::models::CreateBatchRequest,
        kohort_api_batches::models::UpdateBatchRequest,
        kohort_api_batches::models::BatchResponse,
        kohort_api_batches::models::BatchListResponse,
        kohort_api_enrollments::models::EnrollmentRowRequest,
        kohort_api_enrollments::models::EnrollmentRowsRequest,
        kohort_api_enrollments::models::ReconcileResponse,
        kohort_api_enrollments::models::BulkEnrollResponse,
        kohort_api_enrollments::models::EnrollmentResponse,
        kohort_api_enrollments::models::EnrollmentListResponse,
    )),
    tags(
        (name = "Batches", description = "Batch governance operations"),
        (name = "Enrollments", description = "Batch enrollment operations"),
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON.
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
