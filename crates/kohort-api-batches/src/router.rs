//! Router and state for the batch API.

use axum::{
    routing::{get, post},
    Extension, Router,
};
use kohort_governance::BatchLifecycleService;
use std::sync::Arc;

use crate::handlers;

/// Shared state for batch routes.
#[derive(Clone)]
pub struct BatchesState {
    /// Lifecycle service handling all batch operations.
    pub service: Arc<BatchLifecycleService>,
}

impl BatchesState {
    /// Create a new `BatchesState`.
    #[must_use]
    pub fn new(service: Arc<BatchLifecycleService>) -> Self {
        Self { service }
    }
}

/// Create the batch router.
///
/// Routes:
/// - POST   /`orgs/:org_id/batches`            — create batch
/// - GET    /`orgs/:org_id/batches`            — list batches
/// - GET    /`orgs/:org_id/batches/:batch_id`  — get batch
/// - PUT    /`orgs/:org_id/batches/:batch_id`  — update batch
///
/// The deployment's authentication middleware must insert a
/// `CallerContext` extension on every request reaching these routes.
pub fn batches_router(state: BatchesState) -> Router {
    Router::new()
        .route(
            "/orgs/:org_id/batches",
            post(handlers::create::create_batch_handler).get(handlers::read::list_batches_handler),
        )
        .route(
            "/orgs/:org_id/batches/:batch_id",
            get(handlers::read::get_batch_handler).put(handlers::update::update_batch_handler),
        )
        .layer(Extension(state.service.clone()))
}
