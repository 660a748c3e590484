//! Router and state for the enrollment API.

use axum::{
    routing::{get, post},
    Extension, Router,
};
use kohort_enrollment::{BulkEnrollmentRunner, EnrollmentReconciler};
use sqlx::PgPool;
use std::sync::Arc;

use crate::handlers;

/// Shared state for enrollment routes.
#[derive(Clone)]
pub struct EnrollmentsState {
    /// Database connection pool (read paths).
    pub pool: PgPool,
    /// Atomic reconciliation service.
    pub reconciler: Arc<EnrollmentReconciler>,
    /// Best-effort bulk runner.
    pub runner: Arc<BulkEnrollmentRunner>,
}

impl EnrollmentsState {
    /// Create a new `EnrollmentsState`.
    #[must_use]
    pub fn new(
        pool: PgPool,
        reconciler: Arc<EnrollmentReconciler>,
        runner: Arc<BulkEnrollmentRunner>,
    ) -> Self {
        Self {
            pool,
            reconciler,
            runner,
        }
    }
}

/// Create the enrollment router.
///
/// Routes:
/// - POST /`orgs/:org_id/batches/:batch_id/enrollments/reconcile` — atomic
/// - POST /`orgs/:org_id/batches/:batch_id/enrollments/bulk`      — best-effort
/// - GET  /`orgs/:org_id/batches/:batch_id/enrollments`           — list
///
/// The deployment's authentication middleware must insert a
/// `CallerContext` extension on every request reaching these routes.
pub fn enrollments_router(state: EnrollmentsState) -> Router {
    Router::new()
        .route(
            "/orgs/:org_id/batches/:batch_id/enrollments/reconcile",
            post(handlers::reconcile::reconcile_enrollment_handler),
        )
        .route(
            "/orgs/:org_id/batches/:batch_id/enrollments/bulk",
            post(handlers::bulk::bulk_enroll_handler),
        )
        .route(
            "/orgs/:org_id/batches/:batch_id/enrollments",
            get(handlers::list::list_enrollments_handler),
        )
        .layer(Extension(state.pool.clone()))
        .layer(Extension(state.reconciler.clone()))
        .layer(Extension(state.runner.clone()))
}
