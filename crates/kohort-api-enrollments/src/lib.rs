//! HTTP API for batch enrollment.
//!
//! Exposes both enrollment paths over axum:
//!
//! - the **atomic** reconcile endpoint, where every row is enrolled or none
//!   are;
//! - the **best-effort** bulk endpoint for large imports, where partial
//!   success is expected and reported via counters.
//!
//! The caller's identity arrives as a [`kohort_core::CallerContext`]
//! request extension stamped by the deployment's authentication middleware.

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;

pub use error::ApiEnrollmentsError;
pub use router::{enrollments_router, EnrollmentsState};
