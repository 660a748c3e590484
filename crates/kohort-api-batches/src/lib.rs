//! HTTP API for batch governance.
//!
//! Exposes the batch lifecycle operations over axum. The caller's identity
//! arrives as a [`kohort_core::CallerContext`] request extension, stamped
//! by the deployment's authentication middleware; session issuance is
//! external to this service.

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;

pub use error::ApiBatchesError;
pub use router::{batches_router, BatchesState};
