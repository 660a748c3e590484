//! Enrollment reconciliation for kohort.
//!
//! Two components with deliberately different guarantees:
//!
//! - [`services::reconciler::EnrollmentReconciler`]: **all-or-nothing**.
//!   Every submitted row is enrolled inside one transaction, or none are.
//!   Use it where a partially-enrolled cohort would be an error.
//! - [`services::bulk::BulkEnrollmentRunner`]: **best-effort**. Each row
//!   is processed independently; committed rows stay committed when a later
//!   row fails, and aggregate counters report the split. Use it for large
//!   imports where some rows are known-bad. Never use it where
//!   all-or-nothing is required.
//!
//! Both paths honor the same two hard rules: an email identifies at most
//! one account platform-wide, and no enrollment ever crosses an
//! organization boundary the user does not belong to.

pub mod error;
pub mod services;
pub mod types;

pub use error::EnrollmentError;
pub use services::bulk::BulkEnrollmentRunner;
pub use services::reconciler::EnrollmentReconciler;
pub use types::{BulkEnrollmentReport, EnrollmentRow, ReconcileOutcome, RowFailure};
