//! Error types for the enrollment services.

use kohort_core::PrivilegeTier;
use thiserror::Error;
use uuid::Uuid;

use crate::types::RowFailure;

/// Errors from the enrollment services.
///
/// On the atomic path every variant means "nothing was committed". The
/// best-effort path only returns the variants that fail the call as a
/// whole (privilege, missing batch); per-row problems are folded into the
/// report's counters instead. The API layer renders these as problem
/// documents carrying the machine-checkable kind plus the per-row or
/// per-email detail.
#[derive(Debug, Error)]
pub enum EnrollmentError {
    /// One or more rows failed the local syntactic checks. Carries a
    /// reason per offending row; no row was processed.
    #[error("{} row(s) failed validation", reasons.len())]
    ValidationFailed {
        /// Per-row failures, in row order.
        reasons: Vec<RowFailure>,
    },

    /// One or more emails already belong to a user of a different
    /// organization. A tenant-isolation boundary, fatal to the whole call
    /// on the atomic path.
    #[error("{} email(s) belong to another organization", emails.len())]
    CrossOrgConflict {
        /// The offending emails, so the caller can correct the source data.
        emails: Vec<String>,
    },

    /// The target batch does not exist in the given organization.
    #[error("Batch {0} not found")]
    BatchNotFound(Uuid),

    /// The caller's privilege tier is insufficient.
    #[error("Permission denied: requires {required} privilege")]
    PermissionDenied {
        /// The tier the rejected operation requires.
        required: PrivilegeTier,
    },

    /// Underlying store failure. On the atomic path the surrounding
    /// transaction has been rolled back; the caller must assume nothing
    /// was committed.
    #[error("Persistence error: {0}")]
    Database(#[from] sqlx::Error),
}
