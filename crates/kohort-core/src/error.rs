//! Standardized error types.
//!
//! [`KohortError`] covers the failure shapes shared by every service crate:
//! privilege failures, missing resources, tenant isolation violations and
//! input validation. Domain-specific errors (batch configuration rules,
//! enrollment conflicts) live in their own crates and wrap or stand beside
//! these.

use crate::ids::OrgId;
use serde::Serialize;
use thiserror::Error;

/// Platform-wide error type.
///
/// Each variant maps cleanly onto an HTTP status when surfaced through the
/// API crates, but the type itself is transport-agnostic.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KohortError {
    /// The caller's privilege tier is insufficient for the operation.
    ///
    /// Carries the tier that would have been required. No partial effect
    /// ever precedes this error.
    #[error("Permission denied: requires {required} privilege")]
    PermissionDenied {
        /// Privilege tier required by the rejected operation.
        required: String,
    },

    /// Requested resource was not found.
    #[error("{resource} not found{}", id.as_ref().map(|i| format!(": {i}")).unwrap_or_default())]
    NotFound {
        /// The type of resource that was not found (e.g., "Batch").
        resource: String,
        /// Optional identifier of the resource.
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// Tenant isolation violation.
    ///
    /// An operation attempted to touch data owned by a different
    /// organization. This is a security boundary, not a data-quality
    /// warning.
    #[error("Organization mismatch: expected {expected}, got {actual}")]
    OrgMismatch {
        /// The organization the operation was scoped to.
        expected: OrgId,
        /// The organization that actually owns the data.
        actual: OrgId,
    },

    /// Input validation failure.
    #[error("Validation error on field '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// Description of the validation failure.
        message: String,
    },
}

/// Type alias for Results using [`KohortError`].
pub type Result<T> = std::result::Result<T, KohortError>;
