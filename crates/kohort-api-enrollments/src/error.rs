//! Error types for the enrollment API.
//!
//! Uses RFC 7807 Problem Details for HTTP APIs, consistent with
//! kohort-api-batches. Rejections that carry per-row or per-email detail
//! (validation failures, cross-org conflicts) embed it so callers can
//! correct and resubmit exactly the failed subset.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kohort_core::KohortError;
use kohort_enrollment::{EnrollmentError, RowFailure};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base URL for error type URIs.
const ERROR_BASE_URL: &str = "https://kohort.io/errors/enrollments";

/// RFC 7807 Problem Details, extended with per-row detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI identifying the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// Short human-readable summary.
    pub title: String,

    /// HTTP status code.
    pub status: u16,

    /// Human-readable explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Per-row failures, when the rejection is row-shaped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<RowFailure>>,

    /// Offending emails, when the rejection is a tenant-isolation conflict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
}

impl ProblemDetails {
    /// Create a new `ProblemDetails` instance.
    #[must_use]
    pub fn new(error_type: &str, title: &str, status: StatusCode) -> Self {
        Self {
            error_type: format!("{ERROR_BASE_URL}/{error_type}"),
            title: title.to_string(),
            status: status.as_u16(),
            detail: None,
            rows: None,
            emails: None,
        }
    }

    /// Add detail message.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach per-row failures.
    #[must_use]
    pub fn with_rows(mut self, rows: Vec<RowFailure>) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Attach offending emails.
    #[must_use]
    pub fn with_emails(mut self, emails: Vec<String>) -> Self {
        self.emails = Some(emails);
        self
    }
}

/// Enrollment API errors.
#[derive(Debug, Error)]
pub enum ApiEnrollmentsError {
    /// Domain-level failure from an enrollment service.
    #[error(transparent)]
    Enrollment(#[from] EnrollmentError),

    /// Platform-wide failure (tenancy scope, privilege, lookup).
    #[error(transparent)]
    Core(#[from] KohortError),

    /// Missing or malformed caller context.
    #[error("Unauthorized")]
    Unauthorized,
}

impl ApiEnrollmentsError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiEnrollmentsError::Enrollment(err) => match err {
                EnrollmentError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
                EnrollmentError::CrossOrgConflict { .. } => StatusCode::CONFLICT,
                EnrollmentError::BatchNotFound(_) => StatusCode::NOT_FOUND,
                EnrollmentError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
                EnrollmentError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiEnrollmentsError::Core(err) => match err {
                KohortError::PermissionDenied { .. } | KohortError::OrgMismatch { .. } => {
                    StatusCode::FORBIDDEN
                }
                KohortError::NotFound { .. } => StatusCode::NOT_FOUND,
                KohortError::Validation { .. } => StatusCode::BAD_REQUEST,
            },
            ApiEnrollmentsError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    /// Convert to `ProblemDetails`.
    #[must_use]
    pub fn to_problem_details(&self) -> ProblemDetails {
        match self {
            ApiEnrollmentsError::Enrollment(err) => match err {
                EnrollmentError::ValidationFailed { reasons } => ProblemDetails::new(
                    "validation-failed",
                    "Enrollment Rows Rejected",
                    StatusCode::BAD_REQUEST,
                )
                .with_detail("One or more rows failed validation; no row was processed.")
                .with_rows(reasons.clone()),

                EnrollmentError::CrossOrgConflict { emails } => ProblemDetails::new(
                    "cross-org-conflict",
                    "Cross-Organization Conflict",
                    StatusCode::CONFLICT,
                )
                .with_detail(
                    "One or more emails already belong to a different organization; \
                     nothing was committed.",
                )
                .with_emails(emails.clone()),

                EnrollmentError::BatchNotFound(id) => ProblemDetails::new(
                    "batch-not-found",
                    "Batch Not Found",
                    StatusCode::NOT_FOUND,
                )
                .with_detail(format!("Batch {id} was not found in this organization.")),

                EnrollmentError::PermissionDenied { required } => ProblemDetails::new(
                    "permission-denied",
                    "Permission Denied",
                    StatusCode::FORBIDDEN,
                )
                .with_detail(format!("This operation requires {required} privilege.")),

                EnrollmentError::Database(e) => {
                    tracing::error!(error = %e, "Database error in enrollment API");
                    ProblemDetails::new(
                        "persistence-error",
                        "Persistence Error",
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                    .with_detail("A storage error occurred; assume nothing was committed.")
                }
            },

            ApiEnrollmentsError::Core(err) => {
                let slug = match err {
                    KohortError::PermissionDenied { .. } => "permission-denied",
                    KohortError::OrgMismatch { .. } => "org-scope",
                    KohortError::NotFound { .. } => "not-found",
                    KohortError::Validation { .. } => "invalid-request",
                };
                ProblemDetails::new(slug, "Request Rejected", self.status_code())
                    .with_detail(err.to_string())
            }

            ApiEnrollmentsError::Unauthorized => {
                ProblemDetails::new("unauthorized", "Unauthorized", StatusCode::UNAUTHORIZED)
                    .with_detail("Authentication required.")
            }
        }
    }
}

impl IntoResponse for ApiEnrollmentsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let problem = self.to_problem_details();

        let mut response = (status, Json(problem)).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failure_embeds_rows() {
        let err: ApiEnrollmentsError = EnrollmentError::ValidationFailed {
            reasons: vec![RowFailure {
                index: 1,
                email: "bad".to_string(),
                reason: "email 'bad' is missing '@'".to_string(),
            }],
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let problem = err.to_problem_details();
        let rows = problem.rows.expect("rows should be attached");
        assert_eq!(rows[0].index, 1);
    }

    #[test]
    fn cross_org_conflict_maps_to_409_with_emails() {
        let err: ApiEnrollmentsError = EnrollmentError::CrossOrgConflict {
            emails: vec!["taken@other.org".to_string()],
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        let problem = err.to_problem_details();
        assert_eq!(problem.emails.unwrap(), vec!["taken@other.org".to_string()]);
    }
}
