//! Error types for the batch API.
//!
//! Uses RFC 7807 Problem Details for HTTP APIs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kohort_core::KohortError;
use kohort_governance::GovernanceError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base URL for error type URIs.
const ERROR_BASE_URL: &str = "https://kohort.io/errors/batches";

/// RFC 7807 Problem Details structure.
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
        }
    }

    /// Add detail message.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Batch API errors.
#[derive(Debug, Error)]
pub enum ApiBatchesError {
    /// Domain-level failure from the lifecycle service.
    #[error(transparent)]
    Governance(#[from] GovernanceError),

    /// Platform-wide failure (tenancy scope, privilege, lookup).
    #[error(transparent)]
    Core(#[from] KohortError),

    /// Missing or malformed caller context.
    #[error("Unauthorized")]
    Unauthorized,

    /// Request shape failed validation before reaching the domain rules.
    #[error("Invalid request: {0}")]
    Validation(String),
}

impl ApiBatchesError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiBatchesError::Governance(err) => match err {
                GovernanceError::Config(_) => StatusCode::BAD_REQUEST,
                GovernanceError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
                GovernanceError::OrganizationNotFound(_)
                | GovernanceError::BatchNotFound(_)
                | GovernanceError::OwnerNotFound(_) => StatusCode::NOT_FOUND,
                GovernanceError::Serialization(_) | GovernanceError::Database(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiBatchesError::Core(err) => match err {
                KohortError::PermissionDenied { .. } | KohortError::OrgMismatch { .. } => {
                    StatusCode::FORBIDDEN
                }
                KohortError::NotFound { .. } => StatusCode::NOT_FOUND,
                KohortError::Validation { .. } => StatusCode::BAD_REQUEST,
            },
            ApiBatchesError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiBatchesError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Convert to `ProblemDetails`.
    #[must_use]
    pub fn to_problem_details(&self) -> ProblemDetails {
        match self {
            ApiBatchesError::Governance(err) => match err {
                GovernanceError::Config(config_err) => ProblemDetails::new(
                    "config-rejected",
                    "Batch Configuration Rejected",
                    StatusCode::BAD_REQUEST,
                )
                .with_detail(config_err.to_string()),

                GovernanceError::PermissionDenied { required } => ProblemDetails::new(
                    "permission-denied",
                    "Permission Denied",
                    StatusCode::FORBIDDEN,
                )
                .with_detail(format!("This operation requires {required} privilege.")),

                GovernanceError::OrganizationNotFound(id) => ProblemDetails::new(
                    "organization-not-found",
                    "Organization Not Found",
                    StatusCode::NOT_FOUND,
                )
                .with_detail(format!("Organization {id} was not found.")),

                GovernanceError::BatchNotFound(id) => ProblemDetails::new(
                    "batch-not-found",
                    "Batch Not Found",
                    StatusCode::NOT_FOUND,
                )
                .with_detail(format!("Batch {id} was not found in this organization.")),

                GovernanceError::OwnerNotFound(id) => ProblemDetails::new(
                    "owner-not-found",
                    "Owner Not Found",
                    StatusCode::NOT_FOUND,
                )
                .with_detail(format!("User {id} is not a member of this organization.")),

                GovernanceError::Serialization(e) => {
                    tracing::error!(error = %e, "Config serialization error");
                    ProblemDetails::new(
                        "internal-error",
                        "Internal Server Error",
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                    .with_detail("An internal error occurred. Please try again later.")
                }

                GovernanceError::Database(e) => {
                    tracing::error!(error = %e, "Database error in batch API");
                    ProblemDetails::new(
                        "persistence-error",
                        "Persistence Error",
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                    .with_detail("A storage error occurred; no partial changes were kept.")
                }
            },

            ApiBatchesError::Core(err) => {
                let slug = match err {
                    KohortError::PermissionDenied { .. } => "permission-denied",
                    KohortError::OrgMismatch { .. } => "org-scope",
                    KohortError::NotFound { .. } => "not-found",
                    KohortError::Validation { .. } => "invalid-request",
                };
                ProblemDetails::new(slug, "Request Rejected", self.status_code())
                    .with_detail(err.to_string())
            }

            ApiBatchesError::Unauthorized => {
                ProblemDetails::new("unauthorized", "Unauthorized", StatusCode::UNAUTHORIZED)
                    .with_detail("Authentication required.")
            }

            ApiBatchesError::Validation(msg) => {
                ProblemDetails::new("invalid-request", "Invalid Request", StatusCode::BAD_REQUEST)
                    .with_detail(msg.clone())
            }
        }
    }
}

impl IntoResponse for ApiBatchesError {
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
    use kohort_governance::BatchConfigError;

    #[test]
    fn config_rejection_maps_to_bad_request() {
        let err: ApiBatchesError =
            GovernanceError::from(BatchConfigError::NoFeatureSelected).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let problem = err.to_problem_details();
        assert!(problem.error_type.ends_with("config-rejected"));
        assert!(problem.detail.unwrap().contains("At least one"));
    }

    #[test]
    fn not_found_maps_to_404() {
        let err: ApiBatchesError = GovernanceError::BatchNotFound(uuid::Uuid::new_v4()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn org_mismatch_maps_to_forbidden() {
        let err: ApiBatchesError = KohortError::OrgMismatch {
            expected: kohort_core::OrgId::new(),
            actual: kohort_core::OrgId::new(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert!(err.to_problem_details().error_type.ends_with("org-scope"));
    }
}
