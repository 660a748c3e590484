//! Row and report types for the enrollment services.

use kohort_db::models::UserRole;
use serde::{Deserialize, Serialize};

/// One submitted enrollment row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EnrollmentRow {
    /// Email identifying the account, platform-wide.
    pub email: String,

    /// Display name; refreshed on existing accounts.
    pub name: String,

    /// Role for a newly created account. Defaults to learner. Ignored for
    /// existing accounts.
    #[serde(default)]
    pub role: Option<UserRole>,
}

impl EnrollmentRow {
    /// The minimal syntactic email check both enrollment paths apply:
    /// non-empty and containing `@`. Returns the problem, if any.
    #[must_use]
    pub fn email_problem(&self) -> Option<String> {
        if self.email.trim().is_empty() {
            Some("email is empty".to_string())
        } else if !self.email.contains('@') {
            Some(format!("email '{}' is missing '@'", self.email))
        } else {
            None
        }
    }
}

/// A row that could not be processed, with enough detail to resubmit
/// exactly the failed subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RowFailure {
    /// Zero-based index of the row in the submitted list.
    pub index: usize,

    /// The row's email, verbatim.
    pub email: String,

    /// Human-readable reason.
    pub reason: String,
}

/// Validate all rows locally, with no I/O.
///
/// Returns one failure per offending row; an empty result means every row
/// passed.
#[must_use]
pub fn validate_rows(rows: &[EnrollmentRow]) -> Vec<RowFailure> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| {
            row.email_problem().map(|reason| RowFailure {
                index,
                email: row.email.clone(),
                reason,
            })
        })
        .collect()
}

/// Result of a successful all-or-nothing reconciliation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReconcileOutcome {
    /// Rows processed (all of them, by definition of the atomic path).
    pub enrolled_count: usize,

    /// Rows that produced a new enrollment; the remainder were already
    /// members and were left untouched.
    pub newly_enrolled: usize,
}

/// Aggregate counters from a best-effort bulk run.
///
/// `success + failed` equals the number of submitted rows;
/// `new_users + existing` equals `success`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BulkEnrollmentReport {
    /// Rows whose enrollment was ensured.
    pub success: usize,

    /// Rows skipped after an error; later rows were still processed.
    pub failed: usize,

    /// Successful rows that created a new user account.
    pub new_users: usize,

    /// Successful rows that matched an existing account in the target
    /// organization.
    pub existing: usize,

    /// Per-row detail for every failed row.
    pub errors: Vec<RowFailure>,
}
