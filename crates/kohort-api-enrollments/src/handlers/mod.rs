//! Enrollment API handlers.

pub mod bulk;
pub mod list;
pub mod reconcile;

use kohort_core::{CallerContext, KohortError, OrgId, PrivilegeTier};

/// Verify the caller may act within `org_id`.
///
/// Platform-tier callers operate across organizations; everyone else is
/// confined to their own.
pub(crate) fn ensure_org_scope(caller: &CallerContext, org_id: OrgId) -> Result<(), KohortError> {
    if caller.tier >= PrivilegeTier::Platform || caller.org_id == org_id {
        Ok(())
    } else {
        Err(KohortError::OrgMismatch {
            expected: org_id,
            actual: caller.org_id,
        })
    }
}
