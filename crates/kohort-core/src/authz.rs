//! Privilege tiers and the authorization gate.
//!
//! Authentication and session issuance are external to this core: the
//! surrounding system hands every operation an opaque [`CallerContext`]
//! (identity + organization + privilege tier). This module defines that
//! context and the single capability check services call once per
//! operation, instead of scattering role comparisons across call sites.

use crate::ids::{OrgId, UserId};
use serde::{Deserialize, Serialize};

/// Ordered privilege tiers.
///
/// The ordering is total: `Guest < Learner < Instructor < OrgAdmin <
/// Platform`. A caller holding a tier implicitly holds every lower tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegeTier {
    /// Unauthenticated or invited-but-unregistered caller.
    Guest,
    /// Enrolled participant.
    Learner,
    /// Batch lead / trainer within an organization.
    Instructor,
    /// Organization administrator.
    OrgAdmin,
    /// Platform operator; the highest tier.
    Platform,
}

impl PrivilegeTier {
    /// Stable lowercase name, used in error messages and problem documents.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivilegeTier::Guest => "guest",
            PrivilegeTier::Learner => "learner",
            PrivilegeTier::Instructor => "instructor",
            PrivilegeTier::OrgAdmin => "org_admin",
            PrivilegeTier::Platform => "platform",
        }
    }
}

impl std::fmt::Display for PrivilegeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PrivilegeTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guest" => Ok(PrivilegeTier::Guest),
            "learner" => Ok(PrivilegeTier::Learner),
            "instructor" => Ok(PrivilegeTier::Instructor),
            "org_admin" => Ok(PrivilegeTier::OrgAdmin),
            "platform" => Ok(PrivilegeTier::Platform),
            other => Err(format!("unknown privilege tier '{other}'")),
        }
    }
}

/// The authenticated caller of an operation, as supplied by the external
/// identity layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerContext {
    /// The calling user.
    pub user_id: UserId,
    /// The organization the caller is acting within.
    pub org_id: OrgId,
    /// Privilege tier granted to the caller.
    pub tier: PrivilegeTier,
}

impl CallerContext {
    /// Build a caller context.
    #[must_use]
    pub fn new(user_id: UserId, org_id: OrgId, tier: PrivilegeTier) -> Self {
        Self {
            user_id,
            org_id,
            tier,
        }
    }
}

/// Capability check injected into every mutating service.
///
/// Services hold an `Arc<dyn AuthorizationGate>` and consult it exactly once
/// per operation, before any read or write.
pub trait AuthorizationGate: Send + Sync {
    /// Whether `caller` holds at least the `required` tier.
    fn has_privilege(&self, caller: &CallerContext, required: PrivilegeTier) -> bool;
}

/// Default gate: compares the caller's tier against the requirement using
/// the tier ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct TierGate;

impl AuthorizationGate for TierGate {
    fn has_privilege(&self, caller: &CallerContext, required: PrivilegeTier) -> bool {
        caller.tier >= required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(tier: PrivilegeTier) -> CallerContext {
        CallerContext::new(UserId::new(), OrgId::new(), tier)
    }

    #[test]
    fn tier_ordering_is_total() {
        assert!(PrivilegeTier::Guest < PrivilegeTier::Learner);
        assert!(PrivilegeTier::Learner < PrivilegeTier::Instructor);
        assert!(PrivilegeTier::Instructor < PrivilegeTier::OrgAdmin);
        assert!(PrivilegeTier::OrgAdmin < PrivilegeTier::Platform);
    }

    #[test]
    fn gate_grants_equal_and_higher_tiers() {
        let gate = TierGate;
        assert!(gate.has_privilege(&caller(PrivilegeTier::Platform), PrivilegeTier::Platform));
        assert!(gate.has_privilege(&caller(PrivilegeTier::Platform), PrivilegeTier::OrgAdmin));
        assert!(gate.has_privilege(&caller(PrivilegeTier::OrgAdmin), PrivilegeTier::Instructor));
    }

    #[test]
    fn gate_denies_lower_tiers() {
        let gate = TierGate;
        assert!(!gate.has_privilege(&caller(PrivilegeTier::OrgAdmin), PrivilegeTier::Platform));
        assert!(!gate.has_privilege(&caller(PrivilegeTier::Guest), PrivilegeTier::Learner));
    }

    #[test]
    fn gate_is_object_safe() {
        let gate: Box<dyn AuthorizationGate> = Box::new(TierGate);
        assert!(gate.has_privilege(&caller(PrivilegeTier::Learner), PrivilegeTier::Guest));
    }

    #[test]
    fn tier_parses_from_its_display_form() {
        for tier in [
            PrivilegeTier::Guest,
            PrivilegeTier::Learner,
            PrivilegeTier::Instructor,
            PrivilegeTier::OrgAdmin,
            PrivilegeTier::Platform,
        ] {
            let parsed: PrivilegeTier = tier.as_str().parse().unwrap();
            assert_eq!(parsed, tier);
        }
        assert!("root".parse::<PrivilegeTier>().is_err());
    }

    #[test]
    fn tier_serde_uses_snake_case() {
        let json = serde_json::to_string(&PrivilegeTier::OrgAdmin).unwrap();
        assert_eq!(json, "\"org_admin\"");
        let parsed: PrivilegeTier = serde_json::from_str("\"platform\"").unwrap();
        assert_eq!(parsed, PrivilegeTier::Platform);
    }
}
