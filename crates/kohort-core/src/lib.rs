//! Kohort core library.
//!
//! Shared types for the kohort training platform.
//!
//! # Modules
//!
//! - [`ids`] - Strongly typed identifiers (`OrgId`, `UserId`, `BatchId`, ...)
//! - [`authz`] - Privilege tiers and the authorization gate abstraction
//! - [`traits`] - Multi-tenant traits (`OrgScoped`)
//! - [`error`] - Standardized error types (`KohortError`)
//!
//! # Example
//!
//! ```
//! use kohort_core::{OrgId, UserId, KohortError, Result};
//!
//! let org_id = OrgId::new();
//! let user_id = UserId::new();
//!
//! fn example() -> Result<()> {
//!     Err(KohortError::PermissionDenied {
//!         required: "platform".to_string(),
//!     })
//! }
//! ```

pub mod authz;
pub mod error;
pub mod ids;
pub mod traits;

pub use authz::{AuthorizationGate, CallerContext, PrivilegeTier, TierGate};
pub use error::{KohortError, Result};
pub use ids::{BatchId, EnrollmentId, OrgId, ProgramId, UserId};
pub use traits::OrgScoped;
