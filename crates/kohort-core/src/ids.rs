//! Strongly typed identifiers.
//!
//! Newtype wrappers around [`Uuid`] for every entity kind in the platform.
//! The types prevent accidental misuse of different ID kinds at compile
//! time: a `UserId` cannot be handed to a function expecting a `BatchId`.
//!
//! # Example
//!
//! ```
//! use kohort_core::{BatchId, OrgId};
//!
//! fn requires_org(id: OrgId) -> String {
//!     id.to_string()
//! }
//!
//! let org = OrgId::new();
//! let batch = BatchId::new();
//! let _ = requires_org(org);
//! // requires_org(batch); // does not compile
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Error type for ID parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The kind of ID that failed to parse.
    pub id_type: &'static str,
    /// The underlying UUID parse error message.
    pub message: String,
}

impl Display for ParseIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse {}: {}", self.id_type, self.message)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to define a strongly-typed ID type.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random ID using UUID v4.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns a reference to the underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| ParseIdError {
                        id_type: stringify!($name),
                        message: e.to_string(),
                    })
            }
        }
    };
}

define_id!(
    /// Identifier for an organization, the multi-tenancy root.
    ///
    /// Every user, program, batch and enrollment is owned by exactly one
    /// organization; tenant isolation checks compare these.
    OrgId
);

define_id!(
    /// Identifier for a user account.
    ///
    /// A user belongs to exactly one organization, but the account's email
    /// address is unique across the entire platform.
    UserId
);

define_id!(
    /// Identifier for a training batch (cohort).
    BatchId
);

define_id!(
    /// Identifier for a program, the content container created 1:1 with a
    /// batch.
    ProgramId
);

define_id!(
    /// Identifier for an enrollment linking one user to one batch.
    EnrollmentId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(OrgId::new(), OrgId::new());
        assert_ne!(BatchId::new(), BatchId::new());
    }

    #[test]
    fn round_trips_through_uuid() {
        let uuid = Uuid::new_v4();
        let id = UserId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[test]
    fn parses_from_string() {
        let id = BatchId::new();
        let parsed: BatchId = id.to_string().parse().expect("valid uuid string");
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_failure_names_the_type() {
        let err = "not-a-uuid".parse::<OrgId>().unwrap_err();
        assert_eq!(err.id_type, "OrgId");
        assert!(err.to_string().contains("OrgId"));
    }

    #[test]
    fn serializes_transparently() {
        let id = ProgramId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }
}
