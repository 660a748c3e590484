//! Database entity models for kohort-db.
//!
//! Each model owns the SQL for its table and exposes typed async query
//! methods. Transaction-scoped variants (`*_in_tx`) take a
//! `sqlx::Transaction` so the enrollment and lifecycle services can compose
//! multi-row writes atomically.

pub mod batch;
pub mod enrollment;
pub mod organization;
pub mod program;
pub mod user;

pub use batch::{Batch, BatchStatus, CreateBatch, UpdateBatch};
pub use enrollment::{Enrollment, EnrollmentStatus, NewEnrollment};
pub use organization::Organization;
pub use program::Program;
pub use user::{User, UserRole};
