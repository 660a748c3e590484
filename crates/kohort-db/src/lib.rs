//! PostgreSQL persistence layer for kohort.
//!
//! Owns the connection pool wrapper, embedded migrations and the entity
//! models (organizations, users, programs, batches, enrollments). All SQL
//! lives on the model types; service crates orchestrate but never write raw
//! queries of their own.
//!
//! Two schema-level constraints carry the platform's consistency story and
//! are relied on by the enrollment services:
//!
//! - `users.email` is unique **globally**, not per organization;
//! - `enrollments (user_id, batch_id)` is unique, making enrollment idempotent.

pub mod error;
pub mod migrations;
pub mod models;
pub mod pool;

pub use error::DbError;
pub use migrations::run_migrations;
pub use models::{
    Batch, BatchStatus, CreateBatch, Enrollment, EnrollmentStatus, NewEnrollment, Organization,
    Program, UpdateBatch, User, UserRole,
};
pub use pool::DbPool;
