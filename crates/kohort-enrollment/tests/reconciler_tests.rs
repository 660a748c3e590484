//! Integration tests for the all-or-nothing enrollment reconciler.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test -p kohort-enrollment --features integration`

#![cfg(feature = "integration")]

mod common;

use std::sync::Arc;

use common::TestContext;
use kohort_core::TierGate;
use kohort_enrollment::{EnrollmentError, EnrollmentReconciler, EnrollmentRow};
use uuid::Uuid;

fn reconciler(ctx: &TestContext) -> EnrollmentReconciler {
    EnrollmentReconciler::new(ctx.pool.inner().clone(), Arc::new(TierGate))
}

fn row(email: &str, name: &str) -> EnrollmentRow {
    EnrollmentRow {
        email: email.to_string(),
        name: name.to_string(),
        role: None,
    }
}

fn unique_email(local: &str) -> String {
    format!("{local}-{}@example.test", &Uuid::new_v4().to_string()[..8])
}

#[tokio::test]
async fn enrolls_new_and_existing_users() {
    let ctx = TestContext::new().await;
    let org = ctx.create_org("rec-mixed").await;
    let batch = ctx.create_batch(org, "Mixed Cohort").await;
    let (_, existing_email) = ctx.create_user(org, "veteran").await;
    let fresh_email = unique_email("fresh");

    let outcome = reconciler(&ctx)
        .reconcile(
            &ctx.admin_caller(org),
            org,
            batch,
            &[
                row(&existing_email, "Veteran Renamed"),
                row(&fresh_email, "Fresh Face"),
            ],
        )
        .await
        .expect("reconcile should succeed");

    assert_eq!(outcome.enrolled_count, 2);
    assert_eq!(outcome.newly_enrolled, 2);
    assert_eq!(ctx.count_enrollments(batch).await, 2);
    assert!(ctx.user_exists(&fresh_email).await);
}

#[tokio::test]
async fn second_identical_call_is_idempotent() {
    let ctx = TestContext::new().await;
    let org = ctx.create_org("rec-idem").await;
    let batch = ctx.create_batch(org, "Idempotent Cohort").await;
    let rows = vec![
        row(&unique_email("idem-a"), "A"),
        row(&unique_email("idem-b"), "B"),
    ];
    let svc = reconciler(&ctx);
    let caller = ctx.admin_caller(org);

    let first = svc.reconcile(&caller, org, batch, &rows).await.unwrap();
    assert_eq!(first.newly_enrolled, 2);

    let second = svc.reconcile(&caller, org, batch, &rows).await.unwrap();
    assert_eq!(second.enrolled_count, 2, "rows are still processed");
    assert_eq!(second.newly_enrolled, 0, "no enrollment growth on the second call");
    assert_eq!(ctx.count_enrollments(batch).await, 2);
}

#[tokio::test]
async fn bad_email_fails_the_whole_call_before_any_write() {
    let ctx = TestContext::new().await;
    let org = ctx.create_org("rec-validation").await;
    let batch = ctx.create_batch(org, "Validation Cohort").await;
    let good_email = unique_email("good");

    let err = reconciler(&ctx)
        .reconcile(
            &ctx.admin_caller(org),
            org,
            batch,
            &[row(&good_email, "A"), row("bad-email", "B")],
        )
        .await
        .unwrap_err();

    match err {
        EnrollmentError::ValidationFailed { reasons } => {
            assert_eq!(reasons.len(), 1);
            assert_eq!(reasons[0].index, 1);
            assert_eq!(reasons[0].email, "bad-email");
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }

    assert_eq!(ctx.count_enrollments(batch).await, 0);
    assert!(!ctx.user_exists(&good_email).await, "the valid row must not be committed either");
}

#[tokio::test]
async fn cross_org_email_rejects_the_entire_call() {
    let ctx = TestContext::new().await;
    let org = ctx.create_org("rec-cross").await;
    let other_org = ctx.create_org("rec-cross-other").await;
    let batch = ctx.create_batch(org, "Cross Cohort").await;
    let (_, foreign_email) = ctx.create_user(other_org, "foreigner").await;
    let innocent_email = unique_email("innocent");

    let users_before = ctx.count_users(org).await;

    let err = reconciler(&ctx)
        .reconcile(
            &ctx.admin_caller(org),
            org,
            batch,
            &[row(&innocent_email, "Innocent"), row(&foreign_email, "Foreigner")],
        )
        .await
        .unwrap_err();

    match err {
        EnrollmentError::CrossOrgConflict { emails } => {
            assert_eq!(emails, vec![foreign_email]);
        }
        other => panic!("expected CrossOrgConflict, got {other:?}"),
    }

    // Nothing from the call was persisted, including the valid row.
    assert_eq!(ctx.count_enrollments(batch).await, 0);
    assert_eq!(ctx.count_users(org).await, users_before);
    assert!(!ctx.user_exists(&innocent_email).await);
}

#[tokio::test]
async fn missing_batch_is_rejected() {
    let ctx = TestContext::new().await;
    let org = ctx.create_org("rec-nobatch").await;
    let bogus_batch = kohort_core::BatchId::new();

    let err = reconciler(&ctx)
        .reconcile(
            &ctx.admin_caller(org),
            org,
            bogus_batch,
            &[row(&unique_email("lost"), "Lost")],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EnrollmentError::BatchNotFound(_)));
}

#[tokio::test]
async fn batch_of_another_org_is_not_a_valid_target() {
    let ctx = TestContext::new().await;
    let org = ctx.create_org("rec-scope").await;
    let other_org = ctx.create_org("rec-scope-other").await;
    let foreign_batch = ctx.create_batch(other_org, "Foreign Batch").await;

    let err = reconciler(&ctx)
        .reconcile(
            &ctx.admin_caller(org),
            org,
            foreign_batch,
            &[row(&unique_email("scoped"), "Scoped")],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EnrollmentError::BatchNotFound(_)));
}

#[tokio::test]
async fn learner_tier_is_denied() {
    let ctx = TestContext::new().await;
    let org = ctx.create_org("rec-denied").await;
    let batch = ctx.create_batch(org, "Denied Cohort").await;

    let err = reconciler(&ctx)
        .reconcile(
            &ctx.learner_caller(org),
            org,
            batch,
            &[row(&unique_email("nope"), "Nope")],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EnrollmentError::PermissionDenied { .. }));
    assert_eq!(ctx.count_enrollments(batch).await, 0);
}

#[tokio::test]
async fn empty_row_set_succeeds_with_zero_counts() {
    let ctx = TestContext::new().await;
    let org = ctx.create_org("rec-empty").await;
    let batch = ctx.create_batch(org, "Empty Cohort").await;

    let outcome = reconciler(&ctx)
        .reconcile(&ctx.admin_caller(org), org, batch, &[])
        .await
        .expect("empty reconcile should succeed");
    assert_eq!(outcome.enrolled_count, 0);
    assert_eq!(outcome.newly_enrolled, 0);
}

#[tokio::test]
async fn row_role_is_applied_to_new_users_only() {
    let ctx = TestContext::new().await;
    let org = ctx.create_org("rec-role").await;
    let batch = ctx.create_batch(org, "Role Cohort").await;
    let email = unique_email("instructor");

    let mut instructor_row = row(&email, "Lead");
    instructor_row.role = Some(kohort_db::UserRole::Instructor);

    reconciler(&ctx)
        .reconcile(&ctx.admin_caller(org), org, batch, &[instructor_row])
        .await
        .expect("reconcile should succeed");

    let role: String = sqlx::query_scalar("SELECT role::text FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(ctx.pool.inner())
        .await
        .expect("user should exist");
    assert_eq!(role, "instructor");
}
