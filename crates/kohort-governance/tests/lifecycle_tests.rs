//! Integration tests for the batch lifecycle service.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test -p kohort-governance --features integration`

#![cfg(feature = "integration")]

mod common;

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use common::TestContext;
use kohort_core::{BatchId, TierGate};
use kohort_db::models::{BatchStatus, Program};
use kohort_governance::{
    BatchConfigError, BatchConfigInput, BatchLifecycleService, CreateBatchInput, GovernanceError,
    TrainingScheduleInput, UpdateBatchInput, Weekday,
};

fn service(ctx: &TestContext) -> BatchLifecycleService {
    BatchLifecycleService::new(ctx.pool.inner().clone(), Arc::new(TierGate))
}

fn training_only_config() -> BatchConfigInput {
    BatchConfigInput {
        training_enabled: true,
        training: Some(TrainingScheduleInput {
            days: vec![Weekday::Mon],
            start_time: NaiveTime::from_hms_opt(10, 0, 0),
            end_time: NaiveTime::from_hms_opt(12, 0, 0),
        }),
        ..Default::default()
    }
}

fn create_input(org_id: kohort_core::OrgId, name: &str) -> CreateBatchInput {
    CreateBatchInput {
        org_id,
        name: name.to_string(),
        starts_on: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        ends_on: NaiveDate::from_ymd_opt(2026, 12, 18).unwrap(),
        config: training_only_config(),
    }
}

#[tokio::test]
async fn create_batch_starts_planned_with_mirrored_program() {
    let ctx = TestContext::new().await;
    let org = ctx.create_org("lifecycle-create").await;
    let svc = service(&ctx);
    let caller = ctx.platform_caller(org);

    let batch = svc
        .create_batch(&caller, create_input(org, "Rust Cohort 12"))
        .await
        .expect("create should succeed");

    assert_eq!(batch.status, BatchStatus::Planned);
    assert!(batch.training_enabled);
    assert!(batch.training_config.is_some());

    let program = Program::find_by_id_in_org(ctx.pool.inner(), *org.as_uuid(), batch.program_id)
        .await
        .expect("query failed")
        .expect("program should exist");
    assert_eq!(program.title, "Rust Cohort 12");
}

#[tokio::test]
async fn create_batch_rejection_writes_nothing() {
    let ctx = TestContext::new().await;
    let org = ctx.create_org("lifecycle-reject").await;
    let svc = service(&ctx);
    let caller = ctx.platform_caller(org);

    let programs_before = ctx.count_programs(org).await;

    let mut input = create_input(org, "Invalid Batch");
    input.config = BatchConfigInput::default();
    let err = svc.create_batch(&caller, input).await.unwrap_err();
    assert!(matches!(
        err,
        GovernanceError::Config(BatchConfigError::NoFeatureSelected)
    ));

    assert_eq!(
        ctx.count_programs(org).await,
        programs_before,
        "a rejected create must not leave a program behind"
    );
}

#[tokio::test]
async fn create_batch_requires_platform_tier() {
    let ctx = TestContext::new().await;
    let org = ctx.create_org("lifecycle-denied").await;
    let svc = service(&ctx);
    let caller = ctx.learner_caller(org);

    let err = svc
        .create_batch(&caller, create_input(org, "Denied Batch"))
        .await
        .unwrap_err();
    assert!(matches!(err, GovernanceError::PermissionDenied { .. }));
    assert_eq!(ctx.count_programs(org).await, 0, "denial must have no effect");
}

#[tokio::test]
async fn rename_only_update_renames_the_program() {
    let ctx = TestContext::new().await;
    let org = ctx.create_org("lifecycle-rename").await;
    let svc = service(&ctx);
    let caller = ctx.platform_caller(org);

    let batch = svc
        .create_batch(&caller, create_input(org, "Old Name"))
        .await
        .expect("create should succeed");

    let updated = svc
        .update_batch(
            &caller,
            org,
            BatchId::from_uuid(batch.id),
            UpdateBatchInput {
                name: "New Name".to_string(),
                starts_on: batch.starts_on,
                ends_on: batch.ends_on,
                status: batch.status,
                owner_id: None,
                config: training_only_config(),
            },
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.name, "New Name");
    let program = Program::find_by_id_in_org(ctx.pool.inner(), *org.as_uuid(), batch.program_id)
        .await
        .expect("query failed")
        .expect("program should exist");
    assert_eq!(program.title, "New Name", "program title must follow the batch name");
}

#[tokio::test]
async fn rejected_update_leaves_the_batch_unchanged() {
    let ctx = TestContext::new().await;
    let org = ctx.create_org("lifecycle-unchanged").await;
    let svc = service(&ctx);
    let caller = ctx.platform_caller(org);

    let batch = svc
        .create_batch(&caller, create_input(org, "Stable Batch"))
        .await
        .expect("create should succeed");

    let err = svc
        .update_batch(
            &caller,
            org,
            BatchId::from_uuid(batch.id),
            UpdateBatchInput {
                name: "Should Not Stick".to_string(),
                starts_on: batch.starts_on,
                ends_on: batch.ends_on,
                status: batch.status,
                owner_id: None,
                config: BatchConfigInput {
                    lab_enabled: true,
                    assessment_enabled: true,
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GovernanceError::Config(BatchConfigError::LabsAndAssessmentsRequireTraining)
    ));

    let reread = svc
        .get_batch(&caller, org, BatchId::from_uuid(batch.id))
        .await
        .expect("get should succeed");
    assert_eq!(reread.name, "Stable Batch");
    assert!(!reread.lab_enabled);
}

#[tokio::test]
async fn owner_assignment_requires_same_org_user() {
    let ctx = TestContext::new().await;
    let org = ctx.create_org("lifecycle-owner").await;
    let other_org = ctx.create_org("lifecycle-owner-other").await;
    let svc = service(&ctx);
    let caller = ctx.platform_caller(org);

    let batch = svc
        .create_batch(&caller, create_input(org, "Owned Batch"))
        .await
        .expect("create should succeed");

    let instructor = ctx.create_user(org, "lead", "instructor").await;
    let outsider = ctx.create_user(other_org, "outsider", "instructor").await;

    let base_update = |owner| UpdateBatchInput {
        name: "Owned Batch".to_string(),
        starts_on: batch.starts_on,
        ends_on: batch.ends_on,
        status: batch.status,
        owner_id: owner,
        config: training_only_config(),
    };

    let updated = svc
        .update_batch(&caller, org, BatchId::from_uuid(batch.id), base_update(Some(instructor)))
        .await
        .expect("same-org owner should be accepted");
    assert_eq!(updated.owner_id, Some(*instructor.as_uuid()));

    let err = svc
        .update_batch(&caller, org, BatchId::from_uuid(batch.id), base_update(Some(outsider)))
        .await
        .unwrap_err();
    assert!(matches!(err, GovernanceError::OwnerNotFound(_)));
}
