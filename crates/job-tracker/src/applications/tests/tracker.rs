use std::sync::Arc;

use super::common::*;
use crate::applications::domain::{ApplicationId, ApplicationStatus};
use crate::applications::form::{DraftEdit, FormError, FormState};
use crate::applications::gateway::RemoteOperation;
use crate::applications::memory::InMemoryGateway;
use crate::applications::stats::DerivedStats;
use crate::applications::tracker::{ApplicationTracker, MutationOutcome, TrackerError};
use crate::applications::validation::ValidationError;

#[tokio::test]
async fn empty_store_has_zero_stats() {
    let (_gateway, _confirm, tracker) = tracker();
    tracker.refresh().await.expect("refresh succeeds");
    assert_eq!(tracker.stats(), DerivedStats::default());
}

#[tokio::test]
async fn two_inserts_produce_expected_stats() {
    let (_gateway, _confirm, tracker) = tracker();
    add(&tracker, "Pied Piper", "80", ApplicationStatus::Applied)
        .await
        .expect("first insert");
    add(&tracker, "Hooli", "60", ApplicationStatus::Offer)
        .await
        .expect("second insert");

    let stats = tracker.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.interviews, 1);
    assert_eq!(stats.response_rate, 50);
    assert_eq!(stats.avg_match, 70);
    assert_eq!(tracker.records()[0].company, "Hooli");
}

#[tokio::test]
async fn submit_round_trips_fields_and_closes_form() {
    let (_gateway, _confirm, tracker) = tracker();
    tracker.open_form(today());
    for edit in edits("Initech", "77", ApplicationStatus::Interviewing) {
        tracker.edit_draft(edit).expect("form open");
    }
    tracker
        .edit_draft(DraftEdit::Followup("2025-09-22".to_string()))
        .expect("form open");
    tracker
        .edit_draft(DraftEdit::Salary(String::new()))
        .expect("form open");
    let expected = crate::applications::validation::validate_draft(
        tracker.form_state().draft().expect("draft present"),
    )
    .expect("valid draft");

    tracker.submit().await.expect("submit succeeds");

    assert_eq!(tracker.form_state(), FormState::Closed);
    let records = tracker.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].payload(), expected);
    assert_eq!(records[0].salary, None);
}

#[tokio::test]
async fn match_boundaries_are_checked_before_any_remote_call() {
    let (gateway, _confirm, tracker) = tracker();

    for rejected in ["-1", "101", "abc"] {
        let result = add(&tracker, "Boundary", rejected, ApplicationStatus::Applied).await;
        assert!(
            matches!(result, Err(TrackerError::Validation(_))),
            "{rejected} should be rejected, got {result:?}"
        );
        assert_eq!(gateway.total_calls(), 0);
        assert_eq!(tracker.form_state().label(), "open");
        tracker.close_form();
    }

    for accepted in ["0", "100"] {
        add(&tracker, "Boundary", accepted, ApplicationStatus::Applied)
            .await
            .expect("boundary value accepted");
    }
    assert_eq!(gateway.calls(RemoteOperation::Insert), 2);
    assert_eq!(tracker.records().len(), 2);
}

#[tokio::test]
async fn failed_insert_keeps_draft_open() {
    let (gateway, _confirm, tracker) = tracker();
    gateway.fail_next(RemoteOperation::Insert, "row level security violation");

    let result = add(&tracker, "Vandelay", "55", ApplicationStatus::Applied).await;
    match result {
        Err(TrackerError::Remote(err)) => assert_eq!(err.operation, RemoteOperation::Insert),
        other => panic!("expected remote error, got {other:?}"),
    }

    let state = tracker.form_state();
    assert_eq!(state.label(), "open");
    assert_eq!(state.draft().expect("draft kept").company, "Vandelay");
    assert!(tracker.records().is_empty());
    assert!(!tracker.is_busy());

    tracker.submit().await.expect("retry succeeds");
    assert_eq!(tracker.records().len(), 1);
}

#[tokio::test]
async fn failed_refresh_after_insert_keeps_draft_and_old_list() {
    let (gateway, _confirm, tracker) = tracker();
    gateway.fail_next(RemoteOperation::List, "timeout");

    let result = add(&tracker, "Kramerica", "40", ApplicationStatus::Applied).await;
    assert!(matches!(result, Err(TrackerError::Remote(_))));
    assert_eq!(tracker.form_state().label(), "open");
    assert!(tracker.records().is_empty());
    assert_eq!(gateway.len(), 1);
}

#[tokio::test]
async fn submit_without_open_form_is_rejected() {
    let (gateway, _confirm, tracker) = tracker();
    assert!(matches!(
        tracker.submit().await,
        Err(TrackerError::Form(FormError::NotOpen))
    ));
    assert_eq!(gateway.total_calls(), 0);
}

#[tokio::test]
async fn deleting_unknown_id_succeeds_and_leaves_list() {
    let (_gateway, confirm, tracker) = tracker();
    add(&tracker, "Stays", "90", ApplicationStatus::Applied)
        .await
        .expect("insert");

    let outcome = tracker
        .delete(&ApplicationId::from("does-not-exist"))
        .await
        .expect("delete succeeds");
    assert_eq!(outcome, MutationOutcome::Applied);
    assert_eq!(tracker.records().len(), 1);
    assert_eq!(confirm.prompts().len(), 1);
}

#[tokio::test]
async fn delete_removes_exactly_one_record() {
    let (_gateway, _confirm, tracker) = tracker();
    add(&tracker, "Keep", "10", ApplicationStatus::Applied)
        .await
        .expect("insert");
    add(&tracker, "Drop", "20", ApplicationStatus::Rejected)
        .await
        .expect("insert");

    let target = tracker.records()[0].id.clone();
    tracker.delete(&target).await.expect("delete succeeds");

    let records = tracker.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].company, "Keep");
}

#[tokio::test]
async fn declined_confirmation_makes_no_remote_call() {
    let gateway = Arc::new(InMemoryGateway::new());
    let confirm = Arc::new(ScriptedConfirm::declining());
    let tracker = ApplicationTracker::new(gateway.clone(), confirm.clone());
    add(&tracker, "Safe", "33", ApplicationStatus::Applied)
        .await
        .expect("insert");
    let calls_before = gateway.total_calls();

    let id = tracker.records()[0].id.clone();
    assert_eq!(
        tracker.delete(&id).await.expect("no error"),
        MutationOutcome::Declined
    );
    assert_eq!(
        tracker.clear_all().await.expect("no error"),
        MutationOutcome::Declined
    );

    assert_eq!(gateway.total_calls(), calls_before);
    assert_eq!(tracker.records().len(), 1);
    assert_eq!(confirm.prompts().len(), 2);
}

#[tokio::test]
async fn clear_all_twice_is_idempotent() {
    let (_gateway, _confirm, tracker) = tracker();
    add(&tracker, "One", "10", ApplicationStatus::Applied)
        .await
        .expect("insert");
    add(&tracker, "Two", "20", ApplicationStatus::Withdrawn)
        .await
        .expect("insert");

    tracker.clear_all().await.expect("first clear");
    assert!(tracker.records().is_empty());
    tracker.clear_all().await.expect("second clear");
    assert!(tracker.records().is_empty());
}

#[tokio::test]
async fn failed_clear_leaves_visible_state_unchanged() {
    let (gateway, _confirm, tracker) = tracker();
    add(&tracker, "Survivor", "10", ApplicationStatus::Applied)
        .await
        .expect("insert");
    gateway.fail_next(RemoteOperation::DeleteAll, "permission denied");

    match tracker.clear_all().await {
        Err(TrackerError::Remote(err)) => assert_eq!(err.operation, RemoteOperation::DeleteAll),
        other => panic!("expected remote error, got {other:?}"),
    }
    assert_eq!(tracker.records().len(), 1);
    assert!(!tracker.is_busy());
}

#[tokio::test]
async fn second_mutation_while_one_is_pending_is_busy() {
    let gateway = Arc::new(GatedGateway::default());
    let confirm = Arc::new(ScriptedConfirm::accepting());
    let tracker = ApplicationTracker::new(gateway.clone(), confirm.clone());

    tracker.open_form(today());
    for edit in edits("Slow Co", "50", ApplicationStatus::Applied) {
        tracker.edit_draft(edit).expect("form open");
    }

    let contender = async {
        gateway.entered.notified().await;
        assert!(tracker.is_busy());
        let second = tracker.clear_all().await;
        let third = tracker.delete(&ApplicationId::from("app-000001")).await;
        gateway.release.notify_one();
        (second, third)
    };

    let (first, (second, third)) = tokio::join!(tracker.submit(), contender);

    first.expect("first submit completes");
    assert!(matches!(second, Err(TrackerError::Busy)));
    assert!(matches!(third, Err(TrackerError::Busy)));
    assert!(confirm.prompts().is_empty());
    assert!(!tracker.is_busy());
    assert_eq!(tracker.records().len(), 1);
}

#[tokio::test]
async fn closing_form_mid_save_still_reports_success() {
    let gateway = Arc::new(GatedGateway::default());
    let tracker = ApplicationTracker::new(gateway.clone(), Arc::new(ScriptedConfirm::accepting()));

    tracker.open_form(today());
    for edit in edits("Closed Early Ltd", "65", ApplicationStatus::Applied) {
        tracker.edit_draft(edit).expect("form open");
    }

    let closer = async {
        gateway.entered.notified().await;
        tracker.close_form();
        gateway.release.notify_one();
    };
    let (saved, ()) = tokio::join!(tracker.submit(), closer);

    saved.expect("insert and refresh succeeded");
    assert_eq!(tracker.records().len(), 1);
    assert!(matches!(tracker.form_state(), FormState::Closed));
    assert!(!tracker.is_busy());
}

#[tokio::test]
async fn closing_form_mid_save_still_surfaces_remote_failure() {
    let gateway = Arc::new(GatedGateway::default());
    let tracker = ApplicationTracker::new(gateway.clone(), Arc::new(ScriptedConfirm::accepting()));
    gateway
        .inner
        .fail_next(RemoteOperation::Insert, "network down");

    tracker.open_form(today());
    for edit in edits("Closed Early Ltd", "65", ApplicationStatus::Applied) {
        tracker.edit_draft(edit).expect("form open");
    }

    let closer = async {
        gateway.entered.notified().await;
        tracker.close_form();
        gateway.release.notify_one();
    };
    let (saved, ()) = tokio::join!(tracker.submit(), closer);

    match saved {
        Err(TrackerError::Remote(err)) => assert_eq!(err.operation, RemoteOperation::Insert),
        other => panic!("expected remote error, got {other:?}"),
    }
    assert!(tracker.records().is_empty());
    assert!(matches!(tracker.form_state(), FormState::Closed));
    assert!(!tracker.is_busy());
}

#[tokio::test]
async fn export_follows_list_order() {
    let (_gateway, _confirm, tracker) = tracker();
    assert!(tracker.export_csv(today()).expect("no error").is_none());

    add(&tracker, "Pied Piper", "80", ApplicationStatus::Applied)
        .await
        .expect("insert");
    add(&tracker, "Hooli", "60", ApplicationStatus::Offer)
        .await
        .expect("insert");

    let export = tracker
        .export_csv(today())
        .expect("no error")
        .expect("records to export");
    let lines: Vec<_> = export.as_str().lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("\"2025-09-15\",\"Hooli\""));
    assert!(lines[2].starts_with("\"2025-09-15\",\"Pied Piper\""));
}

#[tokio::test]
async fn validation_error_is_reported_as_such() {
    let (_gateway, _confirm, tracker) = tracker();
    tracker.open_form(today());
    tracker
        .edit_draft(DraftEdit::MatchScore("50".to_string()))
        .expect("form open");

    match tracker.submit().await {
        Err(TrackerError::Validation(ValidationError::MissingField { field })) => {
            assert_eq!(field, "company")
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(!tracker.is_busy());
}
