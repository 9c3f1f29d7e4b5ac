//! End-to-end report wizard scenarios against simulated collaborators.

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Notify;
use wizard_engine::simulated::{
    HostCommand, RecordingHost, SimulatedSubmissionService, StaticIdentity,
};
use wizard_engine::*;
use wizard_types::*;

struct Harness {
    launcher: WizardLauncher,
    host: Arc<RecordingHost>,
    service: Arc<SimulatedSubmissionService>,
    entry: EntryAffordance,
}

fn harness_with(service: SimulatedSubmissionService, config: WizardConfig) -> Harness {
    let host = Arc::new(RecordingHost::new());
    let service = Arc::new(service);
    let launcher = WizardLauncher::new(
        config,
        host.clone(),
        service.clone(),
        Arc::new(StaticIdentity::signed_in("reporter-1")),
    )
    .unwrap();
    Harness {
        launcher,
        host,
        service,
        entry: EntryAffordance::new(),
    }
}

fn harness() -> Harness {
    harness_with(SimulatedSubmissionService::new(), WizardConfig::default())
}

fn request() -> ReportRequest {
    ReportRequest {
        content_id: ContentId::new("post-77"),
        author_id: UserId::new("author-3"),
        source: ReportSource::Feed,
    }
}

/// Walk Target=Post, Topic=Spam and land on the Context step
fn walk_to_context(wizard: &mut WizardController) {
    let store = wizard.store();
    store.set_target(Target::Post).unwrap();
    assert_eq!(wizard.advance().unwrap(), StepId::ReportTopic);
    store.set_topic(Topic::Spam).unwrap();
    assert_eq!(wizard.advance().unwrap(), StepId::ReportContext);
}

#[tokio::test]
async fn report_without_context_is_submitted_once() {
    let h = harness();
    let mut wizard = h.launcher.launch_report(&h.entry, request()).unwrap();
    walk_to_context(&mut wizard);

    let outcome = wizard.commit().await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(wizard.state(), WizardState::Committed);

    let reports = h.service.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].target, Target::Post);
    assert_eq!(reports[0].topic, Topic::Spam);
    assert_eq!(reports[0].context, None);
    assert_eq!(reports[0].reporter_id, UserId::new("reporter-1"));
    assert_eq!(reports[0].source, ReportSource::Feed);

    let json = serde_json::to_value(&reports[0]).unwrap();
    assert!(json["context"].is_null());

    let commands = h.host.commands();
    assert_eq!(
        &commands[commands.len() - 2..],
        &[HostCommand::DismissAll, HostCommand::Success]
    );
    assert_eq!(h.host.depth(), 0);
    assert!(h.entry.is_enabled());
    assert!(!wizard.store().has_draft());
}

#[tokio::test]
async fn context_is_included_when_confirmed() {
    let h = harness();
    let mut wizard = h.launcher.launch_report(&h.entry, request()).unwrap();
    walk_to_context(&mut wizard);

    let view = wizard.view().unwrap();
    assert_eq!(view.step(), StepId::ReportContext);
    let store = view.store();
    assert!(store.context_buffer().unwrap().is_showing_placeholder());
    assert!(store.focus_context().unwrap());
    assert!(!store.can_confirm_context());
    store.edit_context("Same link posted in 40 groups").unwrap();
    assert!(store.can_confirm_context());
    store.confirm_context().unwrap();
    assert!(store.can_remove_context());

    wizard.commit().await.unwrap();
    assert_eq!(
        h.service.reports()[0].context.as_deref(),
        Some("Same link posted in 40 groups")
    );
}

#[tokio::test]
async fn failed_commit_keeps_draft_and_allows_retry() {
    let service = SimulatedSubmissionService::new();
    service.fail_next(SubmissionError::new(
        "Couldn't send report",
        "Check your connection and try again.",
    ));
    let h = harness_with(service, WizardConfig::default());
    let mut wizard = h.launcher.launch_report(&h.entry, request()).unwrap();
    walk_to_context(&mut wizard);

    let outcome = wizard.commit().await.unwrap();
    let failure = outcome.failure().unwrap();
    assert_eq!(failure.title, "Couldn't send report");
    assert_eq!(wizard.state(), WizardState::Active);
    assert_eq!(wizard.current_step(), Some(StepId::ReportContext));
    assert!(wizard.can_commit());
    assert_eq!(
        h.host.last(),
        Some(HostCommand::Error {
            title: "Couldn't send report".into(),
            message: "Check your connection and try again.".into(),
        })
    );

    let draft = wizard.store().snapshot().unwrap();
    assert_eq!(draft.as_report().unwrap().topic(), Some(Topic::Spam));

    // The user may still edit after a failure
    wizard.store().edit_context("extra detail").unwrap();

    let retry = wizard.commit().await.unwrap();
    assert!(retry.is_success());
    assert_eq!(h.service.calls(), 2);
    assert_eq!(wizard.submissions(), 2);
    assert!(matches!(
        wizard.commit().await,
        Err(WizardError::AlreadyCommitted)
    ));
}

#[tokio::test]
async fn rapid_taps_issue_one_submission() {
    let gate = Arc::new(Notify::new());
    let service = Arc::new(SimulatedSubmissionService::new().with_gate(gate.clone()));
    let handler = Arc::new(CommitHandler::new(service.clone(), &CommitConfig::default()));

    let mut draft = ReportDraft::new(
        ContentId::new("c"),
        UserId::new("a"),
        Some(UserId::new("r")),
        ReportSource::Comments,
    )
    .unwrap();
    draft.set_target(Target::Comment);
    draft.set_topic(Topic::Harassment).unwrap();
    let draft: Draft = draft.into();

    let first = tokio::spawn({
        let handler = handler.clone();
        let draft = draft.clone();
        async move { handler.commit(&draft).await }
    });
    while service.calls() == 0 {
        tokio::task::yield_now().await;
    }
    assert!(!handler.is_enabled());

    let taps = join_all((0..10).map(|_| handler.commit(&draft))).await;
    assert!(taps
        .iter()
        .all(|t| matches!(t, Err(WizardError::CommitInFlight))));

    gate.notify_one();
    let outcome = first.await.unwrap().unwrap();
    assert!(outcome.is_success());
    assert_eq!(service.calls(), 1);
    assert_eq!(handler.submissions(), 1);
}

#[tokio::test]
async fn timed_out_commit_can_be_retried() {
    let h = harness_with(
        SimulatedSubmissionService::new().hanging(),
        WizardConfig::with_commit_timeout(20),
    );
    let mut wizard = h.launcher.launch_report(&h.entry, request()).unwrap();
    walk_to_context(&mut wizard);

    let outcome = wizard.commit().await.unwrap();
    assert_eq!(outcome.failure().unwrap().title, "Request timed out");
    assert_eq!(wizard.state(), WizardState::Active);
    assert!(wizard.store().has_draft());
}

#[test]
fn cancel_after_edit_requires_confirmation() {
    let h = harness();
    let mut wizard = h.launcher.launch_report(&h.entry, request()).unwrap();
    wizard.store().set_target(Target::Message).unwrap();

    assert_eq!(wizard.cancel().unwrap(), CancelOutcome::ConfirmationRequired);
    assert!(wizard.store().has_draft());
    assert_ne!(h.host.last(), Some(HostCommand::DismissAll));

    wizard.confirm_abandon().unwrap();
    assert_eq!(wizard.state(), WizardState::Cancelled);
    assert!(!wizard.store().has_draft());
    assert_eq!(h.host.last(), Some(HostCommand::DismissAll));
    assert_eq!(h.service.calls(), 0);
}

#[test]
fn cancel_without_edits_is_immediate() {
    let h = harness();
    let mut wizard = h.launcher.launch_report(&h.entry, request()).unwrap();

    assert_eq!(wizard.cancel().unwrap(), CancelOutcome::Cancelled);
    assert_eq!(wizard.state(), WizardState::Cancelled);
    assert_eq!(h.host.last(), Some(HostCommand::DismissAll));
    assert!(h.entry.is_enabled());
}

#[test]
fn revisiting_target_overwrites() {
    let h = harness();
    let mut wizard = h.launcher.launch_report(&h.entry, request()).unwrap();
    walk_to_context(&mut wizard);
    wizard.retreat().unwrap();
    wizard.retreat().unwrap();

    wizard.store().set_target(Target::Profile).unwrap();
    assert!(wizard.can_advance());
    wizard.advance().unwrap();

    let draft = wizard.store().snapshot().unwrap();
    let report = draft.as_report().unwrap();
    assert_eq!(report.target(), Some(Target::Profile));
    assert_eq!(report.topic(), Some(Topic::Spam));
    assert!(wizard.can_advance());
}

#[test]
fn fields_are_written_only_from_their_step() {
    let h = harness();
    let mut wizard = h.launcher.launch_report(&h.entry, request()).unwrap();
    let store = wizard.store();

    assert!(matches!(
        store.confirm_context(),
        Err(WizardError::StepNotPresented(StepId::ReportContext))
    ));
    walk_to_context(&mut wizard);
    assert!(matches!(
        store.set_target(Target::Message),
        Err(WizardError::StepNotPresented(StepId::ReportTarget))
    ));

    let draft = store.snapshot().unwrap();
    assert_eq!(draft.as_report().unwrap().target(), Some(Target::Post));
}

#[tokio::test]
async fn abandoned_commit_can_be_retried() {
    let gate = Arc::new(Notify::new());
    let h = harness_with(
        SimulatedSubmissionService::new().with_gate(gate.clone()),
        WizardConfig::default(),
    );
    let mut wizard = h.launcher.launch_report(&h.entry, request()).unwrap();
    walk_to_context(&mut wizard);

    let dropped =
        tokio::time::timeout(std::time::Duration::from_millis(20), wizard.commit()).await;
    assert!(dropped.is_err());
    assert_eq!(wizard.state(), WizardState::Committing);

    gate.notify_one();
    let outcome = wizard.commit().await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(wizard.state(), WizardState::Committed);
    assert_eq!(h.service.calls(), 2);
}
