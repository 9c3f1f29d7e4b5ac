#![deny(unsafe_code)]
//! Wizard demo binary.
//!
//! Walks through, against simulated collaborators:
//! 1. A content report with a failed first submission and a retry
//! 2. Abandoning a touched report
//! 3. Attaching a website link and then a citation to a post
//! 4. Detaching the reference again
//!
//! Set `RUST_LOG=debug` to see the engine's own logging.

use std::sync::Arc;
use wizard_engine::simulated::{
    RecordingHost, SimulatedSubmissionService, StaticIdentity, StaticOpener,
};
use wizard_engine::{
    attachment_channel, choose_viewer, CancelOutcome, EntryAffordance, LinkPurpose,
    ReferenceRequest, ReportRequest, WizardConfig, WizardLauncher,
};
use wizard_types::{
    Attachment, AttachmentSlot, CommitOutcome, ContentId, ReferenceKind, ReportSource,
    SubmissionError, Target, Topic, UserId,
};

// ── Formatting Helpers ──────────────────────────────────────────────────

const BANNER: &str = r#"
 ╔═══════════════════════════════════════════════════════════════╗
 ║               Guided Wizards  --  Demo                       ║
 ║                                                              ║
 ║   Step-gated report and reference flows with                 ║
 ║   single-shot commits and scoped hand-back.                  ║
 ╚═══════════════════════════════════════════════════════════════╝
"#;

fn section(title: &str) {
    let width: usize = 60;
    let pad = width.saturating_sub(title.len() + 4);
    let left = pad / 2;
    let right = pad - left;
    println!();
    println!(" ┌{}┐", "─".repeat(width));
    println!(" │{}  {}  {}│", " ".repeat(left), title, " ".repeat(right));
    println!(" └{}┘", "─".repeat(width));
    tracing::info!(phase = title, "Demo phase started");
}

fn ok(msg: &str) {
    println!("   [OK]  {}", msg);
}

fn info(msg: &str) {
    println!("   [--]  {}", msg);
}

fn warn(msg: &str) {
    println!("   [!!]  {}", msg);
}

fn describe(slot: &AttachmentSlot) -> String {
    match slot.current() {
        Some(a) => format!("{:?}: {}", a.kind, a.normalized_text),
        None => "nothing attached".to_string(),
    }
}

// ── Main ────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("{}", BANNER);

    if let Err(e) = run_demo().await {
        eprintln!();
        eprintln!("   [FATAL]  Demo failed: {}", e);
        std::process::exit(1);
    }

    println!();
    println!(" ════════════════════════════════════════════════════════════════");
    println!("  Demo complete.  All flows finished.");
    println!(" ════════════════════════════════════════════════════════════════");
    println!();
}

async fn run_demo() -> anyhow::Result<()> {
    let host = Arc::new(RecordingHost::new());
    let service = Arc::new(SimulatedSubmissionService::new());
    let launcher = WizardLauncher::new(
        WizardConfig::with_commit_timeout(5_000),
        host.clone(),
        service.clone(),
        Arc::new(StaticIdentity::signed_in("demo-user")),
    )?;
    let report_entry = EntryAffordance::new();
    let reference_entry = EntryAffordance::new();

    // ── Phase A: Report ─────────────────────────────────────────────
    section("Phase A: Report a post");

    let mut wizard = launcher.launch_report(
        &report_entry,
        ReportRequest {
            content_id: ContentId::new("post-1042"),
            author_id: UserId::new("user-88"),
            source: ReportSource::Feed,
        },
    )?;
    info(&format!("Wizard {} opened", wizard.id().short()));
    if launcher
        .launch_report(
            &report_entry,
            ReportRequest {
                content_id: ContentId::new("post-1042"),
                author_id: UserId::new("user-88"),
                source: ReportSource::Feed,
            },
        )
        .is_err()
    {
        ok("Second report blocked while the first is open");
    }

    let store = wizard.store();
    store.set_target(Target::Post)?;
    ok(&format!("Target: {}", Target::Post.label()));
    wizard.advance()?;
    store.set_topic(Topic::Scam)?;
    ok(&format!("Topic: {}", Topic::Scam.label()));
    wizard.advance()?;

    store.focus_context()?;
    store.edit_context("Asks for card details via a fake giveaway")?;
    store.confirm_context()?;
    ok("Context confirmed");

    service.fail_next(SubmissionError::new(
        "Couldn't send report",
        "Check your connection and try again.",
    ));
    match wizard.commit().await? {
        CommitOutcome::Failure(e) => warn(&format!("First attempt failed: {}", e)),
        CommitOutcome::Success => anyhow::bail!("simulated failure was not delivered"),
    }
    info(&format!(
        "Draft kept; commit enabled again: {}",
        wizard.can_commit()
    ));

    let outcome = wizard.commit().await?;
    ok(&format!(
        "Retry: success={}  submissions={}",
        outcome.is_success(),
        wizard.submissions()
    ));
    if let Some(payload) = service.reports().last() {
        info(&serde_json::to_string(payload)?);
    }

    // ── Phase B: Abandon ────────────────────────────────────────────
    section("Phase B: Abandon a touched report");

    let mut wizard = launcher.launch_report(
        &report_entry,
        ReportRequest {
            content_id: ContentId::new("comment-7"),
            author_id: UserId::new("user-12"),
            source: ReportSource::Comments,
        },
    )?;
    wizard.store().set_target(Target::Comment)?;
    if wizard.cancel()? == CancelOutcome::ConfirmationRequired {
        info("Unsaved changes; asking before discarding");
        wizard.keep_editing();
        wizard.cancel()?;
        wizard.confirm_abandon()?;
    }
    ok(&format!("State: {:?}", wizard.state()));

    // ── Phase C: Reference ──────────────────────────────────────────
    section("Phase C: Attach references");

    let mut slot = AttachmentSlot::new();
    let opener = StaticOpener::new(["ncbi.nlm.nih.gov"]);

    let (bridge, rx) = attachment_channel();
    let mut wizard = launcher.launch_reference(
        &reference_entry,
        ReferenceRequest {
            purpose: LinkPurpose::WebsiteAttachment,
            existing: None,
            bridge,
        },
    )?;
    wizard.choose_route(ReferenceKind::Link)?;
    let store = wizard.store();
    for attempt in ["hello world", "www.ncbi.nlm.nih.gov/12345"] {
        store.edit_reference(attempt)?;
        let classification = launcher
            .classifier()
            .classify(attempt, LinkPurpose::WebsiteAttachment);
        info(&format!(
            "{:<28} valid={:<5} host={:?} viewer={:?}",
            attempt,
            classification.valid,
            classification.host,
            choose_viewer(&classification, &opener)
        ));
    }
    wizard.commit().await?;
    if let Some(event) = rx.recv().await {
        slot.apply(event);
    }
    ok(&format!("Attached {}", describe(&slot)));

    let existing: Option<Attachment> = slot.current().cloned();
    let (bridge, rx) = attachment_channel();
    let mut wizard = launcher.launch_reference(
        &reference_entry,
        ReferenceRequest {
            purpose: LinkPurpose::PostReference,
            existing,
            bridge,
        },
    )?;
    wizard.choose_route(ReferenceKind::Citation)?;
    let store = wizard.store();
    store.focus_reference()?;
    store.edit_reference("Smith J., Journal of Examples, 2019")?;
    wizard.commit().await?;
    if let Some(event) = rx.recv().await {
        slot.apply(event);
    }
    ok(&format!("Replaced with {}", describe(&slot)));

    // ── Phase D: Detach ─────────────────────────────────────────────
    section("Phase D: Detach");

    let (bridge, rx) = attachment_channel();
    let mut wizard = launcher.launch_reference(
        &reference_entry,
        ReferenceRequest {
            purpose: LinkPurpose::PostReference,
            existing: slot.current().cloned(),
            bridge,
        },
    )?;
    wizard.remove_attachment()?;
    if let Some(event) = rx.recv().await {
        slot.apply(event);
    }
    ok(&format!("Slot now holds {}", describe(&slot)));
    info(&format!(
        "Service calls: {}  host commands: {}",
        service.calls(),
        host.commands().len()
    ));
    tracing::debug!(commands = ?host.commands(), "Presentation commands issued");

    Ok(())
}
