use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Notify;

use crate::applications::domain::{ApplicationId, ApplicationRecord, ApplicationStatus, NewApplication};
use crate::applications::form::DraftEdit;
use crate::applications::gateway::{ApplicationGateway, RemoteError};
use crate::applications::memory::InMemoryGateway;
use crate::applications::tracker::{ApplicationTracker, ConfirmationPrompt};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 15).expect("valid date")
}

/// Answers every prompt the same way and remembers what was asked.
#[derive(Default)]
pub(super) struct ScriptedConfirm {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub(super) fn accepting() -> Self {
        Self {
            answer: true,
            ..Self::default()
        }
    }

    pub(super) fn declining() -> Self {
        Self::default()
    }

    pub(super) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

impl ConfirmationPrompt for ScriptedConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.to_string());
        self.answer
    }
}

pub(super) type MemoryTracker = ApplicationTracker<InMemoryGateway, ScriptedConfirm>;

pub(super) fn tracker() -> (Arc<InMemoryGateway>, Arc<ScriptedConfirm>, MemoryTracker) {
    let gateway = Arc::new(InMemoryGateway::new());
    let confirm = Arc::new(ScriptedConfirm::accepting());
    let tracker = ApplicationTracker::new(gateway.clone(), confirm.clone());
    (gateway, confirm, tracker)
}

pub(super) fn edits(company: &str, match_score: &str, status: ApplicationStatus) -> Vec<DraftEdit> {
    vec![
        DraftEdit::Company(company.to_string()),
        DraftEdit::Role("Software Engineer".to_string()),
        DraftEdit::MatchScore(match_score.to_string()),
        DraftEdit::Status(status),
    ]
}

/// Open the form, fill it in, and submit.
pub(super) async fn add<G, C>(
    tracker: &ApplicationTracker<G, C>,
    company: &str,
    match_score: &str,
    status: ApplicationStatus,
) -> Result<(), crate::applications::tracker::TrackerError>
where
    G: ApplicationGateway + ?Sized,
    C: ConfirmationPrompt + ?Sized,
{
    tracker.open_form(today());
    for edit in edits(company, match_score, status) {
        tracker.edit_draft(edit)?;
    }
    tracker.submit().await
}

/// Gateway whose inserts park until released, to hold a mutation in flight.
#[derive(Default)]
pub(super) struct GatedGateway {
    pub(super) inner: InMemoryGateway,
    pub(super) entered: Notify,
    pub(super) release: Notify,
}

#[async_trait]
impl ApplicationGateway for GatedGateway {
    async fn list_all(&self) -> Result<Vec<ApplicationRecord>, RemoteError> {
        self.inner.list_all().await
    }

    async fn insert(&self, application: &NewApplication) -> Result<(), RemoteError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.insert(application).await
    }

    async fn delete_one(&self, id: &ApplicationId) -> Result<(), RemoteError> {
        self.inner.delete_one(id).await
    }

    async fn delete_all(&self) -> Result<(), RemoteError> {
        self.inner.delete_all().await
    }
}
