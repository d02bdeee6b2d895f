use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::domain::{ApplicationId, ApplicationRecord};
use super::export::{export_csv, CsvExport, ExportError};
use super::form::{DraftEdit, DraftFormController, FormError, FormState};
use super::gateway::{ApplicationGateway, RemoteError};
use super::stats::{followups_due, status_breakdown, DerivedStats, StatusCount};
use super::store::{ApplicationListStore, ListSnapshot};
use super::validation::ValidationError;

/// Yes/no gate in front of destructive operations.
pub trait ConfirmationPrompt: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Whether a confirmed mutation actually ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Declined,
}

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Form(FormError),
    #[error("another change is still being saved; try again when it finishes")]
    Busy,
}

impl From<FormError> for TrackerError {
    fn from(value: FormError) -> Self {
        match value {
            FormError::Validation(err) => Self::Validation(err),
            other => Self::Form(other),
        }
    }
}

/// Released when dropped, so early returns and failures always clear the flag.
struct BusyToken<'a>(&'a AtomicBool);

impl Drop for BusyToken<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One per running application context: owns the list, the draft form, and the
/// one-mutation-at-a-time guard in front of the gateway.
pub struct ApplicationTracker<G: ?Sized, C: ?Sized> {
    gateway: Arc<G>,
    store: ApplicationListStore<G>,
    form: Mutex<DraftFormController>,
    confirmer: Arc<C>,
    busy: AtomicBool,
}

impl<G, C> ApplicationTracker<G, C>
where
    G: ApplicationGateway + ?Sized,
    C: ConfirmationPrompt + ?Sized,
{
    pub fn new(gateway: Arc<G>, confirmer: Arc<C>) -> Self {
        let store = ApplicationListStore::new(Arc::clone(&gateway));
        Self {
            gateway,
            store,
            form: Mutex::new(DraftFormController::default()),
            confirmer,
            busy: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &ApplicationListStore<G> {
        &self.store
    }

    pub async fn refresh(&self) -> Result<(), TrackerError> {
        self.store.refresh().await?;
        Ok(())
    }

    pub fn records(&self) -> Arc<Vec<ApplicationRecord>> {
        self.store.records()
    }

    pub fn snapshot(&self) -> ListSnapshot {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot> {
        self.store.subscribe()
    }

    /// True while a submit, delete, or clear is in flight; triggering controls should be disabled.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> DerivedStats {
        DerivedStats::from_records(&self.records())
    }

    pub fn status_breakdown(&self) -> Vec<StatusCount> {
        status_breakdown(&self.records())
    }

    pub fn followups_due(&self, day: NaiveDate) -> Vec<ApplicationRecord> {
        followups_due(&self.records(), day)
            .into_iter()
            .cloned()
            .collect()
    }

    /// CSV of the current list, or `None` when there is nothing to export.
    pub fn export_csv(&self, export_date: NaiveDate) -> Result<Option<CsvExport>, ExportError> {
        export_csv(&self.records(), export_date)
    }

    pub fn open_form(&self, today: NaiveDate) {
        self.form().open(today);
    }

    pub fn close_form(&self) {
        self.form().close();
    }

    pub fn edit_draft(&self, edit: DraftEdit) -> Result<(), TrackerError> {
        self.form().apply(edit)?;
        Ok(())
    }

    pub fn form_state(&self) -> FormState {
        self.form().state().clone()
    }

    /// Validate, insert, refresh, close. Any remote failure puts the draft back in `Open`.
    ///
    /// The form may be closed while the save is in flight. The result then still
    /// reflects the remote outcome and the form is left as the caller put it.
    pub async fn submit(&self) -> Result<(), TrackerError> {
        let _token = self.begin_mutation()?;
        let payload = self.form().begin_submit()?;

        let saved = async {
            self.gateway.insert(&payload).await?;
            self.store.refresh().await
        };

        match saved.await {
            Ok(()) => {
                if self.form().complete_submit().is_err() {
                    debug!("form left submitting state during save");
                }
                info!(company = %payload.company, role = %payload.role, "application saved");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "saving application failed; draft kept open");
                if self.form().abort_submit().is_err() {
                    debug!("form left submitting state during save; draft not restored");
                }
                Err(err.into())
            }
        }
    }

    pub async fn delete(&self, id: &ApplicationId) -> Result<MutationOutcome, TrackerError> {
        let _token = self.begin_mutation()?;
        if !self
            .confirmer
            .confirm(&format!("Delete application {id}? This cannot be undone."))
        {
            return Ok(MutationOutcome::Declined);
        }

        let deleted = async {
            self.gateway.delete_one(id).await?;
            self.store.refresh().await
        };
        deleted.await.map_err(|err| {
            warn!(error = %err, %id, "deleting application failed");
            err
        })?;

        info!(%id, "application deleted");
        Ok(MutationOutcome::Applied)
    }

    pub async fn clear_all(&self) -> Result<MutationOutcome, TrackerError> {
        let _token = self.begin_mutation()?;
        if !self
            .confirmer
            .confirm("Delete ALL applications? This cannot be undone.")
        {
            return Ok(MutationOutcome::Declined);
        }

        let cleared = async {
            self.gateway.delete_all().await?;
            self.store.refresh().await
        };
        cleared.await.map_err(|err| {
            warn!(error = %err, "clearing applications failed");
            err
        })?;

        info!("all applications deleted");
        Ok(MutationOutcome::Applied)
    }

    fn begin_mutation(&self) -> Result<BusyToken<'_>, TrackerError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| TrackerError::Busy)?;
        Ok(BusyToken(&self.busy))
    }

    fn form(&self) -> MutexGuard<'_, DraftFormController> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
