use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::domain::ApplicationRecord;
use super::gateway::{ApplicationGateway, RemoteError};

/// Where the list is in its refresh cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Error,
}

/// What subscribers observe: the last confirmed server listing plus refresh status.
#[derive(Debug, Clone, Default)]
pub struct ListSnapshot {
    pub records: Arc<Vec<ApplicationRecord>>,
    pub load_state: LoadState,
    pub last_error: Option<String>,
}

/// Single source of truth for the current record set.
///
/// `refresh` is the only writer of `records`; mutations elsewhere go through the gateway
/// and then call `refresh`.
pub struct ApplicationListStore<G: ?Sized> {
    gateway: Arc<G>,
    snapshot: watch::Sender<ListSnapshot>,
}

impl<G> ApplicationListStore<G>
where
    G: ApplicationGateway + ?Sized,
{
    pub fn new(gateway: Arc<G>) -> Self {
        let (snapshot, _) = watch::channel(ListSnapshot::default());
        Self { gateway, snapshot }
    }

    /// Replace the list with a fresh server listing. On failure the previous list stays.
    pub async fn refresh(&self) -> Result<(), RemoteError> {
        self.snapshot
            .send_modify(|snapshot| snapshot.load_state = LoadState::Loading);

        match self.gateway.list_all().await {
            Ok(records) => {
                debug!(count = records.len(), "application list refreshed");
                self.snapshot.send_modify(|snapshot| {
                    snapshot.records = Arc::new(records);
                    snapshot.load_state = LoadState::Idle;
                    snapshot.last_error = None;
                });
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "application list refresh failed; keeping previous list");
                let message = err.to_string();
                self.snapshot.send_modify(|snapshot| {
                    snapshot.load_state = LoadState::Error;
                    snapshot.last_error = Some(message);
                });
                Err(err)
            }
        }
    }

    /// Acknowledge a failed refresh notice: `Error -> Idle`.
    pub fn dismiss_error(&self) {
        self.snapshot.send_if_modified(|snapshot| {
            if snapshot.load_state != LoadState::Error {
                return false;
            }
            snapshot.load_state = LoadState::Idle;
            snapshot.last_error = None;
            true
        });
    }

    pub fn snapshot(&self) -> ListSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn records(&self) -> Arc<Vec<ApplicationRecord>> {
        Arc::clone(&self.snapshot.borrow().records)
    }

    pub fn load_state(&self) -> LoadState {
        self.snapshot.borrow().load_state
    }

    /// Observe every snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot> {
        self.snapshot.subscribe()
    }
}
