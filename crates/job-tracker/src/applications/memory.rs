use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::domain::{ApplicationId, ApplicationRecord, NewApplication};
use super::gateway::{ApplicationGateway, RemoteError, RemoteOperation};

/// Failure returned for an injected fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedFailure(pub String);

impl fmt::Display for InjectedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InjectedFailure {}

#[derive(Default)]
struct MemoryState {
    /// Oldest first.
    rows: Vec<ApplicationRecord>,
    next_id: u64,
    last_created_at: Option<DateTime<Utc>>,
    failures: HashMap<RemoteOperation, String>,
    calls: HashMap<RemoteOperation, usize>,
}

/// Process-local stand-in for the remote table, used by tests and the demo command.
#[derive(Default, Clone)]
pub struct InMemoryGateway {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call of `operation` fail with `message`.
    pub fn fail_next(&self, operation: RemoteOperation, message: impl Into<String>) {
        self.lock().failures.insert(operation, message.into());
    }

    /// Number of calls of `operation` seen so far, failed ones included.
    pub fn calls(&self, operation: RemoteOperation) -> usize {
        self.lock().calls.get(&operation).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, operation: RemoteOperation) -> Result<MutexGuard<'_, MemoryState>, RemoteError> {
        let mut guard = self.lock();
        *guard.calls.entry(operation).or_insert(0) += 1;
        let failure = guard.failures.remove(&operation);
        match failure {
            Some(message) => Err(RemoteError::new(operation, InjectedFailure(message))),
            None => Ok(guard),
        }
    }
}

impl MemoryState {
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_created_at {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_created_at = Some(stamp);
        stamp
    }
}

#[async_trait]
impl ApplicationGateway for InMemoryGateway {
    async fn list_all(&self) -> Result<Vec<ApplicationRecord>, RemoteError> {
        let guard = self.begin(RemoteOperation::List)?;
        let mut rows: Vec<_> = guard.rows.iter().rev().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, application: &NewApplication) -> Result<(), RemoteError> {
        let mut guard = self.begin(RemoteOperation::Insert)?;
        guard.next_id += 1;
        let id = ApplicationId(format!("app-{:06}", guard.next_id));
        let created_at = guard.next_timestamp();

        let NewApplication {
            date,
            company,
            role,
            match_score,
            status,
            followup,
            salary,
            tags,
            link,
            notes,
        } = application.clone();

        guard.rows.push(ApplicationRecord {
            id,
            date,
            company,
            role,
            match_score,
            status,
            followup,
            salary,
            tags,
            link,
            notes,
            created_at,
        });
        Ok(())
    }

    async fn delete_one(&self, id: &ApplicationId) -> Result<(), RemoteError> {
        let mut guard = self.begin(RemoteOperation::DeleteOne)?;
        guard.rows.retain(|row| &row.id != id);
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), RemoteError> {
        let mut guard = self.begin(RemoteOperation::DeleteAll)?;
        guard.rows.clear();
        Ok(())
    }
}
