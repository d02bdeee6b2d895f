use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;

use super::domain::{ApplicationId, ApplicationRecord, NewApplication};

/// The four calls the tracker makes against the remote table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOperation {
    List,
    Insert,
    DeleteOne,
    DeleteAll,
}

impl RemoteOperation {
    pub const fn label(self) -> &'static str {
        match self {
            RemoteOperation::List => "list",
            RemoteOperation::Insert => "insert",
            RemoteOperation::DeleteOne => "delete one",
            RemoteOperation::DeleteAll => "delete all",
        }
    }
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Any failure reported by the remote store, tagged with the operation that produced it.
#[derive(Debug, thiserror::Error)]
#[error("remote {operation} failed: {source}")]
pub struct RemoteError {
    pub operation: RemoteOperation,
    #[source]
    pub source: Box<dyn StdError + Send + Sync>,
}

impl RemoteError {
    pub fn new<E>(operation: RemoteOperation, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self {
            operation,
            source: source.into(),
        }
    }
}

/// Sole mediator between local state and the remote store.
///
/// Implementations must not retry; the caller decides whether to try again.
#[async_trait]
pub trait ApplicationGateway: Send + Sync {
    /// Every record, newest `created_at` first. An empty table is an empty vector.
    async fn list_all(&self) -> Result<Vec<ApplicationRecord>, RemoteError>;

    /// Persist one payload. The assigned record is observed by listing again.
    async fn insert(&self, application: &NewApplication) -> Result<(), RemoteError>;

    /// Remove the record with `id`. Unknown ids succeed without effect.
    async fn delete_one(&self, id: &ApplicationId) -> Result<(), RemoteError>;

    /// Remove every record.
    async fn delete_all(&self) -> Result<(), RemoteError>;
}
