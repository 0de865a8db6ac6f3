//! Session record store interface

use async_trait::async_trait;
use thiserror::Error;

use crate::state::{NewSession, RecordId};

/// Errors raised by session record stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session record {0} not found")]
    NotFound(RecordId),
    #[error("no fields to update")]
    EmptyUpdate,
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("failed to lock session store: {0}")]
    Lock(String),
    #[error("session store request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Remote persistence the focus timer reports its sessions to
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Open a record for a session that just started
    async fn create_session(&self, session: NewSession) -> Result<RecordId, StoreError>;

    /// Close a record with the session's outcome
    async fn finalize_session(
        &self,
        record_id: RecordId,
        completed: bool,
        duration_seconds: u32,
    ) -> Result<(), StoreError>;
}
