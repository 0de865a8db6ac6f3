//! In-process session record store

use std::{collections::BTreeMap, sync::Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::store::{SessionStore, StoreError};
use crate::state::{NewSession, RecordId, SessionRecord, SessionUpdate, TaskId};

/// Criteria for listing session records
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionFilter {
    pub user_id: Option<i64>,
    pub task_id: Option<TaskId>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl SessionFilter {
    pub fn matches(&self, record: &SessionRecord) -> bool {
        self.user_id.map_or(true, |id| record.user_id == Some(id))
            && self.task_id.map_or(true, |id| record.task_id == Some(id))
            && self.start_date.map_or(true, |start| record.started_at >= start)
            && self.end_date.map_or(true, |end| record.started_at <= end)
    }
}

#[derive(Debug)]
struct Records {
    next_id: RecordId,
    by_id: BTreeMap<RecordId, SessionRecord>,
}

/// Session records kept in memory for the lifetime of the process
#[derive(Debug)]
pub struct InMemorySessionStore {
    records: Mutex<Records>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Records {
                next_id: 1,
                by_id: BTreeMap::new(),
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Records>, StoreError> {
        self.records
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    /// Store a new record started now
    pub fn create(&self, session: NewSession) -> Result<SessionRecord, StoreError> {
        self.create_at(session, Utc::now())
    }

    /// Store a new record with an explicit start time
    pub fn create_at(
        &self,
        session: NewSession,
        started_at: DateTime<Utc>,
    ) -> Result<SessionRecord, StoreError> {
        let mut records = self.lock()?;
        let id = records.next_id;
        records.next_id += 1;

        let record = SessionRecord {
            id,
            task_id: session.task_id,
            user_id: session.user_id,
            duration: session.duration,
            session_type: session.session_type,
            completed: session.completed,
            started_at,
            completed_at: session.completed.then(Utc::now),
        };
        records.by_id.insert(id, record.clone());
        debug!("Created session record {} ({})", id, record.session_type);
        Ok(record)
    }

    pub fn get(&self, id: RecordId) -> Result<SessionRecord, StoreError> {
        self.lock()?
            .by_id
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Matching records, most recently started first
    pub fn list(&self, filter: &SessionFilter) -> Result<Vec<SessionRecord>, StoreError> {
        let records = self.lock()?;
        let mut matching: Vec<SessionRecord> = records
            .by_id
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.started_at.cmp(&a.started_at).then(b.id.cmp(&a.id)));
        Ok(matching)
    }

    pub fn update(&self, id: RecordId, update: SessionUpdate) -> Result<SessionRecord, StoreError> {
        if update.is_empty() {
            return Err(StoreError::EmptyUpdate);
        }

        let mut records = self.lock()?;
        let record = records.by_id.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if let Some(completed) = update.completed {
            record.completed = completed;
            if completed {
                record.completed_at = Some(Utc::now());
            }
        }
        if let Some(duration) = update.duration {
            record.duration = duration;
        }

        debug!(
            "Updated session record {}: completed={}, duration={}s",
            id, record.completed, record.duration
        );
        Ok(record.clone())
    }

    pub fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.lock()?
            .by_id
            .remove(&id)
            .map(|_| debug!("Deleted session record {}", id))
            .ok_or(StoreError::NotFound(id))
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(&self, session: NewSession) -> Result<RecordId, StoreError> {
        self.create(session).map(|record| record.id)
    }

    async fn finalize_session(
        &self,
        record_id: RecordId,
        completed: bool,
        duration_seconds: u32,
    ) -> Result<(), StoreError> {
        self.update(record_id, SessionUpdate::finalize(completed, duration_seconds))
            .map(|_| ())
    }
}
