//! Session record store backed by a remote `/api/pomodoro` resource

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::store::{SessionStore, StoreError};
use crate::state::{NewSession, RecordId, SessionRecord, SessionUpdate};

/// HTTP client for a remote session record API
#[derive(Debug, Clone)]
pub struct HttpSessionStore {
    client: Client,
    base_url: String,
}

impl HttpSessionStore {
    /// Create a client for the record API rooted at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn sessions_url(&self) -> String {
        format!("{}/api/pomodoro", self.base_url)
    }
}

#[async_trait]
impl SessionStore for HttpSessionStore {
    async fn create_session(&self, session: NewSession) -> Result<RecordId, StoreError> {
        debug!("POST {} ({})", self.sessions_url(), session.session_type);

        let record: SessionRecord = self
            .client
            .post(self.sessions_url())
            .json(&session)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(record.id)
    }

    async fn finalize_session(
        &self,
        record_id: RecordId,
        completed: bool,
        duration_seconds: u32,
    ) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.sessions_url(), record_id);
        debug!("PATCH {} completed={} duration={}s", url, completed, duration_seconds);

        let response = self
            .client
            .patch(&url)
            .json(&SessionUpdate::finalize(completed, duration_seconds))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(record_id));
        }
        response.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let store = HttpSessionStore::new("http://localhost:3000/", Duration::from_secs(1)).unwrap();
        assert_eq!(store.base_url(), "http://localhost:3000");
        assert_eq!(store.sessions_url(), "http://localhost:3000/api/pomodoro");
    }
}
