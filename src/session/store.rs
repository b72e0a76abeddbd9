//! Session persistence boundary.
//!
//! The pipeline only ever loads and saves whole sessions, so the boundary
//! is two methods. [`InMemorySessionStore`] backs tests and single-process
//! use; a database-backed store would implement the same trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::SessionError;
use crate::session::ProcessingSession;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<ProcessingSession>, SessionError>;
    async fn save(&self, session: &ProcessingSession) -> Result<(), SessionError>;
}

#[derive(Default)]
pub struct InMemorySessionStore {
    inner: RwLock<HashMap<Uuid, ProcessingSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<ProcessingSession>, SessionError> {
        Ok(self.inner.read().await.get(&id).cloned())
    }

    async fn save(&self, session: &ProcessingSession) -> Result<(), SessionError> {
        self.inner.write().await.insert(session.id, session.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let store = InMemorySessionStore::new();
        let session = ProcessingSession::new(
            "job".to_string(),
            "resume".to_string(),
            "cover".to_string(),
        );
        let id = session.id;

        store.save(&session).await.unwrap();
        let loaded = store.load(id).await.unwrap().unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.job_description_text, "job");
    }

    #[tokio::test]
    async fn test_load_unknown_id_is_none() {
        let store = InMemorySessionStore::new();
        assert!(store.load(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_session() {
        let store = InMemorySessionStore::new();
        let mut session = ProcessingSession::new(
            "job".to_string(),
            "resume".to_string(),
            "cover".to_string(),
        );
        store.save(&session).await.unwrap();

        session.set_status(crate::session::SessionStatus::Completed);
        store.save(&session).await.unwrap();

        let loaded = store.load(session.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, crate::session::SessionStatus::Completed);
    }
}
