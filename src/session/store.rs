use super::{Page, Session};
use crate::{Error, Result, assistant::Intent, history::Turn};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use tracing::{debug, info};
use uuid::Uuid;

/// Logged-in sessions, keyed by an opaque id. Nothing here outlives the process.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, email: &str, full_name: &str) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let session = Session::new(id.clone(), email.to_string(), full_name.to_string());

        self.sessions
            .write()
            .map_err(|e| Error::internal(format!("Session lock failed: {e}")))?
            .insert(id.clone(), session);

        info!("Session created for {}", email);
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Result<Session> {
        self.sessions
            .read()
            .map_err(|e| Error::internal(format!("Session lock failed: {e}")))?
            .get(id)
            .cloned()
            .ok_or(Error::Unauthorized)
    }

    /// Drops the session and its transcript.
    pub fn remove(&self, id: &str) -> Result<Session> {
        let session = self
            .sessions
            .write()
            .map_err(|e| Error::internal(format!("Session lock failed: {e}")))?
            .remove(id)
            .ok_or(Error::Unauthorized)?;

        info!(
            "Session closed for {} ({} chat turns discarded)",
            session.email,
            session.transcript.len()
        );
        Ok(session)
    }

    pub fn set_page(&self, id: &str, page: Option<Page>) -> Result<()> {
        self.update(id, |session| session.page = page)?;
        debug!("Session {} moved to page {:?}", id, page);
        Ok(())
    }

    /// Classifies and records one chat message while holding the session lock.
    pub fn chat(&self, id: &str, message: &str) -> Result<Intent> {
        self.update(id, |session| session.respond(message))
    }

    pub fn transcript(&self, id: &str) -> Result<Vec<Turn>> {
        let session = self.get(id)?;
        Ok(session.transcript.turns().to_vec())
    }

    fn update<T>(&self, id: &str, f: impl FnOnce(&mut Session) -> T) -> Result<T> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| Error::internal(format!("Session lock failed: {e}")))?;
        let session = sessions.get_mut(id).ok_or(Error::Unauthorized)?;
        Ok(f(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_and_get() {
        let store = SessionStore::new();
        let id = store.create("jane@example.com", "Jane Doe").unwrap();

        let session = store.get(&id).unwrap();
        assert_eq!(session.email, "jane@example.com");
        assert_eq!(session.full_name, "Jane Doe");
        assert_eq!(session.page, None);
        assert!(session.transcript.is_empty());
    }

    #[test]
    fn test_unknown_session_is_unauthorized() {
        let store = SessionStore::new();
        assert!(matches!(store.get("missing"), Err(Error::Unauthorized)));
        assert!(matches!(store.chat("missing", "hi"), Err(Error::Unauthorized)));
        assert!(matches!(store.remove("missing"), Err(Error::Unauthorized)));
    }

    #[test]
    fn test_chat_builds_transcript() {
        let store = SessionStore::new();
        let id = store.create("jane@example.com", "Jane Doe").unwrap();

        assert_eq!(store.chat(&id, "my claim was denied").unwrap(), Intent::Denial);
        assert_eq!(store.chat(&id, "yes").unwrap(), Intent::DenialFollowUp);
        assert_eq!(store.transcript(&id).unwrap().len(), 4);
    }

    #[test]
    fn test_remove_discards_transcript() {
        let store = SessionStore::new();
        let id = store.create("jane@example.com", "Jane Doe").unwrap();
        store.chat(&id, "hello").unwrap();

        let removed = store.remove(&id).unwrap();
        assert_eq!(removed.transcript.len(), 2);
        assert!(store.get(&id).is_err());

        let fresh = store.create("jane@example.com", "Jane Doe").unwrap();
        assert!(store.transcript(&fresh).unwrap().is_empty());
    }

    #[test]
    fn test_set_page() {
        let store = SessionStore::new();
        let id = store.create("jane@example.com", "Jane Doe").unwrap();

        store.set_page(&id, Some(Page::DeniedInquiry)).unwrap();
        assert_eq!(store.get(&id).unwrap().page, Some(Page::DeniedInquiry));

        store.set_page(&id, None).unwrap();
        assert_eq!(store.get(&id).unwrap().page, None);
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = SessionStore::new();
        let a = store.create("a@example.com", "A").unwrap();
        let b = store.create("b@example.com", "B").unwrap();

        store.chat(&a, "I have a symptom").unwrap();
        assert_eq!(store.chat(&b, "more").unwrap(), Intent::Clarify);
        assert_eq!(store.chat(&a, "more").unwrap(), Intent::SymptomFollowUp);
    }
}
