use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{CredentialStore, NewSession, NewUser, Session, User};
use crate::error::{Error, Result};

/// An in-memory credential store.
///
/// Users are keyed by username: inserting a username twice replaces the
/// earlier record. Sessions are keyed by token and may reference user ids
/// that do not exist. Clones share the same maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<String, User>,
    sessions: HashMap<String, Session>,
    last_user_id: i32,
    last_session_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| Error::Poisoned)
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let mut inner = self.lock()?;
        inner.last_user_id += 1;

        let record = User {
            id: inner.last_user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
        };
        tracing::debug!(username = %record.username, "storing user in memory");
        inner.users.insert(record.username.clone(), record.clone());

        Ok(record)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>> {
        Ok(self.lock()?.users.get(username).cloned())
    }

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|user| user.id == id)
            .cloned())
    }

    async fn insert_session(&self, session: NewSession) -> Result<Session> {
        let mut inner = self.lock()?;
        inner.last_session_id += 1;

        let record = Session {
            id: inner.last_session_id,
            session_id: session.session_id,
            user_id: session.user_id,
            expiry_timestamp: session.expiry_timestamp,
        };
        inner
            .sessions
            .insert(record.session_id.clone(), record.clone());

        Ok(record)
    }

    async fn find_session(&self, session_id: &str) -> Result<Option<Session>> {
        Ok(self.lock()?.sessions.get(session_id).cloned())
    }

    async fn remove_session(&self, session_id: &str) -> Result<bool> {
        Ok(self.lock()?.sessions.remove(session_id).is_some())
    }
}
