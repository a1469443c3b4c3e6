//! Users, passwords and sessions.
//!
//! [`Auth`] wraps a [`CredentialStore`] and implements signup, login and
//! session bookkeeping on top of it. The store is injected, so the same
//! service runs against the database or the in-memory maps.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::RngCore;

use crate::error::Result;
use crate::password::{hash_password, verify_password};
use crate::store::{CredentialStore, NewSession, NewUser, Session, User};

/// Number of random bytes in a session token (hex-encoded to twice as many chars).
pub const TOKEN_BYTES: usize = 16;

/// Why a login attempt failed.
///
/// Only ever logged. Callers of [`Auth::authenticate_user`] see `None` for
/// both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginFailure {
    UnknownUser,
    WrongPassword,
}

/// The auth service.
///
/// Cheap to clone; clones share the store.
#[derive(Debug, Clone)]
pub struct Auth {
    store: Arc<dyn CredentialStore>,
    session_lifetime: Duration,
}

impl Auth {
    /// Creates an auth service with a one hour session lifetime.
    pub fn new(store: impl CredentialStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
            session_lifetime: Duration::hours(1),
        }
    }

    /// Overrides how long new sessions stay valid.
    pub fn with_session_lifetime(mut self, lifetime: Duration) -> Self {
        self.session_lifetime = lifetime;
        self
    }

    pub fn session_lifetime(&self) -> Duration {
        self.session_lifetime
    }

    /// Hashes the password and stores a new user.
    ///
    /// Duplicate detection is left to the store.
    pub async fn create_user(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let password_hash = hash_password(password)?;
        let user = self
            .store
            .insert_user(NewUser {
                username: username.to_owned(),
                email: email.to_owned(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "created user");
        Ok(user)
    }

    /// Returns the user only if it exists and `password` matches its hash.
    pub async fn authenticate_user(&self, username: &str, password: &str) -> Result<Option<User>> {
        let outcome = match self.store.find_user(username).await? {
            Some(user) if verify_password(password, &user.password_hash) => Ok(user),
            Some(_) => Err(LoginFailure::WrongPassword),
            None => Err(LoginFailure::UnknownUser),
        };

        match outcome {
            Ok(user) => {
                tracing::debug!(username, "authenticated user");
                Ok(Some(user))
            }
            Err(reason) => {
                tracing::debug!(username, ?reason, "authentication failed");
                Ok(None)
            }
        }
    }

    /// Starts a session for `user_id` and returns its token.
    pub async fn create_session(&self, user_id: i32) -> Result<String> {
        Ok(self.start_session(user_id).await?.session_id)
    }

    /// Starts a session for `user_id` and returns the stored record.
    ///
    /// TODO: regenerate the session on login (invalidate any session the
    /// client already holds) to prevent session fixation.
    pub async fn start_session(&self, user_id: i32) -> Result<Session> {
        let expiry_timestamp = Utc::now() + self.session_lifetime;

        let session = self
            .store
            .insert_session(NewSession {
                session_id: generate_token(),
                user_id,
                expiry_timestamp,
            })
            .await?;

        tracing::debug!(user_id, %expiry_timestamp, "created session");
        Ok(session)
    }

    /// Returns the session if it exists and has not expired.
    ///
    /// TODO: expired rows are skipped but never deleted; add a sweep that
    /// removes sessions past their expiry.
    pub async fn get_session(&self, token: &str) -> Result<Option<Session>> {
        let now = Utc::now();
        Ok(self
            .store
            .find_session(token)
            .await?
            .filter(|session| session.expiry_timestamp > now))
    }

    /// Removes the session, reporting whether it existed.
    pub async fn delete_session(&self, token: &str) -> Result<bool> {
        let removed = self.store.remove_session(token).await?;
        tracing::debug!(removed, "deleted session");
        Ok(removed)
    }

    /// Returns the user owning a live session.
    ///
    /// Expired sessions and sessions whose user no longer exists both yield
    /// `None`.
    pub async fn session_user(&self, token: &str) -> Result<Option<User>> {
        match self.get_session(token).await? {
            Some(session) => self.store.find_user_by_id(session.user_id).await,
            None => Ok(None),
        }
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
