//! Credential storage backends.
//!
//! The auth service talks to users and sessions through [`CredentialStore`].
//! Two implementations ship with the crate:
//!
//! - [`DatabaseStore`]: persists to the `users` and `sessions` tables through
//!   Sea-ORM. Uniqueness and the session → user foreign key are enforced by
//!   the database.
//! - [`MemoryStore`]: process-local maps, used when no database is configured.
//!   Users are keyed by username and nothing ties a session to an existing
//!   user.
//!
//! Stores return raw rows. Expiry filtering and token generation live in
//! [`crate::auth::Auth`] so both backends behave the same way.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

mod database;
mod memory;

pub use database::DatabaseStore;
pub use memory::MemoryStore;

/// A stored user account.
pub type User = crate::entity::user::Model;

/// A stored login session.
pub type Session = crate::entity::session::Model;

/// Fields of a user that the caller supplies; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Fields of a session that the caller supplies; the store assigns the row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub session_id: String,
    pub user_id: i32,
    pub expiry_timestamp: DateTime<Utc>,
}

/// Storage for users and sessions.
#[async_trait]
pub trait CredentialStore: Debug + Send + Sync {
    /// Stores a new user and returns it with its assigned id.
    async fn insert_user(&self, user: NewUser) -> Result<User>;

    /// Looks a user up by username.
    async fn find_user(&self, username: &str) -> Result<Option<User>>;

    /// Looks a user up by id.
    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>>;

    /// Stores a new session and returns it with its assigned row id.
    async fn insert_session(&self, session: NewSession) -> Result<Session>;

    /// Looks a session up by token, whether or not it has expired.
    async fn find_session(&self, session_id: &str) -> Result<Option<Session>>;

    /// Removes a session by token, reporting whether a row was removed.
    async fn remove_session(&self, session_id: &str) -> Result<bool>;
}
