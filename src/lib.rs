//! # Sales Dashboard
//!
//! A small web dashboard showing sales figures from an SAP HANA data source,
//! with password and session auth backed by [Sea-ORM](https://crates.io/crates/sea-orm)
//! or by process-local maps.
//!
//! ## Pieces
//!
//! - [`Auth`]: Argon2 password hashing, user signup and login, random
//!   session tokens with a fixed lifetime.
//! - [`CredentialStore`]: where users and sessions live. [`DatabaseStore`]
//!   persists to the `users` and `sessions` tables, [`MemoryStore`] keeps them
//!   in memory.
//! - [`connector`]: reads `HANA_*` settings, opens a connection and serves
//!   mock tables.
//! - [`dashboard`]: composes the sales view for a user.
//! - [`render`] and [`server`]: HTML output and the axum router.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sales_dashboard::{Auth, MemoryStore};
//!
//! # async fn example() -> Result<(), sales_dashboard::Error> {
//! let auth = Auth::new(MemoryStore::new());
//!
//! let user = auth.create_user("alice", "alice@example.com", "hunter2").await?;
//! if let Some(user) = auth.authenticate_user("alice", "hunter2").await? {
//!     let token = auth.create_session(user.id).await?;
//!     assert!(auth.get_session(&token).await?.is_some());
//!     auth.delete_session(&token).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Database Backend
//!
//! With the `migration` feature (on by default), run
//! `migration::Migrator::up` once before handing the connection to
//! [`DatabaseStore`].
//!
//! ```no_run
//! use sea_orm::Database;
//! use sales_dashboard::{Auth, DatabaseStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = Database::connect("sqlite://dashboard.db?mode=rwc").await?;
//! let auth = Auth::new(DatabaseStore::new(conn));
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod connector;
pub mod dashboard;
pub mod entity;
pub mod error;
pub mod password;
pub mod render;
pub mod server;
pub mod store;
pub mod table;

/// Schema migrations for the relational store.
#[cfg(feature = "migration")]
pub mod migration;

pub use auth::Auth;
pub use config::Settings;
pub use connector::{ConnectionParams, DataSource, HanaConnection, HanaConnector};
pub use dashboard::{CurrentUser, View};
pub use error::{ConnectorError, Error, Result};
pub use store::{CredentialStore, DatabaseStore, MemoryStore, Session, User};
pub use table::{Cell, Table};
