//! Database entity models for the credential store.
//!
//! These Sea-ORM entities describe the two relational tables used when the
//! auth service persists to a database: `users` and `sessions`. A session row
//! references its owning user through a foreign key.

/// User accounts: unique username and email plus an Argon2 password hash.
pub mod user;

/// Login sessions: random token, owning user and expiry timestamp.
pub mod session;
