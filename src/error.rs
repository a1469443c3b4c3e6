//! Error types for the dashboard crate.

use thiserror::Error;

/// Convenience alias used by the auth service and the credential stores.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the auth service and its credential stores.
///
/// Lookups that simply find nothing are not errors: they surface as `Ok(None)`
/// or `Ok(false)`. Only backend failures end up here.
#[derive(Debug, Error)]
pub enum Error {
    /// The relational store rejected or failed an operation.
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The password hasher failed to produce a hash.
    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    /// The in-memory store lock was poisoned by a panicking writer.
    #[error("in-memory store poisoned")]
    Poisoned,
}

/// Failures of the data connector.
///
/// These never reach dashboard callers directly; the connector logs them and
/// reports an absent handle instead.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// A required environment variable is unset or empty.
    #[error("missing connection setting {0}")]
    MissingConfig(&'static str),

    /// The port setting is not an integer in range.
    #[error("HANA_PORT ('{0}') is not a valid integer")]
    InvalidPort(String),

    /// Opening the connection failed.
    #[error("could not connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Releasing the connection failed.
    #[error("{0}")]
    Close(#[source] std::io::Error),
}
