//! Application settings.
//!
//! | Variable                | Default          | Meaning                                  |
//! |-------------------------|------------------|------------------------------------------|
//! | `DATABASE_URL`          | unset            | Credential database; in-memory if unset  |
//! | `DASHBOARD_LISTEN_ADDR` | `127.0.0.1:5006` | Address the HTTP server binds            |
//! | `DASHBOARD_USER`        | `testuser`       | Mock current user; empty shows login     |
//!
//! The data source has its own settings, see [`crate::connector`].

use crate::dashboard::CurrentUser;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DASHBOARD_LISTEN_ADDR: &str = "DASHBOARD_LISTEN_ADDR";
pub const DASHBOARD_USER: &str = "DASHBOARD_USER";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5006";
pub const DEFAULT_USER: &str = "testuser";
pub const APP_TITLE: &str = "Sales Dashboard Application";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: Option<String>,
    pub listen_addr: String,
    pub current_user: Option<CurrentUser>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: None,
            listen_addr: DEFAULT_LISTEN_ADDR.to_owned(),
            current_user: Some(CurrentUser::new(DEFAULT_USER)),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL).filter(|url| !url.is_empty());
        let listen_addr = lookup(DASHBOARD_LISTEN_ADDR)
            .filter(|addr| !addr.is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned());
        let current_user = match lookup(DASHBOARD_USER) {
            None => Some(CurrentUser::new(DEFAULT_USER)),
            Some(name) if name.trim().is_empty() => None,
            Some(name) => Some(CurrentUser::new(name)),
        };

        Self {
            database_url,
            listen_addr,
            current_user,
        }
    }
}
