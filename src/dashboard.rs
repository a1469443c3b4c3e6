//! Sales dashboard composition.
//!
//! [`build`] turns the current user and a [`DataSource`] into a [`View`]. The
//! view is plain data; [`crate::render`] turns it into HTML.
//!
//! One build is a single pass:
//!
//! ```text
//! start ─┬─ no user ──────────────────────────────────────► error view
//!        └─ connect ─┬─ failed ─► danger notice + empty table
//!                    └─ ok ─► success notice ─► fetch ─┬─ empty ─► warning + empty table
//!                                                      └─ rows ──► table
//!                           ─► close (failure adds a warning notice)
//! ```

use serde::Serialize;

use crate::connector::DataSource;
use crate::table::Table;

pub const SALES_TABLE: &str = "Sales Data";

const NO_USER: &str = "Error: No user context provided.";
const CONNECT_FAILED: &str =
    "Error: Could not connect to SAP HANA. Please check connection details or environment variables.";
const CONNECTED: &str = "Successfully connected to SAP HANA.";
const NO_SALES: &str = "No sales data available or an error occurred during fetching.";

/// The user a dashboard is built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub username: String,
}

impl CurrentUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Warning,
    Danger,
}

/// A highlighted status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Component {
    Heading { text: String },
    Notice(Notice),
    Table { name: String, table: Table },
}

/// The outcome of a dashboard build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum View {
    /// Nothing can be shown; carries the message to display.
    Error { message: String },
    /// Components in display order.
    Dashboard { components: Vec<Component> },
}

impl View {
    /// Notices in display order; empty for an error view.
    pub fn notices(&self) -> Vec<&Notice> {
        match self {
            View::Error { .. } => Vec::new(),
            View::Dashboard { components } => components
                .iter()
                .filter_map(|c| match c {
                    Component::Notice(notice) => Some(notice),
                    _ => None,
                })
                .collect(),
        }
    }

    /// The first table in the view, if any.
    pub fn table(&self) -> Option<&Table> {
        match self {
            View::Error { .. } => None,
            View::Dashboard { components } => components.iter().find_map(|c| match c {
                Component::Table { table, .. } => Some(table),
                _ => None,
            }),
        }
    }
}

/// Builds the sales dashboard for `user` from `source`.
pub async fn build<S: DataSource>(user: Option<&CurrentUser>, source: &S) -> View {
    let Some(user) = user else {
        return View::Error {
            message: NO_USER.to_owned(),
        };
    };

    let mut components = vec![Component::Heading {
        text: format!("Sales Dashboard for {}", user.username),
    }];

    let sales = match source.connect().await {
        None => {
            components.push(Component::Notice(Notice::new(
                NoticeKind::Danger,
                CONNECT_FAILED,
            )));
            Table::empty()
        }
        Some(handle) => {
            components.push(Component::Notice(Notice::new(NoticeKind::Success, CONNECTED)));

            let fetched = source.sales_data(Some(&handle)).await;
            let sales = if fetched.is_empty() {
                components.push(Component::Notice(Notice::new(NoticeKind::Warning, NO_SALES)));
                Table::empty()
            } else {
                fetched
            };

            if let Err(e) = source.close(handle).await {
                tracing::warn!(error = %e, "error closing SAP HANA connection");
                components.push(Component::Notice(Notice::new(
                    NoticeKind::Warning,
                    format!("Warning: Could not close SAP HANA connection: {e}"),
                )));
            }

            sales
        }
    };

    components.push(Component::Table {
        name: SALES_TABLE.to_owned(),
        table: sales,
    });

    View::Dashboard { components }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::connector::mock_sales;
    use crate::error::ConnectorError;
    use crate::table::Cell;

    /// Scripted data source.
    struct FakeSource {
        reachable: bool,
        sales: Table,
        close_fails: bool,
        connects: AtomicUsize,
        fetches: AtomicUsize,
        closes: AtomicUsize,
    }

    impl FakeSource {
        fn new(reachable: bool, sales: Table, close_fails: bool) -> Self {
            Self {
                reachable,
                sales,
                close_fails,
                connects: AtomicUsize::new(0),
                fetches: AtomicUsize::new(0),
                closes: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DataSource for FakeSource {
        type Handle = ();

        async fn connect(&self) -> Option<()> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            self.reachable.then_some(())
        }

        async fn sales_data(&self, handle: Option<&()>) -> Table {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match handle {
                Some(()) => self.sales.clone(),
                None => Table::empty(),
            }
        }

        async fn customer_data(&self, _handle: Option<&()>) -> Table {
            Table::empty()
        }

        async fn close(&self, _handle: ()) -> Result<(), ConnectorError> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            if self.close_fails {
                Err(ConnectorError::Close(std::io::Error::other("Close failed")))
            } else {
                Ok(())
            }
        }
    }

    fn user() -> CurrentUser {
        CurrentUser::new("testuser")
    }

    fn kinds(view: &View) -> Vec<NoticeKind> {
        view.notices().iter().map(|n| n.kind).collect()
    }

    #[tokio::test]
    async fn test_no_user() {
        let source = FakeSource::new(true, mock_sales(), false);
        let view = build(None, &source).await;

        assert_eq!(
            view,
            View::Error {
                message: "Error: No user context provided.".to_owned()
            }
        );
        assert_eq!(source.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_success_shows_table_verbatim() {
        let source = FakeSource::new(true, mock_sales(), false);
        let view = build(Some(&user()), &source).await;

        assert_eq!(kinds(&view), vec![NoticeKind::Success]);
        assert!(view.notices()[0].message.contains("Successfully connected"));
        assert_eq!(view.table(), Some(&mock_sales()));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(source.closes.load(Ordering::SeqCst), 1);

        let View::Dashboard { components } = &view else {
            panic!("expected dashboard");
        };
        assert_eq!(
            components[0],
            Component::Heading {
                text: "Sales Dashboard for testuser".to_owned()
            }
        );
        assert!(matches!(
            components.last(),
            Some(Component::Table { name, .. }) if name == SALES_TABLE
        ));
    }

    #[tokio::test]
    async fn test_unreachable_source() {
        let source = FakeSource::new(false, mock_sales(), false);
        let view = build(Some(&user()), &source).await;

        assert_eq!(kinds(&view), vec![NoticeKind::Danger]);
        assert!(view.notices()[0].message.contains("Could not connect to SAP HANA"));
        assert!(view.table().unwrap().is_empty());
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
        assert_eq!(source.closes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_fetch_warns() {
        let source = FakeSource::new(true, Table::with_columns(["OrderID"]), false);
        let view = build(Some(&user()), &source).await;

        assert_eq!(kinds(&view), vec![NoticeKind::Success, NoticeKind::Warning]);
        assert!(view.notices()[1].message.contains("No sales data available"));
        assert_eq!(view.table(), Some(&Table::empty()));
        assert_eq!(source.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_close_failure_still_renders() {
        let mut sales = Table::with_columns(["Sales", "Product"]);
        sales.push_row([Cell::Int(100), Cell::from("A")]);
        sales.push_row([Cell::Int(200), Cell::from("B")]);

        let source = FakeSource::new(true, sales.clone(), true);
        let view = build(Some(&user()), &source).await;

        assert_eq!(kinds(&view), vec![NoticeKind::Success, NoticeKind::Warning]);
        assert_eq!(
            view.notices()[1].message,
            "Warning: Could not close SAP HANA connection: Close failed"
        );
        assert_eq!(view.table(), Some(&sales));
    }
}
