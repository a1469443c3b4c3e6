//! SAP HANA data connector.
//!
//! Connection settings come from four environment variables:
//!
//! | Variable        | Meaning                        |
//! |-----------------|--------------------------------|
//! | `HANA_ADDRESS`  | Host name or IP of the instance |
//! | `HANA_PORT`     | SQL port, must be an integer    |
//! | `HANA_USER`     | Login user                      |
//! | `HANA_PASSWORD` | Login password                  |
//!
//! Connecting opens a TCP connection to the instance. Queries are not issued:
//! the data accessors return fixed mock tables whenever a handle is present.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::error::ConnectorError;
use crate::table::{Cell, Table};

pub const HANA_ADDRESS: &str = "HANA_ADDRESS";
pub const HANA_PORT: &str = "HANA_PORT";
pub const HANA_USER: &str = "HANA_USER";
pub const HANA_PASSWORD: &str = "HANA_PASSWORD";

/// A source of dashboard tables.
///
/// Connecting never fails loudly: an unusable source yields `None` and the
/// reason is logged. Data accessors return an empty table without a handle.
#[async_trait]
pub trait DataSource: Send + Sync {
    type Handle: Send + Sync;

    async fn connect(&self) -> Option<Self::Handle>;

    async fn sales_data(&self, handle: Option<&Self::Handle>) -> Table;

    async fn customer_data(&self, handle: Option<&Self::Handle>) -> Table;

    /// Releases the handle.
    async fn close(&self, handle: Self::Handle) -> Result<(), ConnectorError>;
}

/// Validated HANA connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub address: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ConnectionParams {
    /// Reads the settings through `lookup`. Unset and empty values both count
    /// as missing; the port is only parsed once all four are present.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConnectorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConnectorError::MissingConfig(name))
        };

        let address = required(HANA_ADDRESS)?;
        let port = required(HANA_PORT)?;
        let user = required(HANA_USER)?;
        let password = required(HANA_PASSWORD)?;

        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConnectorError::InvalidPort(port.clone()))?;

        Ok(Self {
            address,
            port,
            user,
            password,
        })
    }

    fn socket_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// An open connection to a HANA instance.
#[derive(Debug)]
pub struct HanaConnection {
    stream: TcpStream,
    user: String,
}

impl HanaConnection {
    /// The user the connection was opened for.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Closes the connection.
    pub async fn close(mut self) -> Result<(), ConnectorError> {
        self.stream
            .shutdown()
            .await
            .map_err(ConnectorError::Close)?;
        tracing::info!("SAP HANA connection closed");
        Ok(())
    }
}

/// Where [`HanaConnector`] reads its settings from.
type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// The HANA-backed [`DataSource`].
///
/// Settings are read on every connect, matching how the dashboard is rebuilt
/// per request. [`HanaConnector::new`] reads the process environment.
#[derive(Clone)]
pub struct HanaConnector {
    lookup: Lookup,
}

impl std::fmt::Debug for HanaConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HanaConnector").finish_non_exhaustive()
    }
}

impl Default for HanaConnector {
    fn default() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }
}

impl HanaConnector {
    /// A connector that reads `HANA_*` from the process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// A connector that resolves `HANA_*` settings through `lookup`.
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
        }
    }

    /// Opens a connection with explicit settings.
    pub async fn connect_with(params: &ConnectionParams) -> Result<HanaConnection, ConnectorError> {
        let address = params.socket_address();
        let stream = TcpStream::connect(&address)
            .await
            .map_err(|source| ConnectorError::Connect {
                address: address.clone(),
                source,
            })?;

        tracing::info!(%address, user = %params.user, "connected to SAP HANA");
        Ok(HanaConnection {
            stream,
            user: params.user.clone(),
        })
    }
}

#[async_trait]
impl DataSource for HanaConnector {
    type Handle = HanaConnection;

    async fn connect(&self) -> Option<HanaConnection> {
        let params = match ConnectionParams::from_lookup(|name| (self.lookup)(name)) {
            Ok(params) => params,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "set {HANA_ADDRESS}, {HANA_PORT}, {HANA_USER} and {HANA_PASSWORD} to connect"
                );
                return None;
            }
        };

        match Self::connect_with(&params).await {
            Ok(conn) => Some(conn),
            Err(e) => {
                tracing::error!(error = %e, "error connecting to SAP HANA");
                None
            }
        }
    }

    async fn sales_data(&self, handle: Option<&HanaConnection>) -> Table {
        if handle.is_none() {
            tracing::error!("no SAP HANA connection provided for sales data");
            return Table::empty();
        }
        tracing::debug!("returning mock sales data");
        mock_sales()
    }

    async fn customer_data(&self, handle: Option<&HanaConnection>) -> Table {
        if handle.is_none() {
            tracing::error!("no SAP HANA connection provided for customer data");
            return Table::empty();
        }
        tracing::debug!("returning mock customer data");
        mock_customers()
    }

    async fn close(&self, handle: HanaConnection) -> Result<(), ConnectorError> {
        handle.close().await
    }
}

/// Five fixed sales orders.
pub fn mock_sales() -> Table {
    let mut table = Table::with_columns(["OrderID", "Product", "Quantity", "Price"]);
    let rows: [(i64, &str, i64, i64); 5] = [
        (1, "Laptop", 1, 1200),
        (2, "Mouse", 2, 25),
        (3, "Keyboard", 1, 75),
        (4, "Monitor", 1, 300),
        (5, "Webcam", 3, 50),
    ];
    for (id, product, quantity, price) in rows {
        table.push_row([
            Cell::from(id),
            Cell::from(product),
            Cell::from(quantity),
            Cell::from(price),
        ]);
    }
    table
}

/// Five fixed customers.
pub fn mock_customers() -> Table {
    let mut table = Table::with_columns(["CustomerID", "Name", "Segment"]);
    let rows: [(i64, &str, &str); 5] = [
        (101, "Alice Smith", "Retail"),
        (102, "Bob Johnson", "Wholesale"),
        (103, "Charlie Brown", "Retail"),
        (104, "Diana Prince", "Corporate"),
        (105, "Edward King", "Retail"),
    ];
    for (id, name, segment) in rows {
        table.push_row([Cell::from(id), Cell::from(name), Cell::from(segment)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tokio::net::TcpListener;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_vars(port: &str) -> HashMap<String, String> {
        vars(&[
            (HANA_ADDRESS, "127.0.0.1"),
            (HANA_PORT, port),
            (HANA_USER, "user"),
            (HANA_PASSWORD, "secret"),
        ])
    }

    #[test]
    fn test_params_from_lookup() {
        let env = full_vars("30015");
        let params = ConnectionParams::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(params.address, "127.0.0.1");
        assert_eq!(params.port, 30015);
        assert_eq!(params.user, "user");
        assert!(!format!("{params:?}").contains("secret"));
    }

    #[test]
    fn test_missing_variable() {
        let mut env = full_vars("30015");
        env.remove(HANA_USER);
        let err = ConnectionParams::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConnectorError::MissingConfig(HANA_USER)));
    }

    #[test]
    fn test_empty_variable_counts_as_missing() {
        let mut env = full_vars("30015");
        env.insert(HANA_PASSWORD.to_owned(), String::new());
        let err = ConnectionParams::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConnectorError::MissingConfig(HANA_PASSWORD)));
    }

    #[test]
    fn test_invalid_port() {
        let env = full_vars("not_a_number");
        let err = ConnectionParams::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidPort(ref p) if p == "not_a_number"));

        let env = full_vars("70000");
        assert!(ConnectionParams::from_lookup(|k| env.get(k).cloned()).is_err());
    }

    #[tokio::test]
    async fn test_connect_and_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port().to_string();
        let env = full_vars(&port);
        let params = ConnectionParams::from_lookup(|k| env.get(k).cloned()).unwrap();

        let conn = HanaConnector::connect_with(&params).await.unwrap();
        assert_eq!(conn.user(), "user");
        let _accepted = listener.accept().await.unwrap();
        conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_refused() {
        // bind then drop to get a port nothing listens on
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port().to_string()
        };
        let env = full_vars(&port);
        let params = ConnectionParams::from_lookup(|k| env.get(k).cloned()).unwrap();

        let err = HanaConnector::connect_with(&params).await.unwrap_err();
        assert!(matches!(err, ConnectorError::Connect { .. }));
    }

    #[tokio::test]
    async fn test_connect_without_settings_is_absent() {
        let connector = HanaConnector::with_lookup(|_| None);
        assert!(connector.connect().await.is_none());
    }

    #[tokio::test]
    async fn test_connect_with_bad_port_is_absent() {
        let env = full_vars("not_a_number");
        let connector = HanaConnector::with_lookup(move |k| env.get(k).cloned());
        assert!(connector.connect().await.is_none());
    }

    #[tokio::test]
    async fn test_connect_through_lookup() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let env = full_vars(&listener.local_addr().unwrap().port().to_string());
        let connector = HanaConnector::with_lookup(move |k| env.get(k).cloned());

        let conn = connector.connect().await.unwrap();
        let _accepted = listener.accept().await.unwrap();
        assert_eq!(connector.sales_data(Some(&conn)).await, mock_sales());
        assert_eq!(connector.customer_data(Some(&conn)).await, mock_customers());
        connector.close(conn).await.unwrap();
    }

    #[tokio::test]
    async fn test_no_handle_gives_empty_tables() {
        let connector = HanaConnector::new();
        assert!(connector.sales_data(None).await.is_empty());
        assert!(connector.customer_data(None).await.is_empty());
    }

    #[test]
    fn test_mock_tables() {
        let sales = mock_sales();
        assert_eq!(sales.columns(), ["OrderID", "Product", "Quantity", "Price"]);
        assert_eq!(sales.len(), 5);
        assert_eq!(
            sales.rows()[0],
            vec![Cell::Int(1), Cell::from("Laptop"), Cell::Int(1), Cell::Int(1200)]
        );

        let customers = mock_customers();
        assert_eq!(customers.columns(), ["CustomerID", "Name", "Segment"]);
        assert_eq!(customers.len(), 5);
        assert_eq!(customers.rows()[3][2], Cell::from("Corporate"));
    }
}
