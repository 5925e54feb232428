//! Query execution seam.
//!
//! [`QueryExecutor`] abstracts database execution so the table composer and the
//! schema inspectors work against any backend that can run a built statement and
//! hand back rows as JSON records. [`PostgresExecutor`] is the `may_postgres`
//! implementation; tests substitute recording mocks.

use crate::config::Settings;
use crate::connection::{self, check_connection_health};
use crate::error::{Result, TableError};
use crate::query::value_conversion::with_converted_params;
use crate::row::row_to_record;
use may_postgres::Client;
use sea_query::Values;
use std::time::Instant;

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// A single result row, keyed by column name in select order.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Trait for executing read queries
///
/// Implementations receive SQL built by `sea_query` (Postgres placeholders) together
/// with its bound values and return every row as a [`Record`].
pub trait QueryExecutor {
    /// Execute a query and return all rows
    ///
    /// # Errors
    ///
    /// Returns `TableError` if the query execution or row decoding fails.
    fn query_records(&self, sql: &str, values: &Values) -> Result<Vec<Record>>;
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &E {
    fn query_records(&self, sql: &str, values: &Values) -> Result<Vec<Record>> {
        (**self).query_records(sql, values)
    }
}

/// `QueryExecutor` over a `may_postgres::Client`
pub struct PostgresExecutor {
    client: Client,
}

impl PostgresExecutor {
    /// Create a new executor from a `may_postgres::Client`
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using a connection string and wrap the client
    ///
    /// # Errors
    ///
    /// Returns `TableError::Connection` if the string is malformed or the server
    /// cannot be reached.
    pub fn connect(connection_string: &str) -> Result<Self> {
        connection::connect(connection_string).map(Self::new)
    }

    /// Connect to `settings.database.url`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::connect(&settings.database.url)
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Consume the executor and return the underlying client
    pub fn into_client(self) -> Client {
        self.client
    }

    /// Check if the underlying connection is healthy (`SELECT 1`)
    pub fn check_health(&self) -> Result<bool> {
        check_connection_health(&self.client)
    }
}

impl QueryExecutor for PostgresExecutor {
    fn query_records(&self, sql: &str, values: &Values) -> Result<Vec<Record>> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::execute_query_span(sql).entered();

        log::debug!("executing: {sql}");
        let start = Instant::now();
        let result = with_converted_params(values, |params| {
            let rows = self.client.query(sql, params).map_err(TableError::Postgres)?;
            rows.iter().map(row_to_record).collect()
        });

        let elapsed = start.elapsed();
        log::trace!("query finished in {elapsed:?}");
        #[cfg(feature = "metrics")]
        {
            METRICS.record_query(elapsed);
            if result.is_err() {
                METRICS.record_query_error();
            }
        }

        result
    }
}
