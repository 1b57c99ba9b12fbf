//! Query execution façade.
//!
//! `QueryExecutor` decouples "have a place to run SQL" from "manage the
//! connection lifecycle" for simpler call sites. It owns one
//! `EncryptedConnection` and adds no state of its own; the lazy-open step
//! lives in the connection.

use rusqlite::types::Value;
use rusqlite::ToSql;

use crate::error::Result;
use crate::storage::config::ConnectionConfig;
use crate::storage::connection::EncryptedConnection;

/// Thin façade over an `EncryptedConnection` for running parameterized
/// statements with auto-commit semantics.
pub struct QueryExecutor {
    conn: EncryptedConnection,
}

impl QueryExecutor {
    /// Create an executor over a fresh, unopened connection.
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            conn: EncryptedConnection::new(config),
        }
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: EncryptedConnection) -> Self {
        Self { conn }
    }

    /// Run a statement, opening the store first if needed.
    ///
    /// Returns the number of rows affected.
    pub fn run(&mut self, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
        self.conn.execute(sql, params)
    }

    /// Run a query and return all result rows.
    pub fn fetch(&mut self, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Vec<Value>>> {
        self.conn.query(sql, params)
    }

    /// Close the underlying connection (idempotent).
    pub fn close(&mut self) -> Result<()> {
        self.conn.close()
    }
}
