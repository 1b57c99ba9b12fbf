//! Encrypted connection state machine.
//!
//! `EncryptedConnection` owns one live handle to the SQLCipher store and
//! walks a strict `Unopened -> Open -> Closed` lifecycle. There is no way
//! back from `Closed`; construct a new instance to reopen.
//!
//! Bootstrap order matters: the key pragma must be the first statement the
//! engine sees, and the hardening pragmas must follow before the engine
//! first validates the key against existing content. A wrong password is
//! therefore detected lazily, on the first real read, not at open time.

use rusqlite::types::Value;
use rusqlite::{Connection, ErrorCode, ToSql};
use secrecy::ExposeSecret;
use zeroize::Zeroizing;

use crate::crypto::key::{derive_key, DerivedKey};
use crate::crypto::salt::resolve_salt;
use crate::error::{Result, StrongboxError};
use crate::storage::config::ConnectionConfig;

/// Lifecycle state of the underlying store handle.
enum State {
    /// Constructed, nothing touched on disk yet
    Unopened,
    /// Key applied, hardening pragmas set, handle live
    Open(Connection),
    /// Handle released (or bootstrap failed); terminal
    Closed,
}

/// A single encrypted-store session.
///
/// Exclusively owns the underlying handle and guarantees its release on
/// every exit path, including bootstrap failure. Callers must serialize
/// access; the type makes no reentrancy guarantees.
pub struct EncryptedConnection {
    config: ConnectionConfig,
    state: State,
}

impl EncryptedConnection {
    /// Create a connection in the `Unopened` state.
    ///
    /// No filesystem or engine work happens until `open` (explicit) or the
    /// first `execute`/`query` (lazy).
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            state: State::Unopened,
        }
    }

    /// Whether the underlying handle is currently live.
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    /// Open the encrypted store.
    ///
    /// Valid only from `Unopened`. Resolves the salt, derives the key,
    /// opens the store and applies the key and hardening pragmas in fixed
    /// order. Any step failing rolls the instance to `Closed`; a partially
    /// initialized handle is never left reachable.
    ///
    /// # Errors
    ///
    /// - `StrongboxError::SaltIo` if the salt artifact cannot be resolved
    /// - `StrongboxError::InvalidInput` for bad configuration values, or if
    ///   the connection is already open
    /// - `StrongboxError::ConnectionClosed` if called after `close`
    /// - `StrongboxError::Crypto` if the engine bootstrap itself fails
    ///
    /// A wrong password does NOT fail here; it surfaces as
    /// `StrongboxError::Authentication` on the first subsequent statement.
    pub fn open(&mut self) -> Result<()> {
        match self.state {
            State::Unopened => {}
            State::Open(_) => {
                return Err(StrongboxError::InvalidInput(
                    "Connection is already open".to_string(),
                ))
            }
            State::Closed => return Err(StrongboxError::ConnectionClosed),
        }

        // Fail into Closed so a bootstrap error never leaves a partially
        // initialized handle behind.
        self.state = State::Closed;
        let conn = Self::bootstrap(&self.config)?;
        self.state = State::Open(conn);
        Ok(())
    }

    /// Execute a statement with auto-commit semantics.
    ///
    /// Opens the store first if the connection is still `Unopened`.
    ///
    /// # Returns
    ///
    /// The number of rows affected.
    ///
    /// # Errors
    ///
    /// - `StrongboxError::Authentication` if the derived key does not match
    ///   the store's existing content (typically the first statement after
    ///   reopening with a wrong password)
    /// - `StrongboxError::Query` for malformed SQL or constraint
    ///   violations; the connection remains usable
    /// - `StrongboxError::ConnectionClosed` after `close`
    pub fn execute(&mut self, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
        self.ensure_open()?;
        let State::Open(conn) = &self.state else {
            return Err(StrongboxError::ConnectionClosed);
        };

        conn.execute(sql, params).map_err(map_engine_error)
    }

    /// Run a query and materialize all result rows.
    ///
    /// Same lifecycle rules as `execute`.
    pub fn query(&mut self, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Vec<Value>>> {
        self.ensure_open()?;
        let State::Open(conn) = &self.state else {
            return Err(StrongboxError::ConnectionClosed);
        };

        let mut stmt = conn.prepare(sql).map_err(map_engine_error)?;
        let column_count = stmt.column_count();

        let mut rows = stmt.query(params).map_err(map_engine_error)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(map_engine_error)? {
            let mut values = Vec::with_capacity(column_count);
            for index in 0..column_count {
                values.push(row.get::<_, Value>(index).map_err(map_engine_error)?);
            }
            out.push(values);
        }

        Ok(out)
    }

    /// Release the underlying store handle.
    ///
    /// Idempotent: closing an already-closed or never-opened connection is
    /// a no-op. `Closed` is terminal.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Open(conn) => conn.close().map_err(|(_, source)| {
                StrongboxError::Crypto(format!("Failed to release encrypted store: {}", source))
            }),
            State::Unopened | State::Closed => Ok(()),
        }
    }

    /// Idempotent precondition check: open lazily if still `Unopened`.
    fn ensure_open(&mut self) -> Result<()> {
        match self.state {
            State::Open(_) => Ok(()),
            State::Unopened => self.open(),
            State::Closed => Err(StrongboxError::ConnectionClosed),
        }
    }

    /// Resolve salt, derive key, open the store and key it.
    fn bootstrap(config: &ConnectionConfig) -> Result<Connection> {
        config.validate()?;

        let salt = resolve_salt(&config.path, config.salt_size)?;
        let key = derive_key(
            config.password().expose_secret(),
            &salt,
            config.kdf_iterations,
        )?;

        let conn = Connection::open(&config.path).map_err(|e| {
            StrongboxError::Crypto(format!("Failed to open encrypted store: {}", e))
        })?;

        Self::apply_key(&conn, &key)?;
        Self::apply_hardening(&conn, config)?;

        Ok(conn)
    }

    /// Apply the derived key. Must be the first statement on the handle,
    /// exactly once.
    fn apply_key(conn: &Connection, key: &DerivedKey) -> Result<()> {
        // Textual key material: the engine runs its own internal KDF pass
        // over it, so the raw derived key never keys pages directly.
        let pragma = Zeroizing::new(format!("PRAGMA key = '{}';", key.to_hex().as_str()));
        conn.execute_batch(pragma.as_str())
            .map_err(|e| StrongboxError::Crypto(format!("Failed to apply key: {}", e)))
    }

    /// Apply hardening pragmas in fixed order: page size, HMAC algorithm,
    /// internal KDF algorithm, internal KDF iterations. These must all be
    /// set before the engine first validates the key against existing
    /// encrypted content.
    fn apply_hardening(conn: &Connection, config: &ConnectionConfig) -> Result<()> {
        let sql = format!(
            "PRAGMA cipher_page_size = {};\n\
             PRAGMA cipher_hmac_algorithm = {};\n\
             PRAGMA cipher_kdf_algorithm = {};\n\
             PRAGMA kdf_iter = {};",
            config.page_size,
            config.hmac_algorithm.pragma_value(),
            config.cipher_kdf_algorithm.pragma_value(),
            config.cipher_kdf_iterations,
        );

        conn.execute_batch(&sql).map_err(|e| {
            StrongboxError::Crypto(format!("Failed to apply hardening parameters: {}", e))
        })
    }
}

impl Drop for EncryptedConnection {
    fn drop(&mut self) {
        // Handle release on the failure path is best-effort
        let _ = self.close();
    }
}

/// Map an engine error from statement execution.
///
/// SQLCipher reports a key mismatch as "file is not a database" on the
/// first real read, which is the lazy wrong-password signal.
fn map_engine_error(source: rusqlite::Error) -> StrongboxError {
    match &source {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::NotADatabase => {
            StrongboxError::Authentication
        }
        _ => StrongboxError::Query { source },
    }
}
