//! Error types for Strongbox core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level and carry enough context to
//! distinguish "wrong password" from "corrupt store" from "I/O failure".
//! No error is silently swallowed and nothing is retried automatically;
//! retry policy belongs to the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Strongbox operations.
pub type Result<T> = std::result::Result<T, StrongboxError>;

/// Core error type for Strongbox operations.
#[derive(Debug, Error)]
pub enum StrongboxError {
    /// Salt artifact could not be read or written
    #[error("Salt I/O error at {path}: {source}")]
    SaltIo {
        /// Path of the salt artifact involved
        path: PathBuf,
        /// Underlying filesystem error
        #[source]
        source: std::io::Error,
    },

    /// Derived key does not match the store's existing encrypted content.
    ///
    /// SQLCipher reports this lazily: `open` succeeds and the first real
    /// read fails. Callers should treat a first-query failure as a possible
    /// wrong-password signal rather than assuming a corrupt database.
    #[error("Authentication failed: key does not match existing encrypted content")]
    Authentication,

    /// Malformed statement or constraint violation; connection state is
    /// unaffected
    #[error("Query error: {source}")]
    Query {
        /// Underlying SQLite error
        #[source]
        source: rusqlite::Error,
    },

    /// Operation attempted after `close` (programmer error)
    #[error("Connection is closed")]
    ConnectionClosed,

    /// Invalid configuration or user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Key derivation or engine bootstrap error
    #[error("Encryption error: {0}")]
    Crypto(String),
}
