//! Encrypted storage for Strongbox.
//!
//! This module owns the lifecycle of a single SQLCipher session:
//! - **config**: immutable connection parameters and hardening settings
//! - **connection**: the `Unopened -> Open -> Closed` state machine that
//!   bootstraps the engine with the derived key
//! - **executor**: a thin façade for call sites that only need "run SQL"
//!
//! ## Security
//!
//! The storage layer is responsible for:
//! - Applying the derived key before any other statement
//! - Applying hardening pragmas (page size, HMAC, internal KDF) before the
//!   engine first validates the key against existing content
//! - Never exposing a handle that has not completed key initialization

pub mod config;
pub mod connection;
pub mod executor;

// Re-export public types
pub use config::{CipherKdfAlgorithm, ConnectionConfig, HmacAlgorithm};
pub use connection::EncryptedConnection;
pub use executor::QueryExecutor;
