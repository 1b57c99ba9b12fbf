//! # Strongbox Core
//!
//! Core library for Strongbox - transparent encryption-at-rest for a local
//! SQLite database holding sensitive assistant state (credentials, device
//! configuration, history).
//!
//! This crate provides the salt/key lifecycle and the encrypted-connection
//! bootstrap, independent of any CLI or process-supervision layer.
//!
//! ## Architecture
//!
//! - **crypto**: salt lifecycle and password-based key derivation
//! - **storage**: encrypted connection state machine and query façade
//!
//! ## Security Model
//!
//! - The password is supplied by the user at open time and never persisted
//! - A random salt is generated once per database file and stored beside it
//! - The encryption key is re-derived on every connection open (PBKDF2) and
//!   zeroized as soon as it has been handed to the storage engine
//! - The SQLCipher engine applies its own internal KDF pass to the derived
//!   key as defense-in-depth
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the encrypted database file
//! - Offline brute-force attacks on the password
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session / process memory

pub mod crypto;
pub mod error;
pub mod storage;

pub use crypto::{derive_key, resolve_salt, salt_path_for, DerivedKey};
pub use error::{Result, StrongboxError};
pub use storage::{
    CipherKdfAlgorithm, ConnectionConfig, EncryptedConnection, HmacAlgorithm, QueryExecutor,
};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
