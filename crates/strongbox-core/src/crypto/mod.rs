//! Cryptographic operations for Strongbox.
//!
//! This module provides the two pieces of the key lifecycle that sit in
//! front of the storage engine:
//! - **salt**: create-or-load lifecycle for the per-database random salt
//! - **key**: PBKDF2-HMAC-SHA256 derivation of the encryption key
//!
//! ## Security Model
//!
//! - The salt is the only persisted secret-adjacent artifact; the password
//!   and the derived key never touch disk
//! - Same password + salt always re-derives the same key (deterministic)
//! - Key material is zeroized from memory on drop
//! - Derivation is never cached; every connection open pays one KDF pass so
//!   that key material does not linger longer than necessary

pub mod key;
pub mod salt;

pub use key::{derive_key, DerivedKey, DEFAULT_KDF_ITERATIONS, MIN_SALT_LENGTH};
pub use salt::{resolve_salt, salt_path_for, DEFAULT_SALT_SIZE};
