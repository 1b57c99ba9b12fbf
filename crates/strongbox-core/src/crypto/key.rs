//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! This module derives the database encryption key from the user's password
//! and the per-database salt. The output is handed to the storage engine as
//! textual key material; the engine then applies its own internal KDF pass
//! on top (see `storage::connection`).

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::error::{Result, StrongboxError};

/// Default PBKDF2 iteration count for the outer key derivation.
pub const DEFAULT_KDF_ITERATIONS: u32 = 100_000;

/// Minimum accepted salt length in bytes.
pub const MIN_SALT_LENGTH: usize = 16;

/// Length of derived key in bytes (32 bytes = 256 bits).
const KEY_LENGTH: usize = 32;

/// A cryptographic key derived from a password.
///
/// This type ensures that key material is securely zeroized from memory
/// when dropped, reducing the window of exposure.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    /// The raw key bytes (zeroized on drop)
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Create a new DerivedKey from raw bytes.
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate
    /// key-application operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Encode the key as lowercase hex for engines whose key pragma expects
    /// textual key material.
    ///
    /// The returned buffer is zeroized when dropped; hand it to the engine
    /// immediately and let it go out of scope.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.key))
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive an encryption key from a password using PBKDF2-HMAC-SHA256.
///
/// # Arguments
///
/// * `password` - The password to derive from
/// * `salt` - Random salt (must be unique per database file)
/// * `iterations` - PBKDF2 iteration count
///
/// # Returns
///
/// Returns a `DerivedKey` suitable for keying the storage engine.
///
/// # Security
///
/// - Same password + salt + iterations always produces the same key
/// - Results are never cached or memoized; repeated calls re-derive so that
///   key material does not outlive the connection open that needed it
///
/// # Examples
///
/// ```
/// use strongbox_core::crypto::derive_key;
///
/// let salt = b"unique-salt-16-bytes-minimum";
/// let key = derive_key("my-password", salt, 100_000).unwrap();
/// // Hand key to the storage engine...
/// ```
pub fn derive_key(password: &str, salt: &[u8], iterations: u32) -> Result<DerivedKey> {
    if password.is_empty() {
        return Err(StrongboxError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    if salt.len() < MIN_SALT_LENGTH {
        return Err(StrongboxError::InvalidInput(format!(
            "Salt must be at least {} bytes (got {})",
            MIN_SALT_LENGTH,
            salt.len()
        )));
    }

    if iterations == 0 {
        return Err(StrongboxError::InvalidInput(
            "KDF iteration count must be non-zero".to_string(),
        ));
    }

    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key_bytes);

    Ok(DerivedKey::from_bytes(key_bytes))
}
