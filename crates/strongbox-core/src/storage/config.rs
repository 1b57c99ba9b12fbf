//! Connection configuration.
//!
//! `ConnectionConfig` carries everything needed to bootstrap an encrypted
//! connection: the database path, the password, and the key-derivation and
//! engine-hardening parameters. Values are immutable once the connection
//! starts opening; overrides happen at construction time.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use crate::crypto::key::DEFAULT_KDF_ITERATIONS;
use crate::crypto::salt::DEFAULT_SALT_SIZE;
use crate::error::{Result, StrongboxError};

/// Default page size for the encrypted store, in bytes.
pub const DEFAULT_PAGE_SIZE: u32 = 4096;

/// Default iteration count for the engine's internal KDF pass.
///
/// Independent of the outer KDF's iteration count: the engine applies its
/// own KDF to the already-derived key material as defense-in-depth.
pub const DEFAULT_CIPHER_KDF_ITERATIONS: u32 = 64_000;

/// HMAC algorithm used by the storage engine for page authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HmacAlgorithm {
    /// HMAC-SHA1 (legacy)
    HmacSha1,
    /// HMAC-SHA256 (default)
    HmacSha256,
    /// HMAC-SHA512
    HmacSha512,
}

impl HmacAlgorithm {
    /// Value accepted by the engine's `cipher_hmac_algorithm` pragma.
    pub fn pragma_value(self) -> &'static str {
        match self {
            HmacAlgorithm::HmacSha1 => "HMAC_SHA1",
            HmacAlgorithm::HmacSha256 => "HMAC_SHA256",
            HmacAlgorithm::HmacSha512 => "HMAC_SHA512",
        }
    }
}

/// KDF algorithm used internally by the storage engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherKdfAlgorithm {
    /// PBKDF2-HMAC-SHA1 (legacy)
    Pbkdf2HmacSha1,
    /// PBKDF2-HMAC-SHA256 (default)
    Pbkdf2HmacSha256,
    /// PBKDF2-HMAC-SHA512
    Pbkdf2HmacSha512,
}

impl CipherKdfAlgorithm {
    /// Value accepted by the engine's `cipher_kdf_algorithm` pragma.
    pub fn pragma_value(self) -> &'static str {
        match self {
            CipherKdfAlgorithm::Pbkdf2HmacSha1 => "PBKDF2_HMAC_SHA1",
            CipherKdfAlgorithm::Pbkdf2HmacSha256 => "PBKDF2_HMAC_SHA256",
            CipherKdfAlgorithm::Pbkdf2HmacSha512 => "PBKDF2_HMAC_SHA512",
        }
    }
}

/// Immutable parameters for one encrypted connection.
#[derive(Clone)]
pub struct ConnectionConfig {
    /// Path to the database file (may not exist yet)
    pub path: PathBuf,
    /// User-supplied password (never logged or serialized)
    password: SecretString,
    /// Salt length in bytes
    pub salt_size: usize,
    /// Outer PBKDF2 iteration count for key derivation
    pub kdf_iterations: u32,
    /// Encrypted store page size in bytes
    pub page_size: u32,
    /// HMAC algorithm for page authentication
    pub hmac_algorithm: HmacAlgorithm,
    /// KDF algorithm the engine applies internally
    pub cipher_kdf_algorithm: CipherKdfAlgorithm,
    /// Iteration count for the engine's internal KDF pass
    pub cipher_kdf_iterations: u32,
}

impl ConnectionConfig {
    /// Create a configuration with the default hardening parameters.
    pub fn new(path: impl AsRef<Path>, password: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            password: SecretString::from(password.into()),
            salt_size: DEFAULT_SALT_SIZE,
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
            page_size: DEFAULT_PAGE_SIZE,
            hmac_algorithm: HmacAlgorithm::HmacSha256,
            cipher_kdf_algorithm: CipherKdfAlgorithm::Pbkdf2HmacSha256,
            cipher_kdf_iterations: DEFAULT_CIPHER_KDF_ITERATIONS,
        }
    }

    /// Override the salt size.
    pub fn with_salt_size(mut self, salt_size: usize) -> Self {
        self.salt_size = salt_size;
        self
    }

    /// Override the outer KDF iteration count.
    pub fn with_kdf_iterations(mut self, iterations: u32) -> Self {
        self.kdf_iterations = iterations;
        self
    }

    /// Override the store page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Override the HMAC algorithm.
    pub fn with_hmac_algorithm(mut self, algorithm: HmacAlgorithm) -> Self {
        self.hmac_algorithm = algorithm;
        self
    }

    /// Override the engine's internal KDF algorithm.
    pub fn with_cipher_kdf_algorithm(mut self, algorithm: CipherKdfAlgorithm) -> Self {
        self.cipher_kdf_algorithm = algorithm;
        self
    }

    /// Override the engine's internal KDF iteration count.
    pub fn with_cipher_kdf_iterations(mut self, iterations: u32) -> Self {
        self.cipher_kdf_iterations = iterations;
        self
    }

    /// Access the password for key derivation.
    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    /// Check the configuration before bootstrap.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidInput` if the salt size is below the
    /// minimum, an iteration count is zero, or the page size is not a power
    /// of two in the engine's accepted range (512..=65536).
    pub(crate) fn validate(&self) -> Result<()> {
        if self.salt_size < crate::crypto::key::MIN_SALT_LENGTH {
            return Err(StrongboxError::InvalidInput(format!(
                "Salt size must be at least {} bytes (got {})",
                crate::crypto::key::MIN_SALT_LENGTH,
                self.salt_size
            )));
        }

        if self.kdf_iterations == 0 || self.cipher_kdf_iterations == 0 {
            return Err(StrongboxError::InvalidInput(
                "KDF iteration counts must be non-zero".to_string(),
            ));
        }

        if !self.page_size.is_power_of_two() || !(512..=65_536).contains(&self.page_size) {
            return Err(StrongboxError::InvalidInput(format!(
                "Page size must be a power of two between 512 and 65536 (got {})",
                self.page_size
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("path", &self.path)
            .field("password", &"[REDACTED]")
            .field("salt_size", &self.salt_size)
            .field("kdf_iterations", &self.kdf_iterations)
            .field("page_size", &self.page_size)
            .field("hmac_algorithm", &self.hmac_algorithm)
            .field("cipher_kdf_algorithm", &self.cipher_kdf_algorithm)
            .field("cipher_kdf_iterations", &self.cipher_kdf_iterations)
            .finish()
    }
}
