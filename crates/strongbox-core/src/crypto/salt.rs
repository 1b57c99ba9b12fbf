//! Salt lifecycle: create-or-load of the per-database salt artifact.
//!
//! The salt is the only persisted secret-adjacent artifact. It lives beside
//! the database file (`<db_path>.salt`) as raw bytes with no header or
//! versioning, and is immutable once created for a given database file.
//!
//! Whether a salt gets generated is decided by the presence of the
//! *database file*, not the salt file: an existing database was encrypted
//! with one specific salt, and regenerating it would make that data
//! permanently unreadable. A salt file that is missing next to an existing
//! database is therefore surfaced as an I/O error, never papered over with
//! a fresh salt that would "work" but decrypt nothing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Result, StrongboxError};

/// Default salt size in bytes.
pub const DEFAULT_SALT_SIZE: usize = 16;

/// Path of the salt artifact belonging to a database file.
///
/// The suffix is appended to the full path (`state.db` -> `state.db.salt`)
/// so the two artifacts sort and travel together.
pub fn salt_path_for(db_path: &Path) -> PathBuf {
    let mut os = db_path.as_os_str().to_os_string();
    os.push(".salt");
    PathBuf::from(os)
}

/// Resolve the salt for a database file, creating it on first use.
///
/// # Arguments
///
/// * `db_path` - Path to the database file (may not exist yet)
/// * `salt_size` - Expected salt length in bytes
///
/// # Behavior
///
/// - Database file absent: generate `salt_size` bytes from the OS secure
///   random source, persist them at the sibling `.salt` path, return them.
///   This is the only case that writes to the filesystem.
/// - Database file present: read the existing salt verbatim and return it;
///   never regenerate. A missing or short salt artifact is an error.
///
/// # Errors
///
/// Returns `StrongboxError::SaltIo` if the artifact cannot be read or
/// written, or if an existing artifact's length does not match `salt_size`.
pub fn resolve_salt(db_path: &Path, salt_size: usize) -> Result<Vec<u8>> {
    let salt_path = salt_path_for(db_path);

    if db_path.exists() {
        let salt = fs::read(&salt_path).map_err(|source| StrongboxError::SaltIo {
            path: salt_path.clone(),
            source,
        })?;

        if salt.len() != salt_size {
            return Err(StrongboxError::SaltIo {
                path: salt_path,
                source: io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "salt artifact is {} bytes, expected {}",
                        salt.len(),
                        salt_size
                    ),
                ),
            });
        }

        return Ok(salt);
    }

    let mut salt = vec![0u8; salt_size];
    OsRng.fill_bytes(&mut salt);

    fs::write(&salt_path, &salt).map_err(|source| StrongboxError::SaltIo {
        path: salt_path,
        source,
    })?;

    Ok(salt)
}
