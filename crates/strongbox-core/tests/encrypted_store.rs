use std::fs;
use std::path::Path;

use rusqlite::types::Value;

use strongbox_core::crypto::salt_path_for;
use strongbox_core::{ConnectionConfig, EncryptedConnection, QueryExecutor, StrongboxError};

// Keep KDF costs low in tests; the lifecycle under test does not depend on
// the iteration counts, only on them being applied consistently.
fn config(path: &Path, password: &str) -> ConnectionConfig {
    ConnectionConfig::new(path, password)
        .with_kdf_iterations(1_000)
        .with_cipher_kdf_iterations(4_000)
}

#[test]
fn test_first_open_creates_salt_and_store() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("state.db");
    let salt_path = salt_path_for(&db_path);

    let mut conn = EncryptedConnection::new(config(&db_path, "password-one"));
    conn.execute("CREATE TABLE credentials (id INTEGER PRIMARY KEY, secret TEXT)", &[])
        .expect("first open should succeed");
    conn.close().expect("close should succeed");

    assert!(db_path.exists());
    assert!(salt_path.exists());

    let first_salt = fs::read(&salt_path).expect("salt should be readable");
    assert_eq!(first_salt.len(), 16);

    // Second open against the same path reuses the salt byte-for-byte
    let mut conn = EncryptedConnection::new(config(&db_path, "password-one"));
    conn.query("SELECT count(*) FROM credentials", &[])
        .expect("second open should succeed");
    conn.close().expect("close should succeed");

    let second_salt = fs::read(&salt_path).expect("salt should be readable");
    assert_eq!(first_salt, second_salt);
}

#[test]
fn test_write_close_reopen_read_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("state.db");
    let password = "round-trip-password";

    let mut executor = QueryExecutor::new(config(&db_path, password));
    executor
        .run("CREATE TABLE credentials (id INTEGER PRIMARY KEY, secret TEXT)", &[])
        .expect("create table should succeed");
    executor
        .run(
            "INSERT INTO credentials (secret) VALUES (?1)",
            &[&"api-token-123"],
        )
        .expect("insert should succeed");
    executor.close().expect("close should succeed");

    let mut executor = QueryExecutor::new(config(&db_path, password));
    let rows = executor
        .fetch("SELECT secret FROM credentials", &[])
        .expect("reopen with same password should read");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], Value::Text("api-token-123".to_string()));
}

#[test]
fn test_wrong_password_fails_on_first_query_not_open() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("state.db");

    let mut executor = QueryExecutor::new(config(&db_path, "correct-password"));
    executor
        .run("CREATE TABLE credentials (id INTEGER PRIMARY KEY, secret TEXT)", &[])
        .expect("create should succeed");
    executor.close().expect("close should succeed");

    // Wrong-password detection is lazy: open itself succeeds
    let mut conn = EncryptedConnection::new(config(&db_path, "wrong-password"));
    conn.open()
        .expect("open should succeed even with a wrong password");

    let result = conn.query("SELECT count(*) FROM credentials", &[]);
    assert!(
        matches!(result, Err(StrongboxError::Authentication)),
        "first query should signal authentication failure, got: {:?}",
        result
    );
}

#[test]
fn test_double_close_and_execute_after_close() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("state.db");

    let mut conn = EncryptedConnection::new(config(&db_path, "password-one"));
    conn.execute("CREATE TABLE credentials (id INTEGER PRIMARY KEY)", &[])
        .expect("open should succeed");

    conn.close().expect("first close should succeed");
    conn.close().expect("second close should be a no-op");

    let result = conn.execute("SELECT 1", &[]);
    assert!(matches!(result, Err(StrongboxError::ConnectionClosed)));
}

#[test]
fn test_deleted_salt_with_existing_store_fails_loudly() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("state.db");
    let salt_path = salt_path_for(&db_path);

    let mut executor = QueryExecutor::new(config(&db_path, "password-one"));
    executor
        .run("CREATE TABLE credentials (id INTEGER PRIMARY KEY)", &[])
        .expect("create should succeed");
    executor.close().expect("close should succeed");

    fs::remove_file(&salt_path).expect("salt removal should succeed");

    // The store file still exists, so a fresh salt must NOT be generated;
    // the open fails instead of silently producing an unreadable store.
    let mut conn = EncryptedConnection::new(config(&db_path, "password-one"));
    let result = conn.open();
    assert!(matches!(result, Err(StrongboxError::SaltIo { .. })));
    assert!(!salt_path.exists(), "no salt must be regenerated");
}

#[test]
fn test_reopen_uses_stable_key_for_multiple_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("state.db");
    let password = "stable-key-password";

    let mut executor = QueryExecutor::new(config(&db_path, password));
    executor
        .run("CREATE TABLE history (id INTEGER PRIMARY KEY, entry TEXT)", &[])
        .expect("create should succeed");
    executor.close().expect("close should succeed");

    for entry in ["first", "second", "third"] {
        let mut executor = QueryExecutor::new(config(&db_path, password));
        executor
            .run("INSERT INTO history (entry) VALUES (?1)", &[&entry])
            .expect("insert should succeed");
        executor.close().expect("close should succeed");
    }

    let mut executor = QueryExecutor::new(config(&db_path, password));
    let rows = executor
        .fetch("SELECT entry FROM history ORDER BY id", &[])
        .expect("select should succeed");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][0], Value::Text("first".to_string()));
    assert_eq!(rows[2][0], Value::Text("third".to_string()));
}

#[test]
fn test_store_file_is_not_plaintext() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("state.db");

    let mut executor = QueryExecutor::new(config(&db_path, "password-one"));
    executor
        .run("CREATE TABLE credentials (id INTEGER PRIMARY KEY, secret TEXT)", &[])
        .expect("create should succeed");
    executor
        .run(
            "INSERT INTO credentials (secret) VALUES (?1)",
            &[&"very-recognizable-plaintext-secret"],
        )
        .expect("insert should succeed");
    executor.close().expect("close should succeed");

    let on_disk = fs::read(&db_path).expect("store file should be readable");
    assert!(!on_disk.is_empty());
    // An unencrypted SQLite file starts with this magic; an encrypted one
    // must not, and the inserted secret must not appear verbatim.
    assert!(!on_disk.starts_with(b"SQLite format 3"));
    let needle = b"very-recognizable-plaintext-secret";
    assert!(!on_disk
        .windows(needle.len())
        .any(|window| window == needle));
}

#[test]
fn test_constraint_violation_is_query_error() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("state.db");

    let mut executor = QueryExecutor::new(config(&db_path, "password-one"));
    executor
        .run(
            "CREATE TABLE credentials (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE)",
            &[],
        )
        .expect("create should succeed");
    executor
        .run("INSERT INTO credentials (name) VALUES (?1)", &[&"github"])
        .expect("insert should succeed");

    let result = executor.run("INSERT INTO credentials (name) VALUES (?1)", &[&"github"]);
    assert!(matches!(result, Err(StrongboxError::Query { .. })));

    // The failure does not affect connection state
    let rows = executor
        .fetch("SELECT count(*) FROM credentials", &[])
        .expect("connection should still be usable");
    assert_eq!(rows[0][0], Value::Integer(1));
}
