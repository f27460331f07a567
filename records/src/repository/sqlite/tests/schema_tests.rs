use crate::error::RecordsError;
use crate::repository::database_manager::{DatabaseConfig, DatabaseManager};
use crate::repository::sqlite::tests::{test_account, test_database_manager};
use crate::repository::SharedSqliteConnection;

#[test]
fn test_foreign_keys_enabled() -> Result<(), RecordsError> {
    let db_manager = test_database_manager()?;
    assert!(
        is_foreign_keys_enabled(&db_manager.get_connection())?,
        "Foreign keys should be enabled"
    );
    Ok(())
}

#[test]
fn test_schema_creation_is_idempotent() -> Result<(), RecordsError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested").join("records.db");
    let config = DatabaseConfig::SqliteOnDisk { path: path.clone() };

    let first = DatabaseManager::new(&config)?;
    first
        .create_user_repository()
        .insert_user(&test_account("u1", "u1@example.com"))?;
    drop(first);

    let second = DatabaseManager::new(&config)?;
    assert!(path.exists());
    assert!(second.create_user_repository().find_by_id("u1")?.is_some());
    Ok(())
}

#[test]
fn test_deleting_user_cascades() -> Result<(), RecordsError> {
    let db_manager = test_database_manager()?;
    let users = db_manager.create_user_repository();
    users.insert_user(&test_account("u1", "u1@example.com"))?;

    let conn = db_manager.get_connection();
    {
        let conn = conn.lock().map_err(|_| RecordsError::LockPoisoned)?;
        conn.execute(
            "INSERT INTO records (id, title, description, status, priority, user_id, created_at, updated_at)
             VALUES ('r1', 't', '', 'ACTIVE', 'LOW', 'u1', '2024-01-01', '2024-01-01')",
            [],
        )?;
        conn.execute(
            "INSERT INTO sessions (token, user_id, created_at, expires_at)
             VALUES ('tok', 'u1', '2024-01-01', '2099-01-01')",
            [],
        )?;
        conn.execute("DELETE FROM users WHERE id = 'u1'", [])?;
    }

    let conn = conn.lock().map_err(|_| RecordsError::LockPoisoned)?;
    let records: i64 = conn.query_row("SELECT count(*) FROM records", [], |r| r.get(0))?;
    let sessions: i64 = conn.query_row("SELECT count(*) FROM sessions", [], |r| r.get(0))?;
    assert_eq!((records, sessions), (0, 0));
    Ok(())
}

/// Helper function to check if foreign keys are enabled in an SQLite connection
fn is_foreign_keys_enabled(conn: &SharedSqliteConnection) -> Result<bool, RecordsError> {
    let conn = conn.lock().map_err(|_| RecordsError::LockPoisoned)?;
    let enabled: i32 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;
    Ok(enabled == 1)
}
