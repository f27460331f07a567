use crate::error::RecordsError;
use crate::repository::session_repository::SessionRepository;
use crate::repository::SharedSqliteConnection;
use crate::types::SessionEntry;
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{named_params, OptionalExtension};

pub struct SqliteSessionRepository {
    connection: SharedSqliteConnection,
}

impl SqliteSessionRepository {
    pub(crate) fn new(connection: SharedSqliteConnection) -> Self {
        Self { connection }
    }
}

/// SQL statement to create the `sessions` table.
const CREATE_SESSION_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS sessions (
    token varchar(128) primary key NOT NULL,
    user_id varchar(64) NOT NULL,
    created_at datetime NOT NULL,
    expires_at datetime NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);
";

/// Creates the `sessions` table in the database.
pub(crate) fn create_session_table(connection: &SharedSqliteConnection) -> Result<(), RecordsError> {
    let conn = connection.lock().map_err(|_| RecordsError::LockPoisoned)?;
    conn.execute(CREATE_SESSION_TABLE_SQL, [])?;
    Ok(())
}

impl SessionRepository for SqliteSessionRepository {
    fn insert_session(&self, session: &SessionEntry) -> Result<(), RecordsError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| RecordsError::LockPoisoned)?;
        conn.execute(
            "INSERT INTO sessions (token, user_id, created_at, expires_at)
             VALUES (:token, :user_id, :created_at, :expires_at)",
            named_params! {
                ":token": session.token,
                ":user_id": session.user_id,
                ":created_at": session.created_at,
                ":expires_at": session.expires_at,
            },
        )
        .map_err(|e| RecordsError::Sql(format!("Unable to insert session: {e}")))?;
        Ok(())
    }

    fn find_session(&self, token: &str) -> Result<Option<SessionEntry>, RecordsError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| RecordsError::LockPoisoned)?;
        Ok(conn
            .query_row(
                "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = ?1",
                [token],
                |row| {
                    Ok(SessionEntry {
                        token: row.get(0)?,
                        user_id: row.get(1)?,
                        created_at: row.get(2)?,
                        expires_at: row.get(3)?,
                    })
                },
            )
            .optional()?)
    }

    fn delete_session(&self, token: &str) -> Result<bool, RecordsError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| RecordsError::LockPoisoned)?;
        Ok(conn.execute("DELETE FROM sessions WHERE token = ?1", [token])? == 1)
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, RecordsError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| RecordsError::LockPoisoned)?;
        let purged = conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", [now])?;
        debug!("Purged {purged} expired session(s)");
        Ok(purged)
    }
}
