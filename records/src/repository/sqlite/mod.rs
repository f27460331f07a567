use crate::error::RecordsError;
use crate::repository::SharedSqliteConnection;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Type;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub(crate) mod sqlite_record_repo;
pub(crate) mod sqlite_session_repo;
pub(crate) mod sqlite_user_repo;

/// Extended result code of a violated UNIQUE constraint
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

/// Creates the entire database schema, parents before children.
pub(crate) fn create_schema(connection: &SharedSqliteConnection) -> Result<(), RecordsError> {
    sqlite_user_repo::create_user_table(connection)?;
    sqlite_record_repo::create_record_table(connection)?;
    sqlite_session_repo::create_session_table(connection)?;
    Ok(())
}

/// Lower cases text for case-insensitive search. SQLite's own `lower()` and `LIKE`
/// only fold ASCII.
pub(crate) fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// Makes [`fold`] available to SQL as `fold(text)`. NULL stays NULL.
pub(crate) fn register_functions(conn: &Connection) -> Result<(), RecordsError> {
    conn.create_scalar_function(
        "fold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.as_deref().map(fold))
        },
    )?;
    Ok(())
}

pub(crate) fn create_connection(dbms_path: &Path) -> Result<Connection, RecordsError> {
    if let Some(parent) = dbms_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Connection::open(dbms_path).map_err(|e| RecordsError::OpenDbms {
        path: dbms_path.to_string_lossy().to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Reads a text column holding one of our upper case enums
pub(crate) fn parse_column<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let text: String = row.get(idx)?;
    text.parse::<T>().map_err(|msg| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::<dyn std::error::Error + Send + Sync>::from(msg),
        )
    })
}

#[cfg(test)]
pub(crate) mod tests;
