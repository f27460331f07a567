use crate::error::RecordsError;
use crate::repository::record_repository::RecordRepository;
use crate::repository::session_repository::SessionRepository;
use crate::repository::sqlite;
use crate::repository::sqlite::sqlite_record_repo::SqliteRecordRepository;
use crate::repository::sqlite::sqlite_session_repo::SqliteSessionRepository;
use crate::repository::sqlite::sqlite_user_repo::SqliteUserRepository;
use crate::repository::user_repository::UserRepository;
use crate::repository::SharedSqliteConnection;
use log::debug;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Represents parameters for initializing the database connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    /// SQLite database with a specific file path
    SqliteOnDisk { path: PathBuf },

    /// SQLite database that runs entirely in memory
    SqliteInMemory,
}

/// Owns the connection and hands out repositories sharing it.
pub struct DatabaseManager {
    connection: SharedSqliteConnection,
}

impl DatabaseManager {
    /// Opens the database and brings the schema up to date.
    ///
    /// # Errors
    /// Fails if the database file can not be opened or the schema can not be created.
    pub fn new(config: &DatabaseConfig) -> Result<Self, RecordsError> {
        let connection = match config {
            DatabaseConfig::SqliteOnDisk { path } => sqlite::create_connection(path)?,
            DatabaseConfig::SqliteInMemory => Connection::open_in_memory()?,
        };
        connection.pragma_update(None, "foreign_keys", "ON")?;
        sqlite::register_functions(&connection)?;
        debug!("Opened database {config:?}");

        let connection = Arc::new(Mutex::new(connection));
        sqlite::create_schema(&connection)?;

        Ok(Self { connection })
    }

    /// Provide access to the shared database connection.
    pub(crate) fn get_connection(&self) -> SharedSqliteConnection {
        self.connection.clone()
    }

    #[must_use]
    pub fn create_user_repository(&self) -> Arc<dyn UserRepository> {
        Arc::new(SqliteUserRepository::new(self.get_connection()))
    }

    #[must_use]
    pub fn create_record_repository(&self) -> Arc<dyn RecordRepository> {
        Arc::new(SqliteRecordRepository::new(self.get_connection()))
    }

    #[must_use]
    pub fn create_session_repository(&self) -> Arc<dyn SessionRepository> {
        Arc::new(SqliteSessionRepository::new(self.get_connection()))
    }
}
