use std::{io, path::PathBuf};

use thiserror::Error;

#[allow(clippy::module_name_repetitions)]
#[derive(Error, Debug)]
pub enum RecordsError {
    #[error("Unable to load the server configuration file {path:?}")]
    ApplicationConfig { path: PathBuf, source: io::Error },
    #[error("Unable to parse contents of {path}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Unable to open DBMS in file {path}: {reason}")]
    OpenDbms { path: String, reason: String },
    #[error("SQL dbms error: {0}")]
    Sql(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Mutex locking error")]
    LockPoisoned,
    #[error("{0}")]
    BadInput(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Email {0} is already registered")]
    EmailTaken(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    Unauthorized(String),
    #[error("Unable to hash password: {0}")]
    PasswordHash(String),
}

impl From<rusqlite::Error> for RecordsError {
    fn from(err: rusqlite::Error) -> Self {
        RecordsError::Sql(format!("Sqlite error {err}"))
    }
}
