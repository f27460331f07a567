use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// One trait per table, each implemented for SQLite in `sqlite`.
pub mod record_repository;
pub mod session_repository;
pub mod user_repository;

pub mod database_manager;
pub(crate) mod sqlite;

/// A thread-safe, shared connection to an ``SQLite`` database,
/// used across multiple repository layers.
pub(crate) type SharedSqliteConnection = Arc<Mutex<Connection>>;
