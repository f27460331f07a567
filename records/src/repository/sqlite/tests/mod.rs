mod schema_tests;

use crate::error::RecordsError;
use crate::repository::database_manager::{DatabaseConfig, DatabaseManager};
use crate::types::UserAccount;
use records_api::models::user::User;

/// Creates a `DatabaseManager` with an in-memory database suitable for testing.
pub fn test_database_manager() -> Result<DatabaseManager, RecordsError> {
    DatabaseManager::new(&DatabaseConfig::SqliteInMemory)
}

pub fn test_account(id: &str, email: &str) -> UserAccount {
    UserAccount {
        user: User {
            id: id.to_string(),
            email: email.to_string(),
            name: format!("User {id}"),
            created_at: Some(chrono::Utc::now()),
            updated_at: Some(chrono::Utc::now()),
            ..Default::default()
        },
        password_hash: Some("hash".to_string()),
    }
}
