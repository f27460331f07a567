use crate::error::RecordsError;
use crate::types::UserAccount;
use chrono::{DateTime, Utc};
use records_api::models::user::User;

/// All CRUD operations related to the `users` table.
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    /// Inserts a new account.
    ///
    /// # Errors
    /// Returns `RecordsError::EmailTaken` if another account has the same email.
    fn insert_user(&self, account: &UserAccount) -> Result<(), RecordsError>;

    /// Inserts the account unless one with the same email exists, and returns whatever
    /// is stored afterwards. An existing account is left untouched.
    ///
    /// # Errors
    /// Fails on any SQL error.
    fn upsert_user_by_email(&self, account: &UserAccount) -> Result<UserAccount, RecordsError>;

    /// # Errors
    /// Fails on any SQL error.
    fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>, RecordsError>;

    /// # Errors
    /// Fails on any SQL error.
    fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, RecordsError>;

    /// Renames the user, returning the updated user or `None` if there is no such id.
    ///
    /// # Errors
    /// Fails on any SQL error.
    fn update_name(
        &self,
        id: &str,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, RecordsError>;
}
