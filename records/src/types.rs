use chrono::{DateTime, Utc};
use records_api::models::record::RecordStatus;
use records_api::models::user::User;

/// A user together with the credentials that never leave the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub user: User,
    /// Argon2id PHC string. Accounts without one can not sign in.
    pub password_hash: Option<String>,
}

/// A bearer token handed out at sign in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionEntry {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Narrows a record listing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordFilter {
    /// Case insensitive substring of title or description
    pub search: Option<String>,
    pub status: Option<RecordStatus>,
}
