use crate::error::RecordsError;
use crate::types::SessionEntry;
use chrono::{DateTime, Utc};

#[cfg_attr(test, mockall::automock)]
pub trait SessionRepository: Send + Sync {
    fn insert_session(&self, session: &SessionEntry) -> Result<(), RecordsError>;
    fn find_session(&self, token: &str) -> Result<Option<SessionEntry>, RecordsError>;
    /// Returns `false` if the token was unknown
    fn delete_session(&self, token: &str) -> Result<bool, RecordsError>;
    /// Removes every session expired at `now`, returning how many were removed
    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, RecordsError>;
}
