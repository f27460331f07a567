use crate::error::RecordsError;
use crate::types::RecordFilter;
use records_api::models::record::{Record, RecordStats};

/// Storage of records. Every read and write is scoped to the owning user, a record
/// belonging to someone else behaves as if it did not exist.
#[cfg_attr(test, mockall::automock)]
pub trait RecordRepository: Send + Sync {
    /// # Errors
    /// Fails on SQL errors, including an unknown owner.
    fn insert_record(&self, record: &Record) -> Result<(), RecordsError>;

    /// Inserts the record unless its id is already present. Returns `true` if it was inserted.
    ///
    /// # Errors
    /// Fails on any SQL error.
    fn upsert_record(&self, record: &Record) -> Result<bool, RecordsError>;

    /// Looks up a record with the owner's name and email joined in.
    ///
    /// # Errors
    /// Fails on any SQL error.
    fn find_record(&self, owner: &str, id: &str) -> Result<Option<Record>, RecordsError>;

    /// Returns one page of the owner's records, newest first, together with the
    /// number of records matching the filter across all pages.
    ///
    /// # Errors
    /// Fails on any SQL error.
    fn list_records(
        &self,
        owner: &str,
        filter: &RecordFilter,
        offset: u64,
        limit: u32,
    ) -> Result<(Vec<Record>, u64), RecordsError>;

    /// Writes title, description, status, priority and `updated_at`.
    /// Returns `false` if the owner has no record with that id.
    ///
    /// # Errors
    /// Fails on any SQL error.
    fn update_record(&self, record: &Record) -> Result<bool, RecordsError>;

    /// Returns `false` if the owner has no record with that id.
    ///
    /// # Errors
    /// Fails on any SQL error.
    fn delete_record(&self, owner: &str, id: &str) -> Result<bool, RecordsError>;

    /// # Errors
    /// Fails on any SQL error.
    fn stats(&self, owner: &str) -> Result<RecordStats, RecordsError>;
}
