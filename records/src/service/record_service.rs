use crate::error::RecordsError;
use crate::repository::record_repository::RecordRepository;
use crate::types::RecordFilter;
use crate::validation::required;
use chrono::Utc;
use log::debug;
use records_api::models::record::{
    NewRecord, Pagination, Record, RecordQuery, RecordStats, RecordUpdate, RecordsPage,
};
use std::sync::Arc;

pub const MAX_LIMIT: u32 = 100;

/// Record operations on behalf of a signed in user. `owner` is always the id of that user.
pub struct RecordService {
    records: Arc<dyn RecordRepository>,
}

impl RecordService {
    pub fn new(records: Arc<dyn RecordRepository>) -> Self {
        Self { records }
    }

    /// Lists one page of records, newest first.
    ///
    /// `page` below 1 is treated as 1 and `limit` is kept within `1..=MAX_LIMIT`.
    /// A blank search term matches everything.
    pub fn list(&self, owner: &str, query: &RecordQuery) -> Result<RecordsPage, RecordsError> {
        let page = query.page.max(1);
        let limit = query.limit.clamp(1, MAX_LIMIT);
        let search = query.search.trim();
        let filter = RecordFilter {
            search: (!search.is_empty()).then(|| search.to_string()),
            status: query.status,
        };
        let offset = u64::from(page - 1) * u64::from(limit);

        let (records, total) = self.records.list_records(owner, &filter, offset, limit)?;
        debug!("Listed {} of {total} record(s) for {owner}", records.len());
        Ok(RecordsPage {
            records,
            pagination: Pagination::new(page, limit, total),
        })
    }

    pub fn get(&self, owner: &str, id: &str) -> Result<Record, RecordsError> {
        self.records
            .find_record(owner, id)?
            .ok_or_else(not_found)
    }

    /// Creates a record. Status defaults to `ACTIVE` and priority to `MEDIUM`.
    pub fn create(&self, owner: &str, new_record: &NewRecord) -> Result<Record, RecordsError> {
        let title = required("Title", &new_record.title)?;
        let now = Utc::now();
        let record = Record {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            description: new_record.description.clone(),
            status: new_record.status.unwrap_or_default(),
            priority: new_record.priority.unwrap_or_default(),
            user_id: owner.to_string(),
            created_at: now,
            updated_at: now,
            users: None,
        };
        self.records.insert_record(&record)?;
        self.get(owner, &record.id)
    }

    /// Changes the fields present in `update` and advances `updated_at`. Everything
    /// else keeps its stored value.
    pub fn update(
        &self,
        owner: &str,
        id: &str,
        update: &RecordUpdate,
    ) -> Result<Record, RecordsError> {
        let mut record = self.get(owner, id)?;

        if let Some(title) = &update.title {
            record.title = required("Title", title)?;
        }
        if let Some(description) = &update.description {
            record.description.clone_from(description);
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(priority) = update.priority {
            record.priority = priority;
        }
        record.updated_at = Utc::now().max(record.updated_at);

        if !self.records.update_record(&record)? {
            return Err(not_found());
        }
        Ok(record)
    }

    pub fn delete(&self, owner: &str, id: &str) -> Result<(), RecordsError> {
        if self.records.delete_record(owner, id)? {
            Ok(())
        } else {
            Err(not_found())
        }
    }

    pub fn stats(&self, owner: &str) -> Result<RecordStats, RecordsError> {
        self.records.stats(owner)
    }
}

fn not_found() -> RecordsError {
    RecordsError::NotFound("Record".to_string())
}
