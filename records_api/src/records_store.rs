//! Local mirror of the signed in user's records.
//!
//! The store keeps the current page of records, the aggregate statistics and
//! the pagination returned by the server. Mutations are applied to the local list
//! as soon as the server confirms them, without refetching the page.
use log::{debug, error};
use serde::Serialize;

use crate::models::record::{
    NewRecord, Pagination, Record, RecordQuery, RecordStats, RecordUpdate,
};
use crate::RecordsClient;

pub const LOAD_FAILED: &str = "Failed to load records";
pub const CREATE_FAILED: &str = "Failed to create record";
pub const UPDATE_FAILED: &str = "Failed to update record";
pub const DELETE_FAILED: &str = "Failed to delete record";

/// Outcome of a create, update or delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MutationResult {
    fn ok() -> Self {
        MutationResult {
            success: true,
            error: None,
        }
    }

    fn failed(message: String) -> Self {
        MutationResult {
            success: false,
            error: Some(message),
        }
    }
}

pub struct RecordsStore<C: RecordsClient> {
    client: C,
    records: Vec<Record>,
    stats: RecordStats,
    loading: bool,
    error: Option<String>,
    pagination: Pagination,
}

impl<C: RecordsClient> RecordsStore<C> {
    pub fn new(client: C) -> Self {
        RecordsStore {
            client,
            records: Vec::new(),
            stats: RecordStats::default(),
            loading: false,
            error: None,
            pagination: Pagination::default(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn stats(&self) -> RecordStats {
        self.stats
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// The initial fetch: first page with default paging, then the statistics
    pub async fn load(&mut self) {
        self.fetch_records(&RecordQuery::default()).await;
        self.fetch_stats().await;
    }

    pub async fn fetch_records(&mut self, query: &RecordQuery) {
        self.loading = true;
        self.error = None;
        match self.client.get_records(query).await {
            Ok(page) => {
                debug!(
                    "Loaded {} records, page {} of {}",
                    page.records.len(),
                    page.pagination.page,
                    page.pagination.total_pages
                );
                self.records = page.records;
                self.pagination = page.pagination;
            }
            Err(e) => self.error = Some(e.message_or(LOAD_FAILED)),
        }
        self.loading = false;
    }

    /// Refreshes the statistics. A failure is logged and otherwise ignored.
    pub async fn fetch_stats(&mut self) {
        match self.client.get_stats().await {
            Ok(stats) => self.stats = stats,
            Err(e) => error!("Unable to load record statistics: {e}"),
        }
    }

    /// Creates a record and puts it first in the local list
    pub async fn create_record(&mut self, record: &NewRecord) -> MutationResult {
        self.loading = true;
        self.error = None;
        let result = match self.client.create_record(record).await {
            Ok(created) => {
                self.records.insert(0, created);
                self.fetch_stats().await;
                MutationResult::ok()
            }
            Err(e) => self.fail(e.message_or(CREATE_FAILED)),
        };
        self.loading = false;
        result
    }

    /// Updates a record and replaces the local copy with the server's version
    pub async fn update_record(&mut self, id: &str, update: &RecordUpdate) -> MutationResult {
        self.loading = true;
        self.error = None;
        let result = match self.client.update_record(id, update).await {
            Ok(updated) => {
                for record in self.records.iter_mut().filter(|r| r.id == id) {
                    *record = updated.clone();
                }
                self.fetch_stats().await;
                MutationResult::ok()
            }
            Err(e) => self.fail(e.message_or(UPDATE_FAILED)),
        };
        self.loading = false;
        result
    }

    /// Deletes a record and drops it from the local list
    pub async fn delete_record(&mut self, id: &str) -> MutationResult {
        self.loading = true;
        self.error = None;
        let result = match self.client.delete_record(id).await {
            Ok(_) => {
                self.records.retain(|r| r.id != id);
                self.fetch_stats().await;
                MutationResult::ok()
            }
            Err(e) => self.fail(e.message_or(DELETE_FAILED)),
        };
        self.loading = false;
        result
    }

    fn fail(&mut self, message: String) -> MutationResult {
        self.error = Some(message.clone());
        MutationResult::failed(message)
    }
}
