use std::{
    fmt::{self, Formatter},
    str::FromStr,
};

use super::user::Owner;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Lifecycle state of a record. Upper case on the wire and in the database.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
    Pending,
}

impl RecordStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "ACTIVE",
            RecordStatus::Inactive => "INACTIVE",
            RecordStatus::Pending => "PENDING",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(RecordStatus::Active),
            "INACTIVE" => Ok(RecordStatus::Inactive),
            "PENDING" => Ok(RecordStatus::Pending),
            other => Err(format!("Invalid status '{other}'")),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            other => Err(format!("Invalid priority '{other}'")),
        }
    }
}

/// A record owned by a single user
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: RecordStatus,
    pub priority: Priority,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Name and email of the owner, joined in by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Owner>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RecordStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub pending: u64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            total: 0,
            total_pages: 0,
        }
    }
}

impl Pagination {
    /// Computes the number of pages needed to hold `total` items, `limit` at a time.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit)) as u32
        };
        Pagination {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// A single page of records as returned by `GET /records`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RecordsPage {
    pub records: Vec<Record>,
    pub pagination: Pagination,
}

/// Body of `POST /records`. Status and priority fall back to their defaults when absent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewRecord {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<RecordStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl NewRecord {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        NewRecord {
            title: title.into(),
            description: description.into(),
            status: None,
            priority: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Body of `PUT /records/{id}`. Fields left as `None` are not sent and keep their value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RecordUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl RecordUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }
}

/// Paging and filtering parameters of `GET /records`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: Option<RecordStatus>,
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for RecordQuery {
    fn default() -> Self {
        RecordQuery {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: String::new(),
            status: None,
        }
    }
}

impl RecordQuery {
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub fn status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Renders the query string. `search` and `status` are only included when set.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut query = format!("page={}&limit={}", self.page, self.limit);
        if !self.search.is_empty() {
            query.push_str("&search=");
            query.push_str(&urlencoding::encode(&self.search));
        }
        if let Some(status) = self.status {
            query.push_str("&status=");
            query.push_str(status.as_str());
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_upper_case_on_the_wire() {
        let json = serde_json::to_string(&RecordStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
        let status: RecordStatus = serde_json::from_str("\"INACTIVE\"").unwrap();
        assert_eq!(status, RecordStatus::Inactive);
    }

    #[test]
    fn parse_status_and_priority_ignores_case() {
        assert_eq!("active".parse::<RecordStatus>().unwrap(), RecordStatus::Active);
        assert_eq!("High".parse::<Priority>().unwrap(), Priority::High);
        assert!("DONE".parse::<RecordStatus>().is_err());
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).total_pages, 2);
    }

    #[test]
    fn pagination_uses_camel_case_total_pages() {
        let json = serde_json::to_value(Pagination::new(2, 5, 12)).unwrap();
        assert_eq!(json["totalPages"], 3);
    }

    #[test]
    fn default_query_omits_empty_filters() {
        assert_eq!(RecordQuery::default().to_query_string(), "page=1&limit=10");
    }

    #[test]
    fn query_encodes_search_and_status() {
        let query = RecordQuery::default()
            .page(2)
            .limit(25)
            .search("first record")
            .status(RecordStatus::Pending);
        assert_eq!(
            query.to_query_string(),
            "page=2&limit=25&search=first%20record&status=PENDING"
        );
    }

    #[test]
    fn update_skips_unset_fields() {
        let update = RecordUpdate {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"title":"New title"}"#);
        assert!(!update.is_empty());
        assert!(RecordUpdate::default().is_empty());
    }
}
