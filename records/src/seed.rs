//! Sample data for a fresh database: an administrator and two records it owns.
//!
//! Running the seed again is harmless. Rows that already exist, matched by email for
//! the administrator and by id for the records, are left exactly as they are.
use crate::error::RecordsError;
use crate::password::hash_password;
use crate::repository::record_repository::RecordRepository;
use crate::repository::user_repository::UserRepository;
use crate::types::UserAccount;
use chrono::Utc;
use log::{info, warn};
use records_api::models::record::{Priority, Record, RecordStatus};
use records_api::models::user::User;
use std::fmt::{self, Display, Formatter};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_NAME: &str = "Administrator";
pub const ADMIN_ROLE: &str = "admin";

pub const SAMPLE_RECORDS: [(&str, &str, &str); 2] = [
    (
        "00000000-0000-0000-0000-000000000001",
        "First Record",
        "This is the first sample record in the system.",
    ),
    (
        "00000000-0000-0000-0000-000000000002",
        "Second Record",
        "This is the second sample record for demonstration.",
    ),
];

/// What the seed found and what it added
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub admin: User,
    pub inserted_records: Vec<String>,
    pub existing_records: Vec<String>,
}

impl Display for SeedReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "admin {} ({}), {} record(s) inserted, {} already present",
            self.admin.email,
            self.admin.id,
            self.inserted_records.len(),
            self.existing_records.len()
        )
    }
}

/// Seeds the database.
///
/// Without `admin_password` the administrator is created without credentials and can
/// not sign in until one is set.
///
/// # Errors
/// Fails on SQL errors or if the password can not be hashed.
pub fn run(
    users: &dyn UserRepository,
    records: &dyn RecordRepository,
    admin_password: Option<&str>,
) -> Result<SeedReport, RecordsError> {
    let now = Utc::now();
    let password_hash = match admin_password {
        Some(password) => Some(hash_password(password)?),
        None => {
            warn!("No seed.admin_password configured, {ADMIN_EMAIL} will not be able to sign in");
            None
        }
    };
    let admin = users
        .upsert_user_by_email(&UserAccount {
            user: User {
                id: uuid::Uuid::new_v4().to_string(),
                email: ADMIN_EMAIL.to_string(),
                name: ADMIN_NAME.to_string(),
                role: ADMIN_ROLE.to_string(),
                created_at: Some(now),
                updated_at: Some(now),
            },
            password_hash,
        })?
        .user;

    let mut report = SeedReport {
        admin,
        inserted_records: Vec::new(),
        existing_records: Vec::new(),
    };
    for (id, title, description) in SAMPLE_RECORDS {
        let record = Record {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            status: RecordStatus::Active,
            priority: Priority::Medium,
            user_id: report.admin.id.clone(),
            created_at: now,
            updated_at: now,
            users: None,
        };
        if records.upsert_record(&record)? {
            report.inserted_records.push(record.id);
        } else {
            report.existing_records.push(record.id);
        }
    }

    info!("Seed complete: {report}");
    Ok(report)
}
