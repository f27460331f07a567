use crate::error::RecordsError;
use crate::repository::record_repository::RecordRepository;
use crate::repository::sqlite::{fold, parse_column};
use crate::repository::SharedSqliteConnection;
use crate::types::RecordFilter;
use log::debug;
use records_api::models::record::{Record, RecordStats};
use records_api::models::user::Owner;
use rusqlite::{named_params, OptionalExtension, Row};

pub struct SqliteRecordRepository {
    connection: SharedSqliteConnection,
}

impl SqliteRecordRepository {
    pub(crate) fn new(connection: SharedSqliteConnection) -> Self {
        Self { connection }
    }
}

/// SQL statement to create the `records` table.
const CREATE_RECORD_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS records (
    id varchar(64) primary key NOT NULL,
    title varchar(512) NOT NULL,
    description text NOT NULL DEFAULT '',
    status varchar(16) NOT NULL DEFAULT 'ACTIVE'
        CHECK (status IN ('ACTIVE', 'INACTIVE', 'PENDING')),
    priority varchar(16) NOT NULL DEFAULT 'MEDIUM'
        CHECK (priority IN ('LOW', 'MEDIUM', 'HIGH')),
    user_id varchar(64) NOT NULL,
    created_at datetime NOT NULL,
    updated_at datetime NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS records_user_created_idx ON records (user_id, created_at);
";

const SELECT_RECORD_SQL: &str = r"
SELECT r.id, r.title, r.description, r.status, r.priority, r.user_id,
       r.created_at, r.updated_at, u.name, u.email
FROM records r JOIN users u ON u.id = r.user_id";

/// Matches every record of the owner when `:status` and `:needle` are NULL.
/// `:needle` must already be folded with [`fold`].
const FILTER_SQL: &str = r"
WHERE r.user_id = :owner
  AND (:status IS NULL OR r.status = :status)
  AND (:needle IS NULL
       OR instr(fold(r.title), :needle) > 0
       OR instr(fold(r.description), :needle) > 0)";

/// Creates the `records` table in the database.
pub(crate) fn create_record_table(connection: &SharedSqliteConnection) -> Result<(), RecordsError> {
    let conn = connection.lock().map_err(|_| RecordsError::LockPoisoned)?;
    conn.execute_batch(CREATE_RECORD_TABLE_SQL)?;
    Ok(())
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: parse_column(row, 3)?,
        priority: parse_column(row, 4)?,
        user_id: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        users: Some(Owner {
            name: row.get(8)?,
            email: row.get(9)?,
        }),
    })
}

impl SqliteRecordRepository {
    fn insert(&self, record: &Record, or_ignore: bool) -> Result<usize, RecordsError> {
        let sql = format!(
            "INSERT {} INTO records (id, title, description, status, priority, user_id, created_at, updated_at)
             VALUES (:id, :title, :description, :status, :priority, :user_id, :created_at, :updated_at)",
            if or_ignore { "OR IGNORE" } else { "" }
        );
        let conn = self
            .connection
            .lock()
            .map_err(|_| RecordsError::LockPoisoned)?;
        conn.execute(
            &sql,
            named_params! {
                ":id": record.id,
                ":title": record.title,
                ":description": record.description,
                ":status": record.status.as_str(),
                ":priority": record.priority.as_str(),
                ":user_id": record.user_id,
                ":created_at": record.created_at,
                ":updated_at": record.updated_at,
            },
        )
        .map_err(|e| RecordsError::Sql(format!("Unable to insert record {}: {e}", record.id)))
    }
}

impl RecordRepository for SqliteRecordRepository {
    fn insert_record(&self, record: &Record) -> Result<(), RecordsError> {
        debug!("Adding record {} to DBMS", record.id);
        self.insert(record, false)?;
        Ok(())
    }

    fn upsert_record(&self, record: &Record) -> Result<bool, RecordsError> {
        Ok(self.insert(record, true)? == 1)
    }

    fn find_record(&self, owner: &str, id: &str) -> Result<Option<Record>, RecordsError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| RecordsError::LockPoisoned)?;
        let sql = format!("{SELECT_RECORD_SQL} WHERE r.id = :id AND r.user_id = :owner");
        Ok(conn
            .query_row(
                &sql,
                named_params! { ":id": id, ":owner": owner },
                record_from_row,
            )
            .optional()?)
    }

    fn list_records(
        &self,
        owner: &str,
        filter: &RecordFilter,
        offset: u64,
        limit: u32,
    ) -> Result<(Vec<Record>, u64), RecordsError> {
        let status = filter.status.map(|s| s.as_str());
        let needle = filter
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(fold);
        let offset = i64::try_from(offset)
            .map_err(|_| RecordsError::BadInput(format!("Page offset {offset} is too large")))?;

        let conn = self
            .connection
            .lock()
            .map_err(|_| RecordsError::LockPoisoned)?;

        let total: i64 = conn.query_row(
            &format!("SELECT count(*) FROM records r {FILTER_SQL}"),
            named_params! { ":owner": owner, ":status": status, ":needle": needle },
            |row| row.get(0),
        )?;

        let sql = format!(
            "{SELECT_RECORD_SQL} {FILTER_SQL}
             ORDER BY r.created_at DESC, r.rowid DESC
             LIMIT :limit OFFSET :offset"
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(
                named_params! {
                    ":owner": owner,
                    ":status": status,
                    ":needle": needle,
                    ":limit": limit,
                    ":offset": offset,
                },
                record_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((records, u64::try_from(total).unwrap_or_default()))
    }

    fn update_record(&self, record: &Record) -> Result<bool, RecordsError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| RecordsError::LockPoisoned)?;
        let changed = conn.execute(
            "UPDATE records
             SET title = :title, description = :description, status = :status,
                 priority = :priority, updated_at = :updated_at
             WHERE id = :id AND user_id = :owner",
            named_params! {
                ":title": record.title,
                ":description": record.description,
                ":status": record.status.as_str(),
                ":priority": record.priority.as_str(),
                ":updated_at": record.updated_at,
                ":id": record.id,
                ":owner": record.user_id,
            },
        )?;
        Ok(changed == 1)
    }

    fn delete_record(&self, owner: &str, id: &str) -> Result<bool, RecordsError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| RecordsError::LockPoisoned)?;
        let deleted = conn.execute(
            "DELETE FROM records WHERE id = :id AND user_id = :owner",
            named_params! { ":id": id, ":owner": owner },
        )?;
        Ok(deleted == 1)
    }

    fn stats(&self, owner: &str) -> Result<RecordStats, RecordsError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| RecordsError::LockPoisoned)?;
        let stats = conn.query_row(
            r"SELECT count(*),
                     COALESCE(SUM(CASE WHEN status = 'ACTIVE' THEN 1 ELSE 0 END), 0),
                     COALESCE(SUM(CASE WHEN status = 'INACTIVE' THEN 1 ELSE 0 END), 0),
                     COALESCE(SUM(CASE WHEN status = 'PENDING' THEN 1 ELSE 0 END), 0)
              FROM records WHERE user_id = ?1",
            [owner],
            |row| {
                Ok(RecordStats {
                    total: row.get(0)?,
                    active: row.get(1)?,
                    inactive: row.get(2)?,
                    pending: row.get(3)?,
                })
            },
        )?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::database_manager::DatabaseManager;
    use crate::repository::sqlite::tests::{test_account, test_database_manager};
    use chrono::{Duration, TimeZone, Utc};
    use records_api::models::record::{Priority, RecordStatus};
    use std::sync::Arc;

    fn record(id: &str, owner: &str, title: &str, minutes: i64) -> Record {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes);
        Record {
            id: id.to_string(),
            title: title.to_string(),
            description: format!("About {title}"),
            status: RecordStatus::Active,
            priority: Priority::Medium,
            user_id: owner.to_string(),
            created_at: created,
            updated_at: created,
            users: None,
        }
    }

    fn setup() -> Result<(DatabaseManager, Arc<dyn RecordRepository>), RecordsError> {
        let db = test_database_manager()?;
        let users = db.create_user_repository();
        users.insert_user(&test_account("u1", "u1@example.com"))?;
        users.insert_user(&test_account("u2", "u2@example.com"))?;
        let records = db.create_record_repository();
        Ok((db, records))
    }

    #[test]
    fn test_insert_and_find_joins_owner() -> Result<(), RecordsError> {
        let (_db, repo) = setup()?;
        let r = record("r1", "u1", "First", 0);
        repo.insert_record(&r)?;

        let found = repo.find_record("u1", "r1")?.expect("record");
        assert_eq!(found.title, "First");
        assert_eq!(found.created_at, r.created_at);
        assert_eq!(found.users.unwrap().email, "u1@example.com");
        Ok(())
    }

    #[test]
    fn test_other_owner_can_not_see_record() -> Result<(), RecordsError> {
        let (_db, repo) = setup()?;
        repo.insert_record(&record("r1", "u1", "First", 0))?;

        assert!(repo.find_record("u2", "r1")?.is_none());
        assert!(!repo.delete_record("u2", "r1")?);
        let hijack = record("r1", "u2", "Mine now", 0);
        assert!(!repo.update_record(&hijack)?);
        assert_eq!(repo.find_record("u1", "r1")?.unwrap().title, "First");
        Ok(())
    }

    #[test]
    fn test_unknown_owner_is_rejected() -> Result<(), RecordsError> {
        let (_db, repo) = setup()?;
        assert!(repo.insert_record(&record("r1", "ghost", "Orphan", 0)).is_err());
        Ok(())
    }

    #[test]
    fn test_list_newest_first_with_paging() -> Result<(), RecordsError> {
        let (_db, repo) = setup()?;
        for i in 0..5 {
            repo.insert_record(&record(&format!("r{i}"), "u1", &format!("Record {i}"), i))?;
        }
        repo.insert_record(&record("x", "u2", "Not mine", 10))?;

        let (page, total) = repo.list_records("u1", &RecordFilter::default(), 0, 2)?;
        assert_eq!(total, 5);
        let ids: Vec<_> = page.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["r4", "r3"]);

        let (last, _) = repo.list_records("u1", &RecordFilter::default(), 4, 2)?;
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].id, "r0");
        Ok(())
    }

    #[test]
    fn test_list_filters_by_search_and_status() -> Result<(), RecordsError> {
        let (_db, repo) = setup()?;
        repo.insert_record(&record("r1", "u1", "Quarterly Report", 0))?;
        let mut pending = record("r2", "u1", "Budget", 1);
        pending.status = RecordStatus::Pending;
        pending.description = "needs the REPORT numbers".to_string();
        repo.insert_record(&pending)?;
        repo.insert_record(&record("r3", "u1", "100% done", 2))?;

        let search = |s: &str| RecordFilter {
            search: Some(s.to_string()),
            status: None,
        };
        let (found, total) = repo.list_records("u1", &search("report"), 0, 10)?;
        assert_eq!(total, 2);
        assert_eq!(found[0].id, "r2");

        let (found, _) = repo.list_records("u1", &search("%"), 0, 10)?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "r3");

        let by_status = RecordFilter {
            search: Some("report".to_string()),
            status: Some(RecordStatus::Pending),
        };
        let (found, total) = repo.list_records("u1", &by_status, 0, 10)?;
        assert_eq!(total, 1);
        assert_eq!(found[0].status, RecordStatus::Pending);
        Ok(())
    }

    #[test]
    fn test_upsert_leaves_existing_record() -> Result<(), RecordsError> {
        let (_db, repo) = setup()?;
        assert!(repo.upsert_record(&record("r1", "u1", "Original", 0))?);
        assert!(!repo.upsert_record(&record("r1", "u1", "Replacement", 0))?);
        assert_eq!(repo.find_record("u1", "r1")?.unwrap().title, "Original");
        Ok(())
    }

    #[test]
    fn test_update_delete_and_stats() -> Result<(), RecordsError> {
        let (_db, repo) = setup()?;
        repo.insert_record(&record("r1", "u1", "One", 0))?;
        repo.insert_record(&record("r2", "u1", "Two", 1))?;

        let mut changed = repo.find_record("u1", "r1")?.unwrap();
        changed.status = RecordStatus::Inactive;
        changed.priority = Priority::High;
        assert!(repo.update_record(&changed)?);
        let stored = repo.find_record("u1", "r1")?.unwrap();
        assert_eq!((stored.status, stored.priority), (RecordStatus::Inactive, Priority::High));

        let stats = repo.stats("u1")?;
        assert_eq!(
            stats,
            RecordStats { total: 2, active: 1, inactive: 1, pending: 0 }
        );
        assert_eq!(repo.stats("u2")?, RecordStats::default());

        assert!(repo.delete_record("u1", "r2")?);
        assert!(!repo.delete_record("u1", "r2")?);
        assert_eq!(repo.stats("u1")?.total, 1);
        Ok(())
    }

    #[test]
    fn test_search_ignores_case_beyond_ascii() -> Result<(), RecordsError> {
        let (_db, repo) = setup()?;
        repo.insert_record(&record("r1", "u1", "Édition annuelle", 0))?;
        let mut described = record("r2", "u1", "Budget", 1);
        described.description = "Relatório do trimestre".to_string();
        repo.insert_record(&described)?;

        for (term, expected) in [("édition", "r1"), ("ÉDITION", "r1"), ("RELATÓRIO", "r2")] {
            let filter = RecordFilter {
                search: Some(term.to_string()),
                status: None,
            };
            let (found, total) = repo.list_records("u1", &filter, 0, 10)?;
            assert_eq!(total, 1, "search {term}");
            assert_eq!(found[0].id, expected, "search {term}");
        }
        Ok(())
    }
}
