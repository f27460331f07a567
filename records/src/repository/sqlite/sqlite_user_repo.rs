use crate::error::RecordsError;
use crate::repository::sqlite::is_unique_violation;
use crate::repository::user_repository::UserRepository;
use crate::repository::SharedSqliteConnection;
use crate::types::UserAccount;
use chrono::{DateTime, Utc};
use log::debug;
use records_api::models::user::User;
use rusqlite::{named_params, OptionalExtension, Row};

pub struct SqliteUserRepository {
    connection: SharedSqliteConnection,
}

impl SqliteUserRepository {
    pub fn new(connection: SharedSqliteConnection) -> Self {
        Self { connection }
    }
}

/// SQL statement to create the `users` table.
const CREATE_USER_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id varchar(64) primary key NOT NULL,
    email varchar(1024) NOT NULL unique,
    name varchar(512) NOT NULL,
    role varchar(32) NOT NULL DEFAULT 'user',
    password_hash varchar(256),
    created_at datetime NOT NULL,
    updated_at datetime NOT NULL
);
";

const SELECT_USER_SQL: &str =
    "SELECT id, email, name, role, password_hash, created_at, updated_at FROM users";

/// Creates the `users` table in the database.
pub(crate) fn create_user_table(connection: &SharedSqliteConnection) -> Result<(), RecordsError> {
    let conn = connection.lock().map_err(|_| RecordsError::LockPoisoned)?;
    conn.execute(CREATE_USER_TABLE_SQL, [])?;
    Ok(())
}

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<UserAccount> {
    Ok(UserAccount {
        user: User {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            role: row.get(3)?,
            created_at: Some(row.get(5)?),
            updated_at: Some(row.get(6)?),
        },
        password_hash: row.get(4)?,
    })
}

impl SqliteUserRepository {
    fn find_one(&self, column: &str, value: &str) -> Result<Option<UserAccount>, RecordsError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| RecordsError::LockPoisoned)?;
        let sql = format!("{SELECT_USER_SQL} WHERE {column} = ?1");
        Ok(conn
            .query_row(&sql, [value], account_from_row)
            .optional()?)
    }

    fn insert(&self, account: &UserAccount, or_ignore: bool) -> Result<usize, RecordsError> {
        let now = Utc::now();
        let user = &account.user;
        let sql = format!(
            "INSERT {} INTO users (id, email, name, role, password_hash, created_at, updated_at)
             VALUES (:id, :email, :name, :role, :password_hash, :created_at, :updated_at)",
            if or_ignore { "OR IGNORE" } else { "" }
        );
        let conn = self
            .connection
            .lock()
            .map_err(|_| RecordsError::LockPoisoned)?;
        conn.execute(
            &sql,
            named_params! {
                ":id": user.id,
                ":email": user.email,
                ":name": user.name,
                ":role": user.role,
                ":password_hash": account.password_hash,
                ":created_at": user.created_at.unwrap_or(now),
                ":updated_at": user.updated_at.unwrap_or(now),
            },
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                RecordsError::EmailTaken(user.email.clone())
            } else {
                RecordsError::Sql(format!("Unable to insert user {}: {e}", user.email))
            }
        })
    }
}

impl UserRepository for SqliteUserRepository {
    fn insert_user(&self, account: &UserAccount) -> Result<(), RecordsError> {
        debug!("Adding user {} to DBMS", account.user.email);
        self.insert(account, false)?;
        Ok(())
    }

    fn upsert_user_by_email(&self, account: &UserAccount) -> Result<UserAccount, RecordsError> {
        let inserted = self.insert(account, true)?;
        debug!("Upsert of {} inserted {inserted} row(s)", account.user.email);
        self.find_by_email(&account.user.email)?
            .ok_or_else(|| RecordsError::NotFound(format!("User {}", account.user.email)))
    }

    fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>, RecordsError> {
        self.find_one("id", id)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, RecordsError> {
        self.find_one("email", email)
    }

    fn update_name(
        &self,
        id: &str,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, RecordsError> {
        let changed = {
            let conn = self
                .connection
                .lock()
                .map_err(|_| RecordsError::LockPoisoned)?;
            conn.execute(
                "UPDATE users SET name = :name, updated_at = :updated_at WHERE id = :id",
                named_params! { ":name": name, ":updated_at": updated_at, ":id": id },
            )?
        };
        if changed == 0 {
            return Ok(None);
        }
        Ok(self.find_by_id(id)?.map(|account| account.user))
    }
}
