//! Server side of the Records application: storage, services and seed data.
//!
//! [`ApplicationRuntime`] wires the SQLite repositories to the services. Build one
//! with [`ApplicationRuntimeBuilder`]:
//!
//! ```rust,no_run
//! use records::ApplicationRuntimeBuilder;
//!
//! let runtime = ApplicationRuntimeBuilder::new().use_in_memory_db().build()?;
//! let report = runtime.seed()?;
//! println!("{report}");
//! # Ok::<(), records::error::RecordsError>(())
//! ```
use crate::config::ServerConfiguration;
use crate::error::RecordsError;
use crate::repository::database_manager::{DatabaseConfig, DatabaseManager};
use crate::repository::record_repository::RecordRepository;
use crate::repository::user_repository::UserRepository;
use crate::seed::SeedReport;
use crate::service::auth_service::AuthService;
use crate::service::record_service::RecordService;
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod password;
pub mod repository;
pub mod seed;
pub mod service;
pub mod types;
pub(crate) mod validation;

pub struct ApplicationRuntime {
    config: ServerConfiguration,
    users: Arc<dyn UserRepository>,
    records: Arc<dyn RecordRepository>,
    auth_service: Arc<AuthService>,
    record_service: Arc<RecordService>,
}

impl ApplicationRuntime {
    #[must_use]
    pub fn config(&self) -> &ServerConfiguration {
        &self.config
    }

    #[must_use]
    pub fn auth_service(&self) -> Arc<AuthService> {
        self.auth_service.clone()
    }

    #[must_use]
    pub fn record_service(&self) -> Arc<RecordService> {
        self.record_service.clone()
    }

    /// Inserts the administrator and sample records unless they exist already.
    ///
    /// # Errors
    /// Fails on SQL errors.
    pub fn seed(&self) -> Result<SeedReport, RecordsError> {
        seed::run(
            self.users.as_ref(),
            self.records.as_ref(),
            self.config.seed.admin_password.as_deref(),
        )
    }
}

#[derive(Default)]
pub struct ApplicationRuntimeBuilder {
    config: Option<ServerConfiguration>,
    database: Option<DatabaseConfig>,
}

impl ApplicationRuntimeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: ServerConfiguration) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides `database.path` of the configuration
    #[must_use]
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = Some(DatabaseConfig::SqliteOnDisk { path: path.into() });
        self
    }

    #[must_use]
    pub fn use_in_memory_db(mut self) -> Self {
        self.database = Some(DatabaseConfig::SqliteInMemory);
        self
    }

    /// Opens the database, creating the schema if needed, and wires up the services.
    ///
    /// # Errors
    /// Fails if the database can not be opened or the schema can not be created.
    pub fn build(self) -> Result<ApplicationRuntime, RecordsError> {
        let config = self.config.unwrap_or_default();
        let database = self.database.unwrap_or_else(|| DatabaseConfig::SqliteOnDisk {
            path: PathBuf::from(&config.database.path),
        });
        debug!("Building runtime with database {database:?}");

        let manager = DatabaseManager::new(&database)?;
        let users = manager.create_user_repository();
        let records = manager.create_record_repository();
        let sessions = manager.create_session_repository();

        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            sessions,
            config.auth.token_ttl_hours,
        ));
        let record_service = Arc::new(RecordService::new(records.clone()));

        Ok(ApplicationRuntime {
            config,
            users,
            records,
            auth_service,
            record_service,
        })
    }
}
