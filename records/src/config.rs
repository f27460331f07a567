use crate::error::RecordsError;
use anyhow::Result;
use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_LISTEN_ADDRESS: &str = "127.0.0.1:3001";
pub const DEFAULT_TOKEN_TTL_HOURS: u32 = 24;

/// Server configuration struct
/// Every section may be left out of the TOML file, in which case its defaults apply
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct ServerConfiguration {
    #[serde(default)]
    pub server: ListenConfiguration,
    #[serde(default)]
    pub database: DatabaseConfiguration,
    #[serde(default)]
    pub auth: AuthConfiguration,
    #[serde(default)]
    pub seed: SeedConfiguration,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct ListenConfiguration {
    /// Socket address the HTTP server binds to
    pub address: String,
}

impl Default for ListenConfiguration {
    fn default() -> Self {
        ListenConfiguration {
            address: DEFAULT_LISTEN_ADDRESS.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct DatabaseConfiguration {
    /// The path to the Sqlite database file
    pub path: String,
}

impl Default for DatabaseConfiguration {
    fn default() -> Self {
        DatabaseConfiguration {
            path: database_file().to_string_lossy().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct AuthConfiguration {
    /// How long a bearer token stays valid after sign in
    pub token_ttl_hours: u32,
}

impl Default for AuthConfiguration {
    fn default() -> Self {
        AuthConfiguration {
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct SeedConfiguration {
    /// Password given to the seeded administrator. Without it the administrator can not sign in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "records", "records-server")
}

/// Filename holding the server configuration parameters
#[must_use]
pub fn configuration_file() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from("records-server.toml"),
        |dirs| dirs.config_dir().join("records-server.toml"),
    )
}

/// Filename of the Sqlite DBMS holding users, records and sessions
#[must_use]
pub fn database_file() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from("records.db"),
        |dirs| dirs.data_dir().join("records.db"),
    )
}

/// Loads the configuration.
///
/// An explicitly given file must exist. When no file is given the default location is
/// tried, and if nothing is there the built in defaults are used.
///
/// # Errors
/// Fails if the file can not be read or is not valid TOML.
pub fn load(path: Option<&Path>) -> Result<ServerConfiguration, RecordsError> {
    if let Some(path) = path {
        return read(path);
    }
    let default_path = configuration_file();
    if default_path.exists() {
        read(&default_path)
    } else {
        debug!(
            "No configuration file at {}, using defaults",
            default_path.to_string_lossy()
        );
        Ok(ServerConfiguration::default())
    }
}

#[allow(clippy::missing_errors_doc)]
pub fn save(cfg: &ServerConfiguration, path: &Path) -> Result<()> {
    if let Some(directory) = path.parent() {
        if !directory.as_os_str().is_empty() && !directory.try_exists()? {
            fs::create_dir_all(directory)?;
        }
    }
    let mut file = File::create(path)?;
    file.write_all(to_toml_string(cfg)?.as_bytes())?;
    Ok(())
}

/// Writes the default configuration to `path` and returns it.
///
/// # Errors
/// Fails if `path` exists and `overwrite` is not set, or if the file can not be written.
pub fn create(path: &Path, overwrite: bool) -> Result<ServerConfiguration> {
    if !overwrite && path.try_exists()? {
        anyhow::bail!(
            "{} already exists, it was left untouched",
            path.to_string_lossy()
        );
    }
    let cfg = ServerConfiguration::default();
    save(&cfg, path)?;
    debug!("Wrote default configuration to {}", path.to_string_lossy());
    Ok(cfg)
}

#[allow(clippy::missing_errors_doc)]
pub fn to_toml_string(cfg: &ServerConfiguration) -> Result<String> {
    Ok(toml::to_string::<ServerConfiguration>(cfg)?)
}

/// Reads the `ServerConfiguration` struct from the supplied TOML file
fn read(path: &Path) -> Result<ServerConfiguration, RecordsError> {
    let mut file = File::open(path).map_err(|source| RecordsError::ApplicationConfig {
        path: path.into(),
        source,
    })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|source| RecordsError::ApplicationConfig {
            path: path.into(),
            source,
        })?;
    toml::from_str::<ServerConfiguration>(&contents).map_err(|source| RecordsError::TomlParse {
        path: path.into(),
        source,
    })
}
