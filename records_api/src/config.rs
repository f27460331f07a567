//! Client configuration, kept as a TOML file in the platform preference directory.
use crate::{ApiError, DEFAULT_API_URL};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Holds the data we need to reach the Records server
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct ClientConfiguration {
    #[serde(default)]
    pub server: ServerLocation,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct ServerLocation {
    /// Base url of the REST interface, including the `/api` prefix
    pub url: String,
}

impl Default for ServerLocation {
    fn default() -> Self {
        ServerLocation {
            url: DEFAULT_API_URL.to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "records", "records")
}

/// Filename holding the client configuration
#[must_use]
pub fn configuration_file() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from("records.toml"),
        |dirs| dirs.preference_dir().join("records.toml"),
    )
}

/// Filename holding the bearer token of the signed in user
#[must_use]
pub fn token_file() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from(".records-token"),
        |dirs| dirs.data_dir().join("token"),
    )
}

/// Loads the configuration from its default location
///
/// # Errors
/// Fails if the file can not be read or parsed.
pub fn load() -> Result<ClientConfiguration, ApiError> {
    read(&configuration_file())
}

/// Loads the configuration, or the defaults if no configuration file exists
///
/// # Errors
/// Fails if an existing file can not be read or parsed.
pub fn load_or_default() -> Result<ClientConfiguration, ApiError> {
    let path = configuration_file();
    if path.exists() {
        read(&path)
    } else {
        Ok(ClientConfiguration::default())
    }
}

#[allow(clippy::missing_errors_doc)]
pub fn save(cfg: &ClientConfiguration) -> Result<(), ApiError> {
    write(cfg, &configuration_file())
}

#[allow(clippy::missing_errors_doc)]
pub fn remove() -> io::Result<()> {
    fs::remove_file(configuration_file())
}

#[allow(clippy::missing_errors_doc)]
pub fn to_toml_string(cfg: &ClientConfiguration) -> Result<String, ApiError> {
    Ok(toml::to_string::<ClientConfiguration>(cfg)?)
}

/// Reads the configuration struct from the supplied TOML file
pub(crate) fn read(path: &Path) -> Result<ClientConfiguration, ApiError> {
    let mut file = File::open(path).map_err(|source| ApiError::ConfigFile {
        path: path.into(),
        source,
    })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|source| ApiError::ConfigFile {
            path: path.into(),
            source,
        })?;
    toml::from_str::<ClientConfiguration>(&contents).map_err(|source| ApiError::TomlParse {
        path: path.into(),
        source,
    })
}

pub(crate) fn write(cfg: &ClientConfiguration, path: &Path) -> Result<(), ApiError> {
    if let Some(directory) = path.parent() {
        if !directory.as_os_str().is_empty() && !directory.try_exists()? {
            fs::create_dir_all(directory)?;
        }
    }
    let mut file = File::create(path)?;
    file.write_all(to_toml_string(cfg)?.as_bytes())?;
    Ok(())
}
