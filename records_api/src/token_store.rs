//! Persistence of the bearer token between invocations.
//!
//! The client reads the token on every request, so whatever is saved here is used
//! by the very next call.
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use log::debug;

pub trait TokenStore: Send + Sync {
    /// Returns the stored token, if any.
    fn load(&self) -> Option<String>;

    /// Replaces the stored token.
    ///
    /// # Errors
    /// Returns an error if the token could not be persisted.
    fn save(&self, token: &str) -> io::Result<()>;

    /// Removes the stored token. Removing a token that does not exist is not an error.
    ///
    /// # Errors
    /// Returns an error if the token exists but could not be removed.
    fn clear(&self) -> io::Result<()>;
}

/// Keeps the token for the lifetime of the process only
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        MemoryTokenStore {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().ok().and_then(|guard| guard.clone())
    }

    fn save(&self, token: &str) -> io::Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| io::Error::other("token store lock poisoned"))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| io::Error::other("token store lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

/// Keeps the token in a single file. A missing or empty file means "no token".
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(e) => {
                debug!("No token in {}: {e}", self.path.to_string_lossy());
                None
            }
        }
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.try_exists()? {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, token)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() -> io::Result<()> {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load(), None);
        store.save("abc")?;
        assert_eq!(store.load().as_deref(), Some("abc"));
        store.clear()?;
        assert_eq!(store.load(), None);
        Ok(())
    }

    #[test]
    fn file_store_creates_parent_directory() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FileTokenStore::new(dir.path().join("nested").join("token"));
        store.save("secret-token")?;
        assert_eq!(store.load().as_deref(), Some("secret-token"));
        Ok(())
    }

    #[test]
    fn clearing_a_missing_file_is_ok() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FileTokenStore::new(dir.path().join("token"));
        store.clear()?;
        assert_eq!(store.load(), None);
        Ok(())
    }

    #[test]
    fn blank_file_means_no_token() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("token");
        fs::write(&path, "  \n")?;
        assert_eq!(FileTokenStore::new(path).load(), None);
        Ok(())
    }
}
