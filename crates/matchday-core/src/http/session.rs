//! Session token storage
//!
//! A session is a single opaque bearer token. Its presence is the only
//! authentication signal this layer knows about; there is no expiry tracking.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::{Error, Result};

/// Storage for the single active session token
///
/// Implementations must behave as an atomic single-value cell: concurrent
/// requests only read it, and it is written on login, logout or when the
/// session guard invalidates it.
pub trait SessionStore: Send + Sync {
    /// Current token, if a session is active
    fn token(&self) -> Option<String>;

    /// Replace the active token
    fn set_token(&self, token: &str) -> Result<()>;

    /// Drop the active session
    fn clear(&self) -> Result<()>;

    fn has_session(&self) -> bool {
        self.token().is_some()
    }
}

/// Process-local session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an active session
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        let guard = self.token.read().unwrap_or_else(|e| e.into_inner());
        guard.as_deref().and_then(normalize_token)
    }

    fn set_token(&self, token: &str) -> Result<()> {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        Ok(())
    }
}

/// Durable session store keeping the token in a single file
///
/// A missing file means no session. Writes land in a sibling temp file that
/// is renamed over the target.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn storage_error(&self, action: &str, source: io::Error) -> Error {
        Error::SessionStore {
            message: format!("Failed to {} {}", action, self.path.display()),
            source,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => normalize_token(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read session file");
                None
            }
        }
    }

    fn set_token(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.storage_error("create directory for", e))?;
            }
        }

        let temp = self.temp_path();
        fs::write(&temp, token).map_err(|e| self.storage_error("write", e))?;
        fs::rename(&temp, &self.path).map_err(|e| self.storage_error("replace", e))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.storage_error("remove", e)),
        }
    }
}

/// Blank tokens count as no session
fn normalize_token(raw: &str) -> Option<String> {
    let token = raw.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemorySessionStore::new();
        assert!(!store.has_session());

        store.set_token("abc.123.token").unwrap();
        assert_eq!(store.token().as_deref(), Some("abc.123.token"));

        store.set_token("def.456.token").unwrap();
        assert_eq!(store.token().as_deref(), Some("def.456.token"));

        store.clear().unwrap();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_blank_token_is_no_session() {
        let store = MemorySessionStore::with_token("   ");
        assert!(!store.has_session());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session");

        let store = FileSessionStore::new(&path);
        assert_eq!(store.token(), None);
        store.set_token("abc.123.token").unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.token().as_deref(), Some("abc.123.token"));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_file_store_clear() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("session"));

        store.set_token("token").unwrap();
        store.clear().unwrap();
        assert_eq!(store.token(), None);
        assert!(!store.path().exists());

        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_trims_stored_token() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session");
        fs::write(&path, "Bearer xyz\n").unwrap();

        let store = FileSessionStore::new(&path);
        assert_eq!(store.token().as_deref(), Some("Bearer xyz"));
    }
}
