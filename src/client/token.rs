use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::ClientError;

/// Storage key the admin bearer token lives under.
pub const TOKEN_KEY: &str = "techresona_admin_token";

/// Client-side storage for the admin bearer token.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

/// Process-local store; the token is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        MemoryTokenStore {
            token: Mutex::new(Some(token.into())),
        }
    }

    /// A panic while holding the lock cannot leave an `Option<String>`
    /// half-written, so a poisoned lock is still usable.
    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot().clone()
    }

    fn set(&self, token: &str) -> Result<(), ClientError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.slot() = None;
        Ok(())
    }
}

/// A JSON key/value file, so the token survives restarts. Other keys in the
/// file are preserved.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore { path: path.into() }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, ClientError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(entries)?)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match self.load() {
            Ok(mut entries) => entries.remove(TOKEN_KEY),
            Err(e) => {
                tracing::warn!(error = %e, path = ?self.path, "Unreadable token store");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), ClientError> {
        let mut entries = self.load()?;
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.save(&entries)
    }

    fn clear(&self) -> Result<(), ClientError> {
        let mut entries = self.load()?;
        if entries.remove(TOKEN_KEY).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}
