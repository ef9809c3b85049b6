//! Client-side session context.
//!
//! A [`UserSession`] owns the signed-in user and mirrors it into a
//! [`SessionStorage`] so it survives restarts. It is created explicitly
//! with [`UserSession::init`] when the application starts and handed to
//! whatever needs it; [`UserSession::close`] ends its lifetime.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::token::{decode_hint, is_expired};

/// Storage key holding the JSON-encoded [`User`].
pub const USER_KEY: &str = "user";

/// Storage key holding the raw bearer token.
pub const TOKEN_KEY: &str = "authToken";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),
}

/// The signed-in operator as shown in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub role: String,
}

/// Persistent string key-value storage backing a session.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    fn remove(&self, key: &str) -> Result<(), SessionError>;

    /// Push buffered writes to the backing medium.
    fn flush(&self) -> Result<(), SessionError> {
        Ok(())
    }
}

// ── MemoryStorage ───────────────────────────────────────────────────

/// Process-local storage. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> SessionError {
    SessionError::Storage("lock poisoned".into())
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.entries.read().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.entries.write().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

// ── FileStorage ─────────────────────────────────────────────────────

/// A JSON object on disk, rewritten on every mutation.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| SessionError::Storage(format!("read {}: {}", path.display(), e)))?;
            serde_json::from_str(&content)
                .map_err(|e| SessionError::Serialization(format!("{}: {}", path.display(), e)))?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Default session file: ~/.netblocker/session.json.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".netblocker").join("session.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SessionError::Storage(format!("mkdir {}: {}", parent.display(), e)))?;
        }
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, content)
            .map_err(|e| SessionError::Storage(format!("write {}: {}", self.path.display(), e)))
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.entries.lock().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), SessionError> {
        let entries = self.entries.lock().map_err(poisoned)?;
        self.persist(&entries)
    }
}

// ── UserSession ─────────────────────────────────────────────────────

/// Session state for one client, backed by persistent storage.
pub struct UserSession {
    storage: Arc<dyn SessionStorage>,
    user: Option<User>,
}

impl UserSession {
    /// Restore the session from `storage`.
    ///
    /// A cached user is kept only while the stored token is present and
    /// unexpired; otherwise both keys are cleared.
    pub fn init(storage: Arc<dyn SessionStorage>) -> Result<Self, SessionError> {
        let user = match storage.get(USER_KEY)? {
            Some(saved) => match serde_json::from_str::<User>(&saved) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("ignoring unreadable cached user: {}", e);
                    None
                }
            },
            None => None,
        };

        let mut session = Self { storage, user };
        let token = session.storage.get(TOKEN_KEY)?;
        if token.as_deref().is_none_or(is_expired) {
            debug!("session token missing or expired, clearing cached state");
            session.logout()?;
        }
        Ok(session)
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The stored token, if it is still usable.
    pub fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.storage.get(TOKEN_KEY)?.filter(|t| !is_expired(t)))
    }

    /// Replace the current user. `None` only clears the in-memory copy.
    pub fn set(&mut self, user: Option<User>) -> Result<(), SessionError> {
        if let Some(user) = &user {
            let json = serde_json::to_string(user)
                .map_err(|e| SessionError::Serialization(e.to_string()))?;
            self.storage.set(USER_KEY, &json)?;
        }
        self.user = user;
        Ok(())
    }

    /// Adopt `token`: store it and derive the displayed user from its payload.
    pub fn login(&mut self, token: &str) -> Result<User, SessionError> {
        let hint = decode_hint(token)
            .ok_or_else(|| SessionError::InvalidToken("payload is not readable".into()))?;
        if hint.is_expired_at(chrono::Utc::now().timestamp()) {
            return Err(SessionError::InvalidToken("token has expired".into()));
        }
        let user = hint.user();
        self.storage.set(TOKEN_KEY, token)?;
        self.set(Some(user.clone()))?;
        Ok(user)
    }

    /// Forget the user and the token.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.user = None;
        self.storage.remove(USER_KEY)?;
        self.storage.remove(TOKEN_KEY)?;
        Ok(())
    }

    /// End the session's lifetime, flushing storage.
    pub fn close(self) -> Result<(), SessionError> {
        self.storage.flush()
    }
}
