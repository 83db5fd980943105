//! Signed-in operator session and its persistence
//!
//! The session is an explicit value carried by [`crate::AppContext`]. Persistence is a plain
//! JSON object on disk in which the session occupies a single fixed key, the way a browser
//! keeps it in local storage.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    models::AuthUser,
};

/// Storage key under which the signed-in user is kept
pub const SESSION_KEY: &str = "library_admin_user";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: AuthUser,
    pub token: String,
}

/// Persistence for the current session
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    fn load(&self) -> AppResult<Option<Session>>;
    fn save(&self, session: &Session) -> AppResult<()>;
    fn clear(&self) -> AppResult<()>;
}

/// File-backed store; other keys present in the file are left untouched
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

    fn read_map(&self) -> AppResult<Map<String, Value>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Map::new()),
            Ok(text) => match serde_json::from_str::<Value>(&text)? {
                Value::Object(map) => Ok(map),
                _ => Err(AppError::Session(format!(
                    "{} does not contain a JSON object",
                    self.path.display()
                ))),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> AppResult<Option<Session>> {
        let mut map = self.read_map()?;
        match map.remove(SESSION_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => match serde_json::from_value(value) {
                Ok(session) => Ok(Some(session)),
                Err(e) => {
                    tracing::warn!("Ignoring unreadable session in {}: {}", self.path.display(), e);
                    Ok(None)
                }
            },
        }
    }

    fn save(&self, session: &Session) -> AppResult<()> {
        let mut map = self.read_map()?;
        map.insert(SESSION_KEY.to_string(), serde_json::to_value(session)?);
        self.write_map(&map)
    }

    fn clear(&self) -> AppResult<()> {
        let mut map = self.read_map()?;
        if map.remove(SESSION_KEY).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// In-memory store for embedding and tests
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> AppResult<Option<Session>> {
        Ok(self.session.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, session: &Session) -> AppResult<()> {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
