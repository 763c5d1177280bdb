//! User registry: registration and login against `users.json`.
//!
//! Usernames match case-insensitively; passwords match exactly. A successful
//! login yields a [`UserHandle`] carrying the username as it was registered,
//! so the task partition key does not depend on how the user typed it.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::model::UserHandle;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct UserRegistry {
    path: PathBuf,
    lock_timeout_ms: u64,
}

impl UserRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_lock_timeout(path, DEFAULT_LOCK_TIMEOUT_MS)
    }

    pub fn with_lock_timeout(path: impl Into<PathBuf>, lock_timeout_ms: u64) -> Self {
        Self {
            path: path.into(),
            lock_timeout_ms,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a new user; `Ok(false)` if the name is already taken
    pub fn register(&self, username: &str, password: &str) -> Result<bool> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::InvalidArgument("username cannot be empty".to_string()));
        }
        if password.is_empty() {
            return Err(Error::InvalidArgument("password cannot be empty".to_string()));
        }

        let _lock = FileLock::acquire(lock::lock_path_for(&self.path), self.lock_timeout_ms)?;
        let mut users = self.load_users()?;
        if find_in(&users, username).is_some() {
            tracing::debug!(user = username, "registration rejected, name taken");
            return Ok(false);
        }

        users.push(UserRecord {
            username: username.to_string(),
            password: password.to_string(),
        });
        let json = serde_json::to_string_pretty(&users)?;
        lock::write_atomic(&self.path, json.as_bytes())?;
        tracing::debug!(user = username, "user registered");
        Ok(true)
    }

    pub fn exists(&self, username: &str) -> Result<bool> {
        Ok(self.find(username)?.is_some())
    }

    pub fn find(&self, username: &str) -> Result<Option<UserRecord>> {
        let users = self.load_users()?;
        Ok(find_in(&users, username.trim()).cloned())
    }

    /// Check credentials; `None` on unknown user or wrong password
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<UserHandle>> {
        Ok(self
            .find(username)?
            .filter(|user| user.password == password)
            .map(|user| UserHandle::new(user.username)))
    }

    fn load_users(&self) -> Result<Vec<UserRecord>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

fn find_in<'a>(users: &'a [UserRecord], username: &str) -> Option<&'a UserRecord> {
    users
        .iter()
        .find(|user| user.username.to_lowercase() == username.to_lowercase())
}
