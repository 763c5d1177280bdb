use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::model::{Task, UserHandle};

use super::{push_new, remove_all, replace_first, TaskStore};

/// On-disk layout: username -> tasks
type TaskMap = BTreeMap<String, Vec<Task>>;

/// Task store backed by a single JSON file.
///
/// Each mutation locks `<file>.lock`, reads the whole mapping, changes one
/// partition and writes the whole mapping back atomically. Reads skip the
/// lock since the file is only ever replaced by rename.
///
/// A missing file is an empty store. A file that cannot be read or parsed is
/// an error, never an empty store.
#[derive(Debug, Clone)]
pub struct FileTaskStore {
    path: PathBuf,
    lock_timeout_ms: u64,
}

impl FileTaskStore {
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

    fn load_map(&self) -> Result<TaskMap> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(TaskMap::new()),
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(TaskMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn read_partition(&self, user: &UserHandle) -> Result<Vec<Task>> {
        let mut map = self.load_map()?;
        Ok(map.remove(user.username()).unwrap_or_default())
    }

    /// Locked read-modify-write of one partition. `f` returns its result and
    /// whether it changed anything; unchanged partitions are not written.
    fn update_partition<T, F>(&self, user: &UserHandle, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Task>) -> (T, bool),
    {
        let _lock = FileLock::acquire(lock::lock_path_for(&self.path), self.lock_timeout_ms)?;

        let mut map = self.load_map()?;
        let tasks = map.entry(user.username().to_string()).or_default();
        let (result, changed) = f(tasks);
        if !changed {
            return Ok(result);
        }
        if tasks.is_empty() {
            map.remove(user.username());
        }

        let json = serde_json::to_string_pretty(&map)?;
        lock::write_atomic(&self.path, json.as_bytes())?;

        Ok(result)
    }
}

impl TaskStore for FileTaskStore {
    fn add(&mut self, user: &UserHandle, task: Task) -> Result<()> {
        tracing::debug!(user = user.username(), id = task.id, file = %self.path.display(), "add task");
        self.update_partition(user, |tasks| {
            tasks.push(task);
            ((), true)
        })
    }

    fn insert_new<F>(&mut self, user: &UserHandle, build: F) -> Result<Task>
    where
        F: FnOnce(u64) -> Task,
    {
        let task = self.update_partition(user, |tasks| (push_new(tasks, build), true))?;
        tracing::debug!(user = user.username(), id = task.id, file = %self.path.display(), "insert task");
        Ok(task)
    }

    fn get_all(&self, user: &UserHandle) -> Result<Vec<Task>> {
        self.read_partition(user)
    }

    fn delete_by_id(&mut self, user: &UserHandle, id: u64) -> Result<bool> {
        let removed = self.update_partition(user, |tasks| {
            let removed = remove_all(tasks, id);
            (removed, removed)
        })?;
        tracing::debug!(user = user.username(), id, removed, "delete task");
        Ok(removed)
    }

    fn update(&mut self, user: &UserHandle, task: Task) -> Result<bool> {
        let id = task.id;
        let replaced = self.update_partition(user, |tasks| {
            let replaced = replace_first(tasks, task);
            (replaced, replaced)
        })?;
        tracing::debug!(user = user.username(), id, replaced, "update task");
        Ok(replaced)
    }
}
