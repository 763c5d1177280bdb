use std::collections::HashMap;

use crate::error::Result;
use crate::model::{Task, UserHandle};

use super::{next_id_in, push_new, remove_all, replace_first, TaskStore};

/// In-process task store.
///
/// No locking: mutation needs `&mut self`, so sharing one across threads
/// requires the caller to wrap it in a lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    partitions: HashMap<String, Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn partition(&self, user: &UserHandle) -> &[Task] {
        self.partitions
            .get(user.username())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl TaskStore for MemoryTaskStore {
    fn add(&mut self, user: &UserHandle, task: Task) -> Result<()> {
        tracing::debug!(user = user.username(), id = task.id, "add task");
        self.partitions
            .entry(user.username().to_string())
            .or_default()
            .push(task);
        Ok(())
    }

    fn insert_new<F>(&mut self, user: &UserHandle, build: F) -> Result<Task>
    where
        F: FnOnce(u64) -> Task,
    {
        let tasks = self
            .partitions
            .entry(user.username().to_string())
            .or_default();
        let task = push_new(tasks, build);
        tracing::debug!(user = user.username(), id = task.id, "insert task");
        Ok(task)
    }

    fn get_all(&self, user: &UserHandle) -> Result<Vec<Task>> {
        Ok(self.partition(user).to_vec())
    }

    fn find_by_id(&self, user: &UserHandle, id: u64) -> Result<Option<Task>> {
        Ok(self.partition(user).iter().find(|task| task.id == id).cloned())
    }

    fn delete_by_id(&mut self, user: &UserHandle, id: u64) -> Result<bool> {
        let removed = self
            .partitions
            .get_mut(user.username())
            .map(|tasks| remove_all(tasks, id))
            .unwrap_or(false);
        tracing::debug!(user = user.username(), id, removed, "delete task");
        Ok(removed)
    }

    fn update(&mut self, user: &UserHandle, task: Task) -> Result<bool> {
        let id = task.id;
        let replaced = self
            .partitions
            .get_mut(user.username())
            .map(|tasks| replace_first(tasks, task))
            .unwrap_or(false);
        tracing::debug!(user = user.username(), id, replaced, "update task");
        Ok(replaced)
    }

    fn next_id(&self, user: &UserHandle) -> Result<u64> {
        Ok(next_id_in(self.partition(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use chrono::{NaiveDate, NaiveDateTime};

    fn when(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 2, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn task(id: u64, title: &str) -> Task {
        Task::new(id, title, "details", Priority::Low, when(id as u32), when(1))
    }

    #[test]
    fn unknown_user_is_empty() {
        let store = MemoryTaskStore::new();
        let ghost = UserHandle::new("ghost");
        assert!(store.get_all(&ghost).unwrap().is_empty());
        assert_eq!(store.find_by_id(&ghost, 1).unwrap(), None);
        assert_eq!(store.next_id(&ghost).unwrap(), 1);
    }

    #[test]
    fn add_then_find_round_trips() {
        let mut store = MemoryTaskStore::new();
        let user = UserHandle::new("john");
        let original = task(1, "Write report");

        store.add(&user, original.clone()).unwrap();
        assert_eq!(store.find_by_id(&user, 1).unwrap(), Some(original));
    }

    #[test]
    fn partitions_are_isolated() {
        let mut store = MemoryTaskStore::new();
        let alice = UserHandle::new("alice");
        let bob = UserHandle::new("bob");

        store.add(&alice, task(1, "alice task")).unwrap();
        store.add(&alice, task(2, "alice task 2")).unwrap();
        store.add(&bob, task(1, "bob task")).unwrap();

        let bobs = store.get_all(&bob).unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].title, "bob task");
        assert_eq!(store.next_id(&alice).unwrap(), 3);
        assert_eq!(store.next_id(&bob).unwrap(), 2);
    }

    #[test]
    fn update_missing_is_reported() {
        let mut store = MemoryTaskStore::new();
        let user = UserHandle::new("john");
        store.add(&user, task(1, "a")).unwrap();

        assert!(!store.update(&user, task(2, "b")).unwrap());
        assert!(!store.update(&UserHandle::new("other"), task(1, "b")).unwrap());
        assert_eq!(store.get_all(&user).unwrap(), vec![task(1, "a")]);
    }
}
