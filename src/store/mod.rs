//! Task storage
//!
//! A store maps each username to that user's ordered task sequence (its
//! partition). Two backends implement [`TaskStore`]:
//!
//! - [`MemoryTaskStore`]: a plain map, gone when the process exits
//! - [`FileTaskStore`]: a JSON file rewritten in full on every mutation
//!
//! # Identifier policy
//!
//! [`TaskStore::next_id`] is recomputed from the partition each time as
//! `max(id) + 1` (or `1` when empty). No "highest ever issued" counter is
//! kept, so deleting the task holding the largest id frees that id for the
//! next insert. Because of that, lookups take the first match and deletes
//! remove every match.

use crate::error::Result;
use crate::model::{Task, UserHandle};

mod file;
mod memory;

pub use file::FileTaskStore;
pub use memory::MemoryTaskStore;

/// Per-user task persistence.
///
/// Every operation is scoped to one user's partition. Unknown users behave
/// like users with no tasks; only storage faults produce `Err`.
pub trait TaskStore {
    /// Append `task` to the user's partition. Ids are not checked here;
    /// use [`TaskStore::insert_new`] to have the store assign one.
    fn add(&mut self, user: &UserHandle, task: Task) -> Result<()>;

    /// Pick the next id and append `build(id)` in one step, so no other
    /// writer can claim the same id in between. Returns the stored task.
    fn insert_new<F>(&mut self, user: &UserHandle, build: F) -> Result<Task>
    where
        F: FnOnce(u64) -> Task;

    /// Copy of the user's partition in insertion order
    fn get_all(&self, user: &UserHandle) -> Result<Vec<Task>>;

    /// First task with a matching id
    fn find_by_id(&self, user: &UserHandle, id: u64) -> Result<Option<Task>> {
        Ok(self.get_all(user)?.into_iter().find(|task| task.id == id))
    }

    /// Remove every task with a matching id; `true` if anything was removed
    fn delete_by_id(&mut self, user: &UserHandle, id: u64) -> Result<bool>;

    /// Replace the first task whose id matches `task.id`, keeping its
    /// position; `true` if a task was replaced
    fn update(&mut self, user: &UserHandle, task: Task) -> Result<bool>;

    /// `max(id) + 1` over the user's partition, or `1` if it is empty
    fn next_id(&self, user: &UserHandle) -> Result<u64> {
        Ok(next_id_in(&self.get_all(user)?))
    }
}

pub(crate) fn next_id_in(tasks: &[Task]) -> u64 {
    tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1
}

/// Append a task built from the partition's next id
pub(crate) fn push_new<F>(tasks: &mut Vec<Task>, build: F) -> Task
where
    F: FnOnce(u64) -> Task,
{
    let task = build(next_id_in(tasks));
    tasks.push(task.clone());
    task
}

pub(crate) fn remove_all(tasks: &mut Vec<Task>, id: u64) -> bool {
    let before = tasks.len();
    tasks.retain(|task| task.id != id);
    tasks.len() != before
}

pub(crate) fn replace_first(tasks: &mut [Task], replacement: Task) -> bool {
    match tasks.iter_mut().find(|task| task.id == replacement.id) {
        Some(slot) => {
            *slot = replacement;
            true
        }
        None => false,
    }
}
