//! Task query service: creation, completion, deletion, search, filters and
//! sorting on top of any [`TaskStore`].
//!
//! The service keeps no state of its own beyond the store and a clock. All
//! query results are fresh vectors; the store is never reordered.

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::model::{NewTask, Priority, SortField, Task, UserHandle};
use crate::store::TaskStore;

/// Source of creation timestamps
pub type Clock = Box<dyn Fn() -> NaiveDateTime>;

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Combined filter; every criterion that is set must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub keyword: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    /// Inclusive `(from, to)` bounds on `due_at`
    pub due_range: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.keyword.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.due_range.is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(keyword) = self.keyword.as_deref() {
            if !matches_keyword(task, &keyword.to_lowercase()) {
                return false;
            }
        }
        if let Some(completed) = self.completed {
            if task.completed != completed {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some((from, to)) = self.due_range {
            if !due_within(task, from, to) {
                return false;
            }
        }
        true
    }
}

fn matches_keyword(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle) || task.description.to_lowercase().contains(needle)
}

fn due_within(task: &Task, from: NaiveDateTime, to: NaiveDateTime) -> bool {
    task.due_at >= from && task.due_at <= to
}

pub struct TaskService<S> {
    store: S,
    clock: Clock,
}

impl<S: TaskStore> TaskService<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Box::new(local_now))
    }

    pub fn with_clock(store: S, clock: Clock) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Create a task with the next free id, `completed = false` and
    /// `created_at` taken from the clock
    pub fn add_task(&mut self, user: &UserHandle, new: NewTask) -> Result<Task> {
        let created_at = (self.clock)();
        let task = self.store.insert_new(user, |id| {
            Task::new(
                id,
                new.title,
                new.description,
                new.priority,
                new.due_at,
                created_at,
            )
        })?;
        tracing::debug!(user = user.username(), id = task.id, "task created");
        Ok(task)
    }

    pub fn get_all(&self, user: &UserHandle) -> Result<Vec<Task>> {
        self.store.get_all(user)
    }

    pub fn find_task(&self, user: &UserHandle, id: u64) -> Result<Option<Task>> {
        self.store.find_by_id(user, id)
    }

    /// Set the completion flag; `false` if no task has this id
    pub fn mark_completed(&mut self, user: &UserHandle, id: u64, completed: bool) -> Result<bool> {
        let Some(mut task) = self.store.find_by_id(user, id)? else {
            return Ok(false);
        };
        task.completed = completed;
        self.store.update(user, task)
    }

    /// Delete by id; `false` if no task had this id
    pub fn delete_task(&mut self, user: &UserHandle, id: u64) -> Result<bool> {
        self.store.delete_by_id(user, id)
    }

    /// Case-insensitive substring match on title or description.
    /// An empty keyword matches everything.
    pub fn search_tasks(&self, user: &UserHandle, keyword: &str) -> Result<Vec<Task>> {
        let needle = keyword.to_lowercase();
        self.select(user, |task| matches_keyword(task, &needle))
    }

    pub fn filter_by_completion(&self, user: &UserHandle, completed: bool) -> Result<Vec<Task>> {
        self.select(user, |task| task.completed == completed)
    }

    pub fn filter_by_priority(&self, user: &UserHandle, priority: Priority) -> Result<Vec<Task>> {
        self.select(user, |task| task.priority == priority)
    }

    /// Tasks due within `[from, to]`, bounds included. Empty when `from > to`.
    pub fn filter_by_due_range(
        &self,
        user: &UserHandle,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Task>> {
        self.select(user, |task| due_within(task, from, to))
    }

    pub fn filter_tasks(&self, user: &UserHandle, filter: &TaskFilter) -> Result<Vec<Task>> {
        self.select(user, |task| filter.matches(task))
    }

    /// Stable ascending sort of a copy of the user's tasks
    pub fn sort_tasks(&self, user: &UserHandle, field: SortField) -> Result<Vec<Task>> {
        let mut tasks = self.store.get_all(user)?;
        sort_by_field(&mut tasks, field);
        Ok(tasks)
    }

    fn select<P>(&self, user: &UserHandle, predicate: P) -> Result<Vec<Task>>
    where
        P: Fn(&Task) -> bool,
    {
        let mut tasks = self.store.get_all(user)?;
        tasks.retain(|task| predicate(task));
        Ok(tasks)
    }
}

/// Stable sort; equal keys keep their relative order
pub fn sort_by_field(tasks: &mut [Task], field: SortField) {
    match field {
        SortField::Priority => tasks.sort_by_key(|task| task.priority),
        SortField::DueAt => tasks.sort_by_key(|task| task.due_at),
        SortField::CreatedAt => tasks.sort_by_key(|task| task.created_at),
    }
}
