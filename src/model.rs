//! Task records and the types the query service works with.
//!
//! Date-times are local wall-clock values with minute precision and persist
//! as `yyyy-MM-dd HH:mm`. Priorities persist by name (`LOW`/`MEDIUM`/`HIGH`).

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Persisted date-time layout
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Task priority.
///
/// Ordering follows declaration order, so `Low < Medium < High`. Sorting by
/// priority therefore puts LOW first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        Priority::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "invalid priority '{trimmed}' (expected LOW|MEDIUM|HIGH)"
                ))
            })
    }
}

/// Authenticated user, as handed out by the identity provider.
///
/// The store partitions tasks by `username`; nothing else about the user is
/// visible to the task core.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserHandle {
    username: String,
}

impl UserHandle {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    #[serde(with = "minute_format")]
    pub due_at: NaiveDateTime,
    #[serde(default)]
    pub completed: bool,
    #[serde(with = "minute_format")]
    pub created_at: NaiveDateTime,
}

impl Task {
    /// A fresh, not yet completed task
    pub fn new(
        id: u64,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        due_at: NaiveDateTime,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            priority,
            due_at: truncate_to_minute(due_at),
            completed: false,
            created_at: truncate_to_minute(created_at),
        }
    }
}

/// Fields the caller supplies when creating a task; the service fills in the rest.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_at: NaiveDateTime,
}

/// Sort key for `TaskService::sort_tasks`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Priority,
    DueAt,
    CreatedAt,
}

impl SortField {
    /// Resolve a user-facing field name. Anything unrecognised sorts by creation time.
    pub fn from_name(name: &str) -> Self {
        Self::parse_known(name).unwrap_or(SortField::CreatedAt)
    }

    /// Like `from_name`, but `None` for names that are not a sort field.
    /// Case, `_` and `-` are ignored.
    pub fn parse_known(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|ch| *ch != '_' && *ch != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "priority" => Some(SortField::Priority),
            "duedate" | "dueat" | "due" => Some(SortField::DueAt),
            "createdat" | "created" => Some(SortField::CreatedAt),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Priority => "priority",
            SortField::DueAt => "dueAt",
            SortField::CreatedAt => "createdAt",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drop seconds and sub-second precision
pub fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|v| v.with_nanosecond(0))
        .unwrap_or(value)
}

pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

mod minute_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATETIME_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(DATETIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT).map_err(serde::de::Error::custom)
    }
}
