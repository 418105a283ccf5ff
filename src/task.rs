//! Task data model.
//!
//! A task is a flat record: the store keeps them in an explicit user-defined
//! sequence (never sorted by any field). Due dates are calendar days in
//! `YYYY-MM-DD` form with no time-of-day or timezone offset.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Task status lifecycle: `pending ↔ completed` via toggle, `pending →
/// overdue` automatically once the due date has passed. An overdue task only
/// leaves that state through an explicit status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
    Overdue,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque unique identifier, supplied by the caller before insertion.
    /// The store never generates ids.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Serializes as `YYYY-MM-DD`.
    pub due_date: NaiveDate,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// Epoch milliseconds, stamped by the store at insertion time.
    #[serde(default)]
    pub created_at: i64,
}

impl Task {
    /// Build a new pending task. `created_at` is left at zero; the store
    /// overwrites it unconditionally on `add`.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: NaiveDate,
        priority: TaskPriority,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            due_date,
            priority,
            status: TaskStatus::Pending,
            created_at: 0,
        }
    }

    /// Whether the due date (interpreted as local start-of-day) is strictly
    /// before `now`. A task due today counts as past due once the day has
    /// started.
    pub fn is_past_due(&self, now: NaiveDateTime) -> bool {
        self.due_date.and_time(NaiveTime::MIN) < now
    }
}

/// Partial field merge applied by `TaskStore::update`. Unset fields are left
/// untouched on the target task.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }

    pub(crate) fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

/// Parse a `YYYY-MM-DD` due date string.
pub fn parse_due_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        Error::InvalidArgument(format!(
            "invalid due date '{trimmed}' (expected YYYY-MM-DD)"
        ))
    })
}
