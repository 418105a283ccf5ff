//! Derived view: ephemeral filter and search state applied on top of the
//! store's ordered snapshot. Never written back; recomputed on every read.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::task::{Task, TaskStatus};

/// Closed enumeration for the status filter selector. Validated at the
/// boundary (clap value enum on the CLI, `parse` for config values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
    Overdue,
}

impl StatusFilter {
    pub fn matches(self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == TaskStatus::Pending,
            StatusFilter::Completed => status == TaskStatus::Completed,
            StatusFilter::Overdue => status == TaskStatus::Overdue,
        }
    }

    /// Next filter in display order; used by the dashboard's filter key.
    pub fn cycle(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::Overdue,
            StatusFilter::Overdue => StatusFilter::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Pending => "pending",
            StatusFilter::Completed => "completed",
            StatusFilter::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "completed" => Ok(StatusFilter::Completed),
            "overdue" => Ok(StatusFilter::Overdue),
            other => Err(Error::InvalidArgument(format!(
                "unknown filter '{other}' (expected all|pending|completed|overdue)"
            ))),
        }
    }
}

/// Order-preserving intersection of the status filter and a case-insensitive
/// substring search over titles. An empty search matches everything.
pub fn visible_tasks<'a>(tasks: &'a [Task], filter: StatusFilter, search: &str) -> Vec<&'a Task> {
    let needle = search.trim().to_lowercase();
    tasks
        .iter()
        .filter(|task| filter.matches(task.status))
        .filter(|task| needle.is_empty() || task.title.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::task::TaskPriority;

    fn task(id: &str, title: &str, status: TaskStatus) -> Task {
        let mut task = Task::new(
            id,
            title,
            "",
            NaiveDate::from_ymd_opt(2099, 1, 1).expect("date"),
            TaskPriority::Medium,
        );
        task.status = status;
        task
    }

    #[test]
    fn filter_and_search_intersect_in_order() {
        let tasks = vec![
            task("1", "Task One", TaskStatus::Pending),
            task("2", "Task Two", TaskStatus::Completed),
            task("3", "Another Task", TaskStatus::Pending),
        ];

        let visible = visible_tasks(&tasks, StatusFilter::Pending, "task");
        let titles: Vec<&str> = visible.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Task One", "Another Task"]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let tasks = vec![
            task("1", "Buy GROCERIES", TaskStatus::Pending),
            task("2", "Walk dog", TaskStatus::Pending),
        ];

        let visible = visible_tasks(&tasks, StatusFilter::All, "groceries");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "1");
    }

    #[test]
    fn all_filter_passes_every_status() {
        let tasks = vec![
            task("1", "A", TaskStatus::Pending),
            task("2", "B", TaskStatus::Completed),
            task("3", "C", TaskStatus::Overdue),
        ];
        assert_eq!(visible_tasks(&tasks, StatusFilter::All, "").len(), 3);
        assert_eq!(visible_tasks(&tasks, StatusFilter::Overdue, "").len(), 1);
    }

    #[test]
    fn cycle_covers_all_variants() {
        let mut filter = StatusFilter::All;
        for _ in 0..4 {
            filter = filter.cycle();
        }
        assert_eq!(filter, StatusFilter::All);
    }

    #[test]
    fn from_str_rejects_unknown_values() {
        assert_eq!("pending".parse::<StatusFilter>().expect("parse"), StatusFilter::Pending);
        assert!("urgent".parse::<StatusFilter>().is_err());
    }
}
