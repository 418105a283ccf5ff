//! Command-line interface for taskdash
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputOptions;
use crate::storage::{self, JsonFileStore};
use crate::store::TaskStore;
use crate::task::{TaskPriority, TaskStatus};
use crate::view::StatusFilter;

mod add;
mod dash;
mod edit;
mod list;
mod remove;
mod reorder;
mod status;

/// Longest accepted task title, in characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Longest accepted task description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// taskdash - Task Dashboard
///
/// A local task list with due dates, priorities, automatic overdue
/// tracking, and an interactive terminal dashboard.
#[derive(Parser, Debug)]
#[command(name = "taskdash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the task state file (defaults to the platform
    /// data directory)
    #[arg(long, global = true, env = "TASKDASH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,

        /// Longer free-form description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Task priority
        #[arg(long, value_enum, default_value_t = TaskPriority::Medium)]
        priority: TaskPriority,
    },

    /// List tasks, marking overdue ones along the way
    List {
        /// Show only tasks with this status
        #[arg(short, long, value_enum)]
        filter: Option<StatusFilter>,

        /// Case-insensitive title substring to search for
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Edit fields of an existing task
    Edit {
        /// Task id (a unique prefix is enough)
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New due date (YYYY-MM-DD, today or later)
        #[arg(long)]
        due: Option<String>,

        /// New priority
        #[arg(long, value_enum)]
        priority: Option<TaskPriority>,

        /// New status
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
    },

    /// Toggle a task between completed and not
    Done {
        /// Task id (a unique prefix is enough)
        id: String,
    },

    /// Set a task's status explicitly
    Status {
        /// Task id (a unique prefix is enough)
        id: String,

        /// Status to set
        #[arg(value_enum)]
        status: TaskStatus,
    },

    /// Delete a task
    Rm {
        /// Task id (a unique prefix is enough)
        id: String,
    },

    /// Replace the task order with the given id sequence
    Reorder {
        /// Every task id, in the desired order
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Move a task to a new position in the order
    Move {
        /// Task id (a unique prefix is enough)
        id: String,

        /// Target position, zero-based from the top
        #[arg(long)]
        to: usize,
    },

    /// Open the interactive dashboard
    Dash {
        /// Status filter to start with
        #[arg(short, long, value_enum)]
        filter: Option<StatusFilter>,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let options = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };
        let config = Config::discover();
        let mut store = open_store(self.data_dir.as_deref(), &config)?;

        match self.command {
            Commands::Add {
                title,
                due,
                description,
                priority,
            } => add::run(
                &mut store,
                add::AddOptions {
                    title,
                    due,
                    description,
                    priority,
                },
                options,
            ),
            Commands::List { filter, search } => list::run(
                &mut store,
                list::ListOptions {
                    filter: filter.unwrap_or_else(|| config.default_filter()),
                    search,
                },
                options,
            ),
            Commands::Edit {
                id,
                title,
                description,
                due,
                priority,
                status,
            } => edit::run(
                &mut store,
                edit::EditOptions {
                    id,
                    title,
                    description,
                    due,
                    priority,
                    status,
                },
                options,
            ),
            Commands::Done { id } => status::run_toggle(&mut store, &id, options),
            Commands::Status { id, status } => {
                status::run_set(&mut store, &id, status, options)
            }
            Commands::Rm { id } => remove::run(&mut store, &id, options),
            Commands::Reorder { ids } => reorder::run_reorder(&mut store, ids, options),
            Commands::Move { id, to } => reorder::run_move(&mut store, &id, to, options),
            Commands::Dash { filter } => dash::run(
                store,
                filter.unwrap_or_else(|| config.default_filter()),
            ),
        }
    }
}

/// Open the store at the resolved data directory: `--data-dir` (or the
/// environment) wins, then the config file, then the platform default.
fn open_store(flag: Option<&Path>, config: &Config) -> Result<TaskStore> {
    let data_dir = match flag {
        Some(dir) => dir.to_path_buf(),
        None => match &config.storage.data_dir {
            Some(dir) => dir.clone(),
            None => storage::default_data_dir()?,
        },
    };

    tracing::debug!(data_dir = %data_dir.display(), "opening task store");
    Ok(TaskStore::open(Box::new(JsonFileStore::new(data_dir))))
}

/// Resolve user input to a stored task id: exact match first, then a
/// unique case-insensitive prefix.
pub(crate) fn resolve_task_id(store: &TaskStore, input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
    }

    if let Some(task) = store.get(trimmed) {
        return Ok(task.id.clone());
    }

    let needle = trimmed.to_lowercase();
    let matches: Vec<&str> = store
        .tasks()
        .iter()
        .filter(|task| task.id.to_lowercase().starts_with(&needle))
        .map(|task| task.id.as_str())
        .collect();

    match matches.as_slice() {
        [] => Err(Error::TaskNotFound(trimmed.to_string())),
        [only] => Ok(only.to_string()),
        many => Err(Error::InvalidArgument(format!(
            "task id '{trimmed}' is ambiguous: matches {}",
            many.join(", ")
        ))),
    }
}

pub(crate) fn validate_title(title: &str) -> Result<()> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("title cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(Error::InvalidArgument(format!(
            "title exceeds {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

pub(crate) fn validate_description(description: &str) -> Result<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(Error::InvalidArgument(format!(
            "description exceeds {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

/// Short display form of a task id (UUIDs are unwieldy in a table).
pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::task::Task;

    fn store_with(ids: &[&str]) -> TaskStore {
        let mut store = TaskStore::in_memory();
        for id in ids.iter().rev() {
            store.add(Task::new(
                *id,
                "Task",
                "",
                NaiveDate::from_ymd_opt(2099, 1, 1).expect("date"),
                TaskPriority::Low,
            ));
        }
        store
    }

    #[test]
    fn resolve_exact_id_wins() {
        let store = store_with(&["abc-1", "abc-12"]);
        assert_eq!(resolve_task_id(&store, "abc-1").expect("resolve"), "abc-1");
    }

    #[test]
    fn resolve_unique_prefix() {
        let store = store_with(&["4f2a77d0", "9c01e3b2"]);
        assert_eq!(resolve_task_id(&store, "4f2").expect("resolve"), "4f2a77d0");
        assert_eq!(resolve_task_id(&store, "9C01").expect("resolve"), "9c01e3b2");
    }

    #[test]
    fn resolve_ambiguous_prefix_errors() {
        let store = store_with(&["4f2a77d0", "4f2b9911"]);
        let err = resolve_task_id(&store, "4f2").expect_err("ambiguous");
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn resolve_unknown_id_errors() {
        let store = store_with(&["abc"]);
        let err = resolve_task_id(&store, "zzz").expect_err("unknown");
        assert!(matches!(err, Error::TaskNotFound(_)));
    }

    #[test]
    fn title_validation_limits() {
        assert!(validate_title("Write report").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(MAX_TITLE_LEN)).is_ok());
        assert!(validate_title(&"x".repeat(MAX_TITLE_LEN + 1)).is_err());
    }

    #[test]
    fn description_validation_limits() {
        assert!(validate_description("").is_ok());
        assert!(validate_description(&"x".repeat(MAX_DESCRIPTION_LEN)).is_ok());
        assert!(validate_description(&"x".repeat(MAX_DESCRIPTION_LEN + 1)).is_err());
    }

    #[test]
    fn short_id_truncates_uuids() {
        assert_eq!(short_id("4f2a77d0-aaaa-bbbb-cccc-121212121212"), "4f2a77d0");
        assert_eq!(short_id("tiny"), "tiny");
    }
}
