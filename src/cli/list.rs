//! `taskdash list` - render the filtered task list.
//!
//! Listing is a view, so the overdue sweep runs first: any pending task
//! whose due date has passed is promoted before the rows are printed.

use chrono::Local;
use serde::Serialize;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskStore;
use crate::task::{Task, TaskStatus};
use crate::view::{visible_tasks, StatusFilter};

use super::short_id;

pub struct ListOptions {
    pub filter: StatusFilter,
    pub search: String,
}

#[derive(Serialize)]
struct ListData<'a> {
    filter: &'static str,
    search: &'a str,
    total: usize,
    tasks: Vec<&'a Task>,
}

pub fn run(store: &mut TaskStore, opts: ListOptions, output: OutputOptions) -> Result<()> {
    let promoted = store.sweep_overdue(Local::now().naive_local());

    let snapshot = store.snapshot();
    let visible = visible_tasks(&snapshot, opts.filter, &opts.search);

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("filter", opts.filter.as_str());
    if !opts.search.trim().is_empty() {
        human.push_summary("search", opts.search.trim());
    }
    human.push_summary(
        "showing",
        format!("{} of {}", visible.len(), snapshot.len()),
    );

    if visible.is_empty() {
        human.push_detail("no matching tasks");
    }
    for task in &visible {
        human.push_detail(format_row(task));
    }
    if promoted > 0 {
        human.push_warning(format!("{promoted} task(s) are now overdue"));
    }

    let data = ListData {
        filter: opts.filter.as_str(),
        search: opts.search.trim(),
        total: snapshot.len(),
        tasks: visible,
    };

    emit_success(output, "list", &data, Some(&human))
}

fn format_row(task: &Task) -> String {
    let marker = match task.status {
        TaskStatus::Pending => ' ',
        TaskStatus::Completed => 'x',
        TaskStatus::Overdue => '!',
    };
    format!(
        "[{marker}] {:<8} {:<6} {} {}",
        short_id(&task.id),
        task.priority.as_str(),
        task.due_date,
        task.title
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::task::TaskPriority;

    #[test]
    fn row_shows_status_marker_and_fields() {
        let mut task = Task::new(
            "4f2a77d0-aaaa-bbbb-cccc-121212121212",
            "Write report",
            "",
            NaiveDate::from_ymd_opt(2026, 3, 1).expect("date"),
            TaskPriority::High,
        );
        task.status = TaskStatus::Overdue;

        let row = format_row(&task);
        assert!(row.starts_with("[!] 4f2a77d0"));
        assert!(row.contains("high"));
        assert!(row.contains("2026-03-01"));
        assert!(row.ends_with("Write report"));
    }
}
