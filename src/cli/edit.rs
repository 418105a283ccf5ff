//! `taskdash edit` - patch fields of an existing task.

use chrono::Local;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskStore;
use crate::task::{self, Task, TaskPatch, TaskPriority, TaskStatus};

use super::{resolve_task_id, short_id, validate_description, validate_title};

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
}

#[derive(Serialize)]
struct EditData<'a> {
    task: &'a Task,
    changed: Vec<&'static str>,
}

pub fn run(store: &mut TaskStore, opts: EditOptions, output: OutputOptions) -> Result<()> {
    let id = resolve_task_id(store, &opts.id)?;

    let mut changed = Vec::new();
    let mut patch = TaskPatch::default();

    if let Some(title) = opts.title {
        validate_title(&title)?;
        patch.title = Some(title.trim().to_string());
        changed.push("title");
    }
    if let Some(description) = opts.description {
        validate_description(&description)?;
        patch.description = Some(description);
        changed.push("description");
    }
    if let Some(due) = opts.due {
        let due_date = task::parse_due_date(&due)?;
        // Rescheduling into the past would be promoted right back to
        // overdue, so reject it up front.
        if due_date < Local::now().date_naive() {
            return Err(Error::InvalidArgument(format!(
                "due date {due_date} is in the past"
            )));
        }
        patch.due_date = Some(due_date);
        changed.push("due_date");
    }
    if let Some(priority) = opts.priority {
        patch.priority = Some(priority);
        changed.push("priority");
    }
    if let Some(status) = opts.status {
        patch.status = Some(status);
        changed.push("status");
    }

    if patch.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to change; pass at least one of --title, --description, --due, --priority, --status".to_string(),
        ));
    }

    store.update(&id, patch);

    let task = store
        .get(&id)
        .ok_or_else(|| Error::OperationFailed("task missing after edit".to_string()))?;

    let mut human = HumanOutput::new(format!("Updated \"{}\"", task.title));
    human.push_summary("id", short_id(&task.id));
    human.push_summary("changed", changed.join(", "));

    emit_success(output, "edit", &EditData { task, changed }, Some(&human))
}
