//! `taskdash done` and `taskdash status` - status transitions.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskStore;
use crate::task::TaskStatus;

use super::{resolve_task_id, short_id};

#[derive(Serialize)]
struct StatusData<'a> {
    id: &'a str,
    title: &'a str,
    status: TaskStatus,
}

/// Toggle: completed goes back to pending, anything else becomes
/// completed.
pub fn run_toggle(store: &mut TaskStore, id: &str, output: OutputOptions) -> Result<()> {
    let id = resolve_task_id(store, id)?;
    store.toggle_status(&id);
    emit(store, &id, "done", output)
}

/// Set the status explicitly; the only way to hand-mark a task overdue
/// or to pull an overdue task back to pending.
pub fn run_set(
    store: &mut TaskStore,
    id: &str,
    status: TaskStatus,
    output: OutputOptions,
) -> Result<()> {
    let id = resolve_task_id(store, id)?;
    store.set_status(&id, status);
    emit(store, &id, "status", output)
}

fn emit(store: &TaskStore, id: &str, command: &str, output: OutputOptions) -> Result<()> {
    let task = store
        .get(id)
        .ok_or_else(|| Error::OperationFailed("task missing after status change".to_string()))?;

    let mut human = HumanOutput::new(format!("\"{}\" is now {}", task.title, task.status));
    human.push_summary("id", short_id(&task.id));
    human.push_summary("status", task.status.as_str());

    emit_success(
        output,
        command,
        &StatusData {
            id: &task.id,
            title: &task.title,
            status: task.status,
        },
        Some(&human),
    )
}
