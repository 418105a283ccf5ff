//! `taskdash add` - create a new task at the head of the list.

use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskStore;
use crate::task::{self, Task, TaskPriority};

use super::{short_id, validate_description, validate_title};

pub struct AddOptions {
    pub title: String,
    pub due: String,
    pub description: String,
    pub priority: TaskPriority,
}

#[derive(Serialize)]
struct AddData<'a> {
    task: &'a Task,
}

pub fn run(store: &mut TaskStore, opts: AddOptions, output: OutputOptions) -> Result<()> {
    validate_title(&opts.title)?;
    validate_description(&opts.description)?;
    let due_date = task::parse_due_date(&opts.due)?;

    let id = Uuid::new_v4().to_string();
    store.add(Task::new(
        id.clone(),
        opts.title.trim(),
        opts.description,
        due_date,
        opts.priority,
    ));

    // Read back the stored record so the output carries the stamped
    // created_at.
    let task = store
        .get(&id)
        .ok_or_else(|| Error::OperationFailed("task missing after add".to_string()))?;

    let mut human = HumanOutput::new(format!("Added \"{}\"", task.title));
    human.push_summary("id", short_id(&task.id));
    human.push_summary("due", task.due_date.to_string());
    human.push_summary("priority", task.priority.as_str());

    emit_success(output, "add", &AddData { task }, Some(&human))
}
