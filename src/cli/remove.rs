//! `taskdash rm` - delete a task.

use serde::Serialize;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskStore;

use super::{resolve_task_id, short_id};

#[derive(Serialize)]
struct RmData {
    id: String,
    title: String,
    remaining: usize,
}

pub fn run(store: &mut TaskStore, id: &str, output: OutputOptions) -> Result<()> {
    let id = resolve_task_id(store, id)?;
    let title = store
        .get(&id)
        .map(|task| task.title.clone())
        .unwrap_or_default();

    store.remove(&id);

    let mut human = HumanOutput::new(format!("Deleted \"{title}\""));
    human.push_summary("id", short_id(&id));
    human.push_summary("remaining", store.len().to_string());

    emit_success(
        output,
        "rm",
        &RmData {
            id,
            title,
            remaining: store.len(),
        },
        Some(&human),
    )
}
