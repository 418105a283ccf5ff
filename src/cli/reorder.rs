//! `taskdash reorder` and `taskdash move` - explicit ordering.
//!
//! The store itself tolerates partial id lists, but at the command line a
//! typo should not silently shuffle tasks to the bottom. Both commands
//! therefore hand the store a verified permutation of the full id set.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskStore;

use super::{resolve_task_id, short_id};

#[derive(Serialize)]
struct ReorderData {
    order: Vec<String>,
}

pub fn run_reorder(store: &mut TaskStore, ids: Vec<String>, output: OutputOptions) -> Result<()> {
    let mut resolved = Vec::with_capacity(ids.len());
    let mut seen = HashSet::new();
    for id in &ids {
        let full = resolve_task_id(store, id)?;
        if !seen.insert(full.clone()) {
            return Err(Error::InvalidArgument(format!(
                "task id '{id}' given more than once"
            )));
        }
        resolved.push(full);
    }

    if resolved.len() != store.len() {
        let missing: Vec<&str> = store
            .tasks()
            .iter()
            .filter(|task| !seen.contains(&task.id))
            .map(|task| short_id(&task.id))
            .collect();
        return Err(Error::InvalidArgument(format!(
            "reorder needs every task id exactly once; missing: {}",
            missing.join(", ")
        )));
    }

    store.reorder(&resolved);
    emit(store, "reorder", output)
}

pub fn run_move(store: &mut TaskStore, id: &str, to: usize, output: OutputOptions) -> Result<()> {
    let id = resolve_task_id(store, id)?;

    if to >= store.len() {
        return Err(Error::InvalidArgument(format!(
            "position {to} is out of range (0..={})",
            store.len().saturating_sub(1)
        )));
    }

    let mut order: Vec<String> = store.tasks().iter().map(|task| task.id.clone()).collect();
    let from = order
        .iter()
        .position(|candidate| *candidate == id)
        .ok_or_else(|| Error::TaskNotFound(id.clone()))?;

    let moved = order.remove(from);
    order.insert(to, moved);

    store.reorder(&order);
    emit(store, "move", output)
}

fn emit(store: &TaskStore, command: &str, output: OutputOptions) -> Result<()> {
    let order: Vec<String> = store.tasks().iter().map(|task| task.id.clone()).collect();

    let mut human = HumanOutput::new("Reordered");
    for (position, task) in store.tasks().iter().enumerate() {
        human.push_detail(format!("{position}. {} {}", short_id(&task.id), task.title));
    }

    emit_success(output, command, &ReorderData { order }, Some(&human))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::task::{Task, TaskPriority};

    fn store_with(ids: &[&str]) -> TaskStore {
        let mut store = TaskStore::in_memory();
        for id in ids.iter().rev() {
            store.add(Task::new(
                *id,
                format!("Task {id}"),
                "",
                NaiveDate::from_ymd_opt(2099, 1, 1).expect("date"),
                TaskPriority::Low,
            ));
        }
        store
    }

    fn quiet() -> OutputOptions {
        OutputOptions {
            json: false,
            quiet: true,
        }
    }

    fn ids(store: &TaskStore) -> Vec<&str> {
        store.tasks().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn reorder_requires_full_permutation() {
        let mut store = store_with(&["alpha", "beta", "gamma"]);

        let err = run_reorder(
            &mut store,
            vec!["alpha".to_string(), "beta".to_string()],
            quiet(),
        )
        .expect_err("partial list");
        assert!(matches!(err, Error::InvalidArgument(_)));
        // Order untouched on failure.
        assert_eq!(ids(&store), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn reorder_rejects_duplicates() {
        let mut store = store_with(&["alpha", "beta"]);
        let err = run_reorder(
            &mut store,
            vec!["alpha".to_string(), "alpha".to_string()],
            quiet(),
        )
        .expect_err("duplicate");
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn reorder_applies_resolved_prefixes() {
        let mut store = store_with(&["alpha", "beta", "gamma"]);
        run_reorder(
            &mut store,
            vec!["g".to_string(), "a".to_string(), "b".to_string()],
            quiet(),
        )
        .expect("reorder");
        assert_eq!(ids(&store), vec!["gamma", "alpha", "beta"]);
    }

    #[test]
    fn move_shifts_within_bounds() {
        let mut store = store_with(&["alpha", "beta", "gamma"]);

        run_move(&mut store, "gamma", 0, quiet()).expect("move");
        assert_eq!(ids(&store), vec!["gamma", "alpha", "beta"]);

        let err = run_move(&mut store, "gamma", 7, quiet()).expect_err("out of range");
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
