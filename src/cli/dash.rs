//! `taskdash dash` - hand the store to the interactive dashboard.

use crate::error::Result;
use crate::store::TaskStore;
use crate::ui::dashboard;
use crate::view::StatusFilter;

pub fn run(store: TaskStore, filter: StatusFilter) -> Result<()> {
    dashboard::run(store, filter)
}
