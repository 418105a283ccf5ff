use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::error::Result;
use crate::store::TaskStore;
use crate::task::Task;
use crate::view::StatusFilter;

use super::view;

const EVENT_POLL_MS: u64 = 120;

pub struct AppState {
    pub(crate) snapshot: Arc<Vec<Task>>,
    /// Ids of the tasks currently visible, in store order.
    pub(crate) visible: Vec<String>,
    /// Index into `visible`.
    pub(crate) selected: Option<usize>,
    pub(crate) search: String,
    pub(crate) search_active: bool,
    pub(crate) filter: StatusFilter,
    pub(crate) info_message: Option<String>,
    pub(crate) show_help: bool,
    store: TaskStore,
}

impl AppState {
    fn new(store: TaskStore, filter: StatusFilter) -> Self {
        let mut app = Self {
            snapshot: store.snapshot(),
            visible: Vec::new(),
            selected: None,
            search: String::new(),
            search_active: false,
            filter,
            info_message: None,
            show_help: false,
            store,
        };
        app.refresh();
        app
    }

    /// Re-run the overdue sweep, take a fresh snapshot when anything
    /// changed, and recompute the visible rows.
    fn refresh(&mut self) {
        self.store.sweep_overdue(Local::now().naive_local());

        let snapshot = self.store.snapshot();
        if !Arc::ptr_eq(&self.snapshot, &snapshot) {
            self.snapshot = snapshot;
        }

        self.visible = crate::view::visible_tasks(&self.snapshot, self.filter, &self.search)
            .into_iter()
            .map(|task| task.id.clone())
            .collect();

        self.selected = if self.visible.is_empty() {
            None
        } else {
            Some(
                self.selected
                    .unwrap_or(0)
                    .min(self.visible.len().saturating_sub(1)),
            )
        };
    }

    pub(crate) fn task_by_id(&self, id: &str) -> Option<&Task> {
        self.snapshot.iter().find(|task| task.id == id)
    }

    pub(crate) fn selected_id(&self) -> Option<&str> {
        self.selected
            .and_then(|idx| self.visible.get(idx))
            .map(String::as_str)
    }

    pub(crate) fn selected_task(&self) -> Option<&Task> {
        self.selected_id().and_then(|id| self.task_by_id(id))
    }

    pub(crate) fn counts(&self) -> (usize, usize, usize) {
        let mut pending = 0;
        let mut completed = 0;
        let mut overdue = 0;
        for task in self.snapshot.iter() {
            match task.status {
                crate::task::TaskStatus::Pending => pending += 1,
                crate::task::TaskStatus::Completed => completed += 1,
                crate::task::TaskStatus::Overdue => overdue += 1,
            }
        }
        (pending, completed, overdue)
    }

    fn move_selection(&mut self, delta: isize) {
        if self.visible.is_empty() {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        let max = self.visible.len() as isize - 1;
        self.selected = Some(current.saturating_add(delta).clamp(0, max) as usize);
    }

    fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id().map(str::to_string) {
            self.store.toggle_status(&id);
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_id().map(str::to_string) else {
            return;
        };
        let title = self
            .task_by_id(&id)
            .map(|task| task.title.clone())
            .unwrap_or_default();
        self.store.remove(&id);
        self.info_message = Some(format!("deleted \"{title}\""));
    }

    /// Swap the selected task with its visible neighbour. The swap happens
    /// in the full store order so hidden tasks keep their positions.
    fn move_selected(&mut self, delta: isize) {
        let Some(pos) = self.selected else {
            return;
        };
        let target = pos as isize + delta;
        if target < 0 || target >= self.visible.len() as isize {
            return;
        }
        let target = target as usize;

        let first = self.visible[pos].clone();
        let second = self.visible[target].clone();

        let mut order: Vec<String> = self
            .snapshot
            .iter()
            .map(|task| task.id.clone())
            .collect();
        let first_at = order.iter().position(|id| *id == first);
        let second_at = order.iter().position(|id| *id == second);
        if let (Some(a), Some(b)) = (first_at, second_at) {
            order.swap(a, b);
            self.store.reorder(&order);
            self.selected = Some(target);
        }
    }

    fn cycle_filter(&mut self) {
        self.filter = self.filter.cycle();
        self.selected = Some(0);
    }

    /// Returns false when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.info_message = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return false;
        }

        if self.show_help {
            self.show_help = false;
            return true;
        }

        if self.search_active {
            match key.code {
                KeyCode::Esc => {
                    self.search.clear();
                    self.search_active = false;
                }
                KeyCode::Enter => self.search_active = false,
                KeyCode::Backspace => {
                    self.search.pop();
                }
                KeyCode::Char(ch) => {
                    if !key.modifiers.contains(KeyModifiers::CONTROL) && !ch.is_control() {
                        self.search.push(ch);
                    }
                }
                _ => {}
            }
            return true;
        }

        match key.code {
            KeyCode::Char('q') => false,
            KeyCode::Esc => {
                if self.search.is_empty() {
                    false
                } else {
                    self.search.clear();
                    true
                }
            }
            KeyCode::Char('/') => {
                self.search_active = true;
                true
            }
            KeyCode::Char('f') | KeyCode::Tab => {
                self.cycle_filter();
                true
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                true
            }
            KeyCode::Char(' ') => {
                self.toggle_selected();
                true
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                self.delete_selected();
                true
            }
            KeyCode::Char('J') => {
                self.move_selected(1);
                true
            }
            KeyCode::Char('K') => {
                self.move_selected(-1);
                true
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                true
            }
            _ => true,
        }
    }
}

pub fn run(store: TaskStore, filter: StatusFilter) -> Result<()> {
    let mut app = AppState::new(store, filter);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        app.refresh();
        terminal.draw(|frame| view::render(frame, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if !app.handle_key(key) {
                    return Ok(());
                }
            }
        }
    }
}
