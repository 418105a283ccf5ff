use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::task::{Task, TaskPriority, TaskStatus};
use crate::view::StatusFilter;

use super::app::AppState;

const ID_WIDTH: usize = 8;
const PRIORITY_WIDTH: usize = 6;
const DATE_WIDTH: usize = 10;
const HELP_KEY_WIDTH: usize = 12;

const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER: Color = Color::Rgb(92, 126, 166);

pub fn render(frame: &mut Frame, app: &mut AppState) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    render_header(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);

    if app.show_help {
        render_help_modal(frame, area);
    }
}

fn render_header(frame: &mut Frame, app: &AppState, area: Rect) {
    let filters = [
        StatusFilter::All,
        StatusFilter::Pending,
        StatusFilter::Completed,
        StatusFilter::Overdue,
    ];

    let mut spans = vec![
        Span::styled(
            "taskdash",
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];
    for (idx, filter) in filters.into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(COLOR_MUTED_DARK)));
        }
        let style = if filter == app.filter {
            Style::default()
                .fg(COLOR_INFO)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(COLOR_MUTED)
        };
        spans.push(Span::styled(filter.as_str(), style));
    }

    let widget = Paragraph::new(Line::from(spans));
    frame.render_widget(widget, area);
}

fn render_list(frame: &mut Frame, app: &mut AppState, area: Rect) {
    let content_width = area.width.saturating_sub(2) as usize;
    let list_height = area.height.saturating_sub(2) as usize;

    let mut lines: Vec<Line<'static>> = Vec::new();
    if app.visible.is_empty() {
        let message = if app.snapshot.is_empty() {
            "No tasks yet. Add one with: taskdash add"
        } else {
            "No matches"
        };
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(COLOR_MUTED_DARK),
        )));
    } else {
        let (start, end) = list_window(app.visible.len(), app.selected, list_height);
        for pos in start..end {
            let Some(task) = app.task_by_id(&app.visible[pos]) else {
                continue;
            };
            let selected = app.selected == Some(pos);
            lines.push(render_list_row(task, selected, content_width));
        }
    }

    let title = format!("Tasks ({}/{})", app.visible.len(), app.snapshot.len());
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(COLOR_BORDER)),
    );
    frame.render_widget(widget, area);
}

fn render_list_row(task: &Task, selected: bool, width: usize) -> Line<'static> {
    let (marker, marker_color) = match task.status {
        TaskStatus::Pending => ("[ ]", COLOR_MUTED),
        TaskStatus::Completed => ("[x]", COLOR_SUCCESS),
        TaskStatus::Overdue => ("[!]", COLOR_ERROR),
    };
    let id_text = pad_text(short_id(&task.id), ID_WIDTH);
    let priority_text = pad_text(task.priority.as_str(), PRIORITY_WIDTH);
    let date_text = pad_text(&task.due_date.to_string(), DATE_WIDTH);

    let used = 3 + ID_WIDTH + PRIORITY_WIDTH + DATE_WIDTH + 4;
    let title = truncate_text(&task.title, width.saturating_sub(used));

    let title_style = if task.status == TaskStatus::Completed {
        Style::default()
            .fg(COLOR_MUTED_DARK)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(COLOR_TEXT)
    };

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(marker_color)),
        Span::raw(" "),
        Span::styled(id_text, Style::default().fg(COLOR_MUTED)),
        Span::raw(" "),
        Span::styled(
            priority_text,
            Style::default()
                .fg(priority_color(task.priority))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(date_text, Style::default().fg(COLOR_WARNING)),
        Span::raw(" "),
        Span::styled(title, title_style),
    ];

    if selected {
        for span in &mut spans {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
    }

    Line::from(spans)
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let status_line = if app.search_active {
        Line::from(vec![
            Span::styled("search: ", Style::default().fg(COLOR_MUTED_DARK)),
            Span::styled(
                format!("{}_", app.search),
                Style::default().fg(COLOR_INFO),
            ),
        ])
    } else if let Some(info) = app.info_message.as_ref() {
        Line::from(Span::styled(
            info.clone(),
            Style::default().fg(COLOR_WARNING),
        ))
    } else if !app.search.is_empty() {
        Line::from(vec![
            Span::styled("search: ", Style::default().fg(COLOR_MUTED_DARK)),
            Span::styled(app.search.clone(), Style::default().fg(COLOR_INFO)),
        ])
    } else {
        Line::from(Span::styled(
            "j/k move  space toggle  d delete  J/K reorder  / search  f filter  ? help  q quit",
            Style::default().fg(COLOR_INFO),
        ))
    };

    let (pending, completed, overdue) = app.counts();
    let counts_line = Line::from(Span::styled(
        format!("pending: {pending}  completed: {completed}  overdue: {overdue}"),
        Style::default().fg(COLOR_ACCENT),
    ));

    let widget = Paragraph::new(vec![status_line, counts_line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(COLOR_BORDER)),
        );
    frame.render_widget(widget, area);
}

fn render_help_modal(frame: &mut Frame, area: Rect) {
    let width = 46u16.min(area.width.saturating_sub(4));
    let height = 14u16.min(area.height.saturating_sub(2));
    let modal = centered_rect(width, height, area);
    frame.render_widget(Clear, modal);

    let content_width = width.saturating_sub(2) as usize;
    let lines = vec![
        help_line("j/k, arrows", "move selection", content_width),
        help_line("space", "toggle completed", content_width),
        help_line("d, delete", "delete task", content_width),
        help_line("J/K", "move task down/up", content_width),
        help_line("/", "search titles", content_width),
        help_line("f, tab", "cycle status filter", content_width),
        help_line("esc", "clear search / quit", content_width),
        help_line("q", "quit", content_width),
        Line::from(""),
        Line::from(Span::styled(
            "press any key to close",
            Style::default().fg(COLOR_MUTED_DARK),
        )),
    ];

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Keys"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn help_line(keys: &str, desc: &str, width: usize) -> Line<'static> {
    let key_text = pad_text(keys, HELP_KEY_WIDTH.min(width));
    let desc_text = truncate_text(desc, width.saturating_sub(HELP_KEY_WIDTH + 1));
    Line::from(vec![
        Span::styled(
            key_text,
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(desc_text, Style::default().fg(COLOR_MUTED)),
    ])
}

fn priority_color(priority: TaskPriority) -> Color {
    match priority {
        TaskPriority::High => COLOR_ERROR,
        TaskPriority::Medium => COLOR_WARNING,
        TaskPriority::Low => COLOR_MUTED_DARK,
    }
}

fn short_id(id: &str) -> &str {
    id.get(..ID_WIDTH).unwrap_or(id)
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    if total <= height {
        return (0, total);
    }
    let selected = selected.unwrap_or(0);
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn pad_text(value: &str, width: usize) -> String {
    let mut text = value.to_string();
    if text.chars().count() > width {
        text = truncate_text(&text, width);
    }
    format!("{text:width$}")
}

fn truncate_text(value: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return chars[..max].iter().collect();
    }
    let mut out: String = chars[..(max - 3)].iter().collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_centers_on_selection() {
        assert_eq!(list_window(10, Some(5), 4), (3, 7));
        assert_eq!(list_window(10, Some(0), 4), (0, 4));
        assert_eq!(list_window(10, Some(9), 4), (6, 10));
        assert_eq!(list_window(3, Some(1), 10), (0, 3));
        assert_eq!(list_window(0, None, 4), (0, 0));
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a rather long title", 10), "a rathe...");
        assert_eq!(truncate_text("abc", 2), "ab");
    }
}
