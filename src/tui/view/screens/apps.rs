use crate::queue::{OperationKind, TaskQueue};
use crate::selection::{Screen, SelectionController};
use crate::tui::view::components::modal::status_color;
use crate::utils::format_mb;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, ListState};
use ratatui::Frame;

pub fn render_selection(
    f: &mut Frame,
    area: Rect,
    list_state: &mut ListState,
    selection: &SelectionController,
    queue: &TaskQueue,
    high_cache_threshold_mb: u64,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let items: Vec<ListItem> = selection
        .candidates()
        .map(|app| {
            let checkbox = if selection.is_selected(&app.id) {
                Span::styled("[x] ", Style::default().fg(Color::Green))
            } else {
                Span::raw("[ ] ")
            };
            let detail = match selection.screen() {
                Screen::Cache => Span::styled(
                    format_mb(app.cache_mb()),
                    Style::default().fg(if app.cache_mb() > high_cache_threshold_mb {
                        Color::Red
                    } else {
                        Color::Cyan
                    }),
                ),
                _ => Span::styled(app.last_used.clone(), Style::default().fg(Color::DarkGray)),
            };
            ListItem::new(Line::from(vec![
                checkbox,
                Span::raw(format!("{} ", app.icon)),
                Span::styled(
                    format!("{:<14}", app.name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:<30}", app.package_name),
                    Style::default().fg(Color::Gray),
                ),
                detail,
            ]))
        })
        .collect();

    let mut title = format!(
        " {} ({}/{} selected",
        selection.screen().title(),
        selection.len(),
        selection.candidate_count()
    );
    if selection.screen() == Screen::Cache {
        title.push_str(&format!(", {}", format_mb(selection.selected_cache_mb())));
    }
    title.push_str(") ");

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[0], list_state);

    let kind = match selection.screen() {
        Screen::Kill => Some(OperationKind::Kill),
        Screen::Cache => Some(OperationKind::Cache),
        Screen::QuickClean => None,
    };
    render_queue(f, chunks[1], queue, kind);
}

fn render_queue(f: &mut Frame, area: Rect, queue: &TaskQueue, kind: Option<OperationKind>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let progress = queue.progress(kind);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Progress "))
        .gauge_style(Style::default().fg(Color::Green))
        .label(format!("{}/{}", progress.completed, progress.total))
        .ratio(progress.ratio());
    f.render_widget(gauge, chunks[0]);

    let items: Vec<ListItem> = queue
        .query(kind)
        .into_iter()
        .rev()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", entry.status.icon())),
                Span::styled(
                    format!("{:<14}", entry.app_name),
                    Style::default().fg(status_color(entry.status)),
                ),
                Span::styled(entry.status.to_string(), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Queue "));
    f.render_widget(list, chunks[1]);
}
