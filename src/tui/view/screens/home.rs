use crate::catalog::Catalog;
use crate::queue::TaskQueue;
use crate::schedule::{format_days, ScheduleStore};
use crate::utils::format_mb;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

pub struct HomeData<'a> {
    pub catalog: &'a Catalog,
    pub schedules: &'a ScheduleStore,
    pub queue: &'a TaskQueue,
}

pub fn render_home(f: &mut Frame, area: Rect, list_state: &mut ListState, data: &HomeData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(5)])
        .split(area);

    render_stats(f, chunks[0], data);

    let items: Vec<ListItem> = data
        .schedules
        .list()
        .iter()
        .map(|schedule| {
            let (marker, color) = if schedule.enabled {
                ("● on ", Color::Green)
            } else {
                ("○ off", Color::DarkGray)
            };
            let when = if schedule.days.is_empty() {
                schedule.schedule.clone()
            } else {
                format!("{} · {}", schedule.schedule, format_days(&schedule.days))
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}  ", marker), Style::default().fg(color)),
                Span::raw(format!("{} ", schedule.kind.icon())),
                Span::styled(
                    format!("{:<20}", schedule.name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{:<14}", schedule.kind.label())),
                Span::styled(when, Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("  {} apps", schedule.selected_apps.len()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let title = format!(
        " Scheduled cleanups ({} active) ",
        data.schedules.active_count()
    );
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[1], list_state);
}

fn render_stats(f: &mut Frame, area: Rect, data: &HomeData) {
    let catalog = data.catalog;
    let progress = data.queue.progress(None);

    let stat = |label: &'static str, value: String, color: Color| {
        Line::from(vec![
            Span::styled(format!("  {:<18}", label), Style::default().fg(Color::Gray)),
            Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ])
    };

    let lines = vec![
        stat(
            "Installed apps",
            catalog.apps().len().to_string(),
            Color::White,
        ),
        stat(
            "Running apps",
            catalog.running().count().to_string(),
            Color::Green,
        ),
        stat(
            "Reclaimable cache",
            format_mb(catalog.total_cache_mb()),
            Color::Cyan,
        ),
        stat(
            "Queue",
            format!(
                "{} done, {} running, {} waiting",
                progress.completed, progress.processing, progress.pending
            ),
            Color::Yellow,
        ),
    ];

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Device "));
    f.render_widget(paragraph, area);
}
