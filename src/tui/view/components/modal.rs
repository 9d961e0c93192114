use crate::queue::{QueueStatus, TaskQueue};
use crate::tui::state::ProcessingState;
use crate::tui::view::components::centered_rect;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph};
use ratatui::Frame;

pub fn status_color(status: QueueStatus) -> Color {
    match status {
        QueueStatus::Pending => Color::DarkGray,
        QueueStatus::Processing => Color::Yellow,
        QueueStatus::Completed => Color::Green,
        QueueStatus::Failed => Color::Red,
    }
}

pub struct ProcessingModalData<'a> {
    pub queue: &'a TaskQueue,
    pub processing: &'a ProcessingState,
    pub closes_in_secs: u64,
}

pub fn render_processing_modal(f: &mut Frame, data: &ProcessingModalData) {
    let area = centered_rect(70, 60, f.area());
    f.render_widget(Clear, area);

    let title = match data.processing.kind {
        Some(kind) => format!(" {} ", kind.label()),
        None => " Quick clean ".to_string(),
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let entries: Vec<_> = data
        .processing
        .entry_ids
        .iter()
        .filter_map(|id| data.queue.get(id))
        .collect();
    let done = entries.iter().filter(|e| e.status.is_terminal()).count();
    let ratio = if entries.is_empty() {
        1.0
    } else {
        done as f64 / entries.len() as f64
    };

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .label(format!("{}/{} done", done, entries.len()))
        .ratio(ratio);
    f.render_widget(gauge, chunks[0]);

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", entry.status.icon())),
                Span::styled(
                    format!("{:<14}", entry.app_name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:<11}", entry.status.to_string()),
                    Style::default().fg(status_color(entry.status)),
                ),
                Span::styled(entry.command.clone(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();
    f.render_widget(List::new(items), chunks[1]);

    let hint = Paragraph::new(Line::from(Span::styled(
        format!("Closes in {}s, Enter to dismiss", data.closes_in_secs),
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(hint, chunks[2]);
}

fn help_section(title: &'static str) -> Line<'static> {
    Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )])
}

fn help_key(key: &'static str, text: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<8}", key), Style::default().fg(Color::Cyan)),
        Span::raw(text),
    ])
}

pub fn render_help_modal(f: &mut Frame) {
    let area = centered_rect(65, 70, f.area());

    let help_text = vec![
        Line::from(vec![Span::styled(
            "apptools Help",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        help_section("Tabs"),
        help_key("Tab", "Next tab"),
        help_key("1-4", "Jump to tab"),
        Line::from(""),
        help_section("Selection"),
        help_key("Space", "Toggle app or schedule"),
        help_key("a", "Select all"),
        help_key("h", "Select apps with high cache"),
        help_key("n", "Clear selection"),
        help_key("Enter", "Queue the selection"),
        Line::from(""),
        help_section("Home"),
        help_key("c", "Quick clean every app"),
        help_key("Enter", "Run the focused schedule now"),
        help_key("n", "New schedule"),
        Line::from(""),
        help_section("Queue"),
        Line::from(vec![
            Span::styled("  ⏳ pending  ", Style::default().fg(Color::DarkGray)),
            Span::styled("🔄 processing  ", Style::default().fg(Color::Yellow)),
            Span::styled("✅ completed", Style::default().fg(Color::Green)),
        ]),
        Line::from(""),
        help_key("?", "Show this help"),
        help_key("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press q, Esc, or ? to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph =
        Paragraph::new(help_text).block(Block::default().title(" Help ").borders(Borders::ALL));

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}
