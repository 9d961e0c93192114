use crate::catalog::Catalog;
use crate::queue::TaskQueue;
use crate::tui::state::Tab;
use crate::utils::format_mb;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use ratatui::Frame;

pub fn render_header(f: &mut Frame, area: Rect, tab: Tab, catalog: &Catalog, queue: &TaskQueue) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(44)])
        .split(area);

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("{} {}", i + 1, t.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(tab.index())
        .block(
            Block::default().borders(Borders::BOTTOM).title(Span::styled(
                " apptools ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[0]);

    let progress = queue.progress(None);
    let summary = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{} running", catalog.running().count()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} cache", format_mb(catalog.total_cache_mb())),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(
            format!("queue {}/{}", progress.completed, progress.total),
            Style::default().fg(if progress.is_settled() {
                Color::DarkGray
            } else {
                Color::Yellow
            }),
        ),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(summary, chunks[1]);
}
