use crate::settings::{Settings, INTERVAL_HOURS_RANGE, MAX_CACHE_RANGE};
use crate::tui::controller::{settings_rows, SettingsRow};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

fn slider(value: u32, (min, max): (u32, u32), width: usize) -> String {
    let value = value.clamp(min, max);
    let filled = ((value - min) as usize * width) / (max - min).max(1) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn render_settings(f: &mut Frame, area: Rect, list_state: &mut ListState, settings: &Settings) {
    let items: Vec<ListItem> = settings_rows()
        .into_iter()
        .map(|row| match row {
            SettingsRow::Toggle(key) => {
                let (mark, color) = if settings.get(key) {
                    ("[on] ", Color::Green)
                } else {
                    ("[off]", Color::DarkGray)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{}  ", mark), Style::default().fg(color)),
                    Span::styled(
                        format!("{:<28}", key.label()),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(key.description(), Style::default().fg(Color::DarkGray)),
                ]))
            }
            SettingsRow::Interval => ListItem::new(Line::from(vec![
                Span::raw("       "),
                Span::styled(
                    format!("{:<28}", "Clean interval"),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    slider(settings.clean_interval_hours, INTERVAL_HOURS_RANGE, 20),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(format!(" {}h", settings.clean_interval_hours)),
            ])),
            SettingsRow::MaxCache => ListItem::new(Line::from(vec![
                Span::raw("       "),
                Span::styled(
                    format!("{:<28}", "Max cache size"),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    slider(settings.max_cache_size_mb, MAX_CACHE_RANGE, 20),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(format!(" {} MB", settings.max_cache_size_mb)),
            ])),
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Settings "))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, list_state);
}
