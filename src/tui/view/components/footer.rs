use crate::tui::state::Tab;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

fn key_hints(hints: &[(&'static str, &'static str)]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(format!(" {}  ", label)));
    }
    spans
}

pub fn render_tab_footer(f: &mut Frame, area: Rect, tab: Tab, status: Option<&str>) {
    let hints: &[(&str, &str)] = match tab {
        Tab::Home => &[
            ("↑↓", "Nav"),
            ("Space", "Toggle"),
            ("Enter", "Run now"),
            ("c", "Quick clean"),
            ("n", "New schedule"),
        ],
        Tab::Kill => &[
            ("↑↓", "Nav"),
            ("Space", "Select"),
            ("a", "All"),
            ("n", "None"),
            ("Enter", "Kill"),
        ],
        Tab::Cache => &[
            ("↑↓", "Nav"),
            ("Space", "Select"),
            ("a", "All"),
            ("h", "High cache"),
            ("n", "None"),
            ("Enter", "Clear"),
        ],
        Tab::Settings => &[
            ("↑↓", "Nav"),
            ("Space", "Toggle"),
            ("←→", "Adjust"),
            ("r", "Reset"),
            ("e", "Export"),
        ],
    };

    let mut spans = key_hints(hints);
    spans.extend(key_hints(&[("Tab", "Switch"), ("?", "Help"), ("q", "Quit")]));
    if let Some(status) = status {
        spans.push(Span::styled(
            format!("| {}", status),
            Style::default().fg(Color::Green),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, area);
}

pub fn render_form_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(key_hints(&[
        ("Tab/↑↓", "Field"),
        ("Space", "Toggle"),
        ("←→", "Day"),
        ("Enter", "Pick apps / Create"),
        ("Esc", "Cancel"),
    ])))
    .block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, area);
}

pub fn render_picker_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(key_hints(&[
        ("↑↓", "Nav"),
        ("Space", "Select"),
        ("a", "All"),
        ("n", "None"),
        ("Enter", "Done"),
        ("Esc", "Back"),
    ])))
    .block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, area);
}
