use crate::catalog::Catalog;
use crate::schedule::Weekday;
use crate::tui::state::{FormField, PickerState, ScheduleFormState};
use crate::tui::view::components::centered_rect;
use crate::tui::view::components::footer::{render_form_footer, render_picker_footer};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};
use ratatui::Frame;

fn label(text: &'static str, focused: bool) -> Span<'static> {
    let style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    Span::styled(format!("{:<10}", text), style)
}

fn app_names(catalog: &Catalog, ids: &[String]) -> String {
    if ids.is_empty() {
        return "no apps picked".to_string();
    }
    ids.iter()
        .map(|id| catalog.find(id).map_or(id.as_str(), |a| a.name.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn action_line(
    text: &'static str,
    focused: bool,
    picked: Option<&Vec<String>>,
    catalog: &Catalog,
) -> Line<'static> {
    let (mark, detail) = match picked {
        Some(ids) => ("[x] ", app_names(catalog, ids)),
        None => ("[ ] ", String::new()),
    };
    Line::from(vec![
        label(text, focused),
        Span::styled(mark, Style::default().fg(Color::Green)),
        Span::styled(detail, Style::default().fg(Color::DarkGray)),
    ])
}

pub fn render_schedule_form(f: &mut Frame, form: &ScheduleFormState, catalog: &Catalog) {
    let area = centered_rect(70, 60, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" New scheduled cleanup ")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(2)])
        .split(inner);

    let field = form.field;
    let cursor = |target: FormField| if field == target { "▏" } else { "" };

    let days: Vec<Span> = Weekday::ALL
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let mut style = if form.draft.days.contains(day) {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::Gray)
            };
            if field == FormField::Days && i == form.day_cursor {
                style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
            }
            Span::styled(format!(" {} ", day.token()), style)
        })
        .collect();

    let submit_style = if form.draft.can_submit() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let submit_text = if field == FormField::Submit {
        "> Create <"
    } else {
        "  Create  "
    };

    let mut lines = vec![
        Line::from(vec![
            label("Name", field == FormField::Name),
            Span::raw(format!("{}{}", form.draft.name, cursor(FormField::Name))),
        ]),
        Line::from(vec![
            label("Time", field == FormField::Time),
            Span::raw(format!("{}{}", form.draft.time, cursor(FormField::Time))),
        ]),
        Line::from([vec![label("Days", field == FormField::Days)], days].concat()),
        Line::from(""),
        action_line(
            "Kill apps",
            field == FormField::Kill,
            form.draft.kill.as_ref(),
            catalog,
        ),
        action_line(
            "Cache",
            field == FormField::Cache,
            form.draft.cache.as_ref(),
            catalog,
        ),
        Line::from(""),
        Line::from(Span::styled(submit_text, submit_style)),
    ];
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    f.render_widget(Paragraph::new(lines), chunks[0]);
    render_form_footer(f, chunks[1]);
}

pub fn render_picker(f: &mut Frame, picker: &mut PickerState) {
    let area = centered_rect(50, 60, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(
            " Apps to {} ({} selected) ",
            picker.target.label().to_lowercase(),
            picker.selection.len()
        ))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(inner);

    let items: Vec<ListItem> = picker
        .selection
        .candidates()
        .map(|app| {
            let checkbox = if picker.selection.is_selected(&app.id) {
                Span::styled("[x] ", Style::default().fg(Color::Green))
            } else {
                Span::raw("[ ] ")
            };
            ListItem::new(Line::from(vec![
                checkbox,
                Span::raw(format!("{} {}", app.icon, app.name)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[0], &mut picker.list_state);
    render_picker_footer(f, chunks[1]);
}
