use crate::catalog::Catalog;
use crate::queue::OperationKind;
use crate::schedule::{ScheduleStore, Weekday};
use crate::selection::SelectionController;
use crate::tui::logic::{navigate_down, navigate_up, toggle_focused};
use crate::tui::state::{AppMode, FormField, PickerState, ScheduleFormState};
use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::widgets::ListState;

pub struct ScheduleFormContext<'a> {
    pub form: &'a mut ScheduleFormState,
    pub schedules: &'a mut ScheduleStore,
    pub catalog: &'a Catalog,
    pub picker: &'a mut Option<PickerState>,
    pub mode: &'a mut AppMode,
    pub status: &'a mut Option<String>,
}

fn open_picker(ctx: &mut ScheduleFormContext, target: OperationKind) {
    let picked = match target {
        OperationKind::Kill => ctx.form.draft.kill.clone(),
        OperationKind::Cache => ctx.form.draft.cache.clone(),
    };
    let mut selection = SelectionController::quick_clean(ctx.catalog);
    selection.select_ids(&picked.unwrap_or_default());

    let mut list_state = ListState::default();
    list_state.select(Some(0));
    *ctx.picker = Some(PickerState {
        target,
        selection,
        list_state,
    });
    *ctx.mode = AppMode::AppPicker;
}

pub fn handle_schedule_form_key(ctx: &mut ScheduleFormContext, code: KeyCode) -> Result<()> {
    let field = ctx.form.field;
    match code {
        KeyCode::Esc => {
            *ctx.mode = AppMode::Tabs;
            return Ok(());
        }
        KeyCode::Tab | KeyCode::Down => ctx.form.field = field.next(),
        KeyCode::BackTab | KeyCode::Up => ctx.form.field = field.prev(),
        KeyCode::Backspace => match field {
            FormField::Name => {
                ctx.form.draft.name.pop();
            }
            FormField::Time => {
                ctx.form.draft.time.pop();
            }
            _ => {}
        },
        KeyCode::Char(c) if field == FormField::Name => ctx.form.draft.name.push(c),
        KeyCode::Char(c) if field == FormField::Time => ctx.form.draft.time.push(c),
        KeyCode::Left if field == FormField::Days => {
            ctx.form.day_cursor = (ctx.form.day_cursor + Weekday::ALL.len() - 1) % Weekday::ALL.len();
        }
        KeyCode::Right if field == FormField::Days => {
            ctx.form.day_cursor = (ctx.form.day_cursor + 1) % Weekday::ALL.len();
        }
        KeyCode::Char(' ') if field == FormField::Days => {
            let day = ctx.form.focused_day();
            ctx.form.draft.toggle_day(day);
        }
        KeyCode::Char(' ') if field == FormField::Kill => {
            let enabled = ctx.form.draft.kill.is_none();
            ctx.form.draft.set_kill(enabled);
        }
        KeyCode::Char(' ') if field == FormField::Cache => {
            let enabled = ctx.form.draft.cache.is_none();
            ctx.form.draft.set_cache(enabled);
        }
        KeyCode::Enter => match field {
            FormField::Kill => {
                if ctx.form.draft.kill.is_none() {
                    ctx.form.draft.set_kill(true);
                }
                open_picker(ctx, OperationKind::Kill);
            }
            FormField::Cache => {
                if ctx.form.draft.cache.is_none() {
                    ctx.form.draft.set_cache(true);
                }
                open_picker(ctx, OperationKind::Cache);
            }
            FormField::Submit => match ctx.schedules.create(ctx.form.draft.clone()) {
                Ok(schedule) => {
                    *ctx.status = Some(format!("Created schedule \"{}\"", schedule.name));
                    *ctx.form = ScheduleFormState::default();
                    *ctx.mode = AppMode::Tabs;
                }
                Err(e) => ctx.form.error = Some(e.to_string()),
            },
            _ => ctx.form.field = field.next(),
        },
        _ => {}
    }
    if ctx.form.draft.can_submit() {
        ctx.form.error = None;
    }
    Ok(())
}

pub struct PickerContext<'a> {
    pub picker: &'a mut Option<PickerState>,
    pub form: &'a mut ScheduleFormState,
    pub mode: &'a mut AppMode,
}

pub fn handle_picker_key(ctx: &mut PickerContext, code: KeyCode) -> Result<()> {
    let Some(picker) = ctx.picker.as_mut() else {
        *ctx.mode = AppMode::ScheduleForm;
        return Ok(());
    };

    match code {
        KeyCode::Up => navigate_up(&mut picker.list_state),
        KeyCode::Down => navigate_down(&mut picker.list_state, picker.selection.candidate_count()),
        KeyCode::Char(' ') => toggle_focused(&mut picker.selection, &picker.list_state),
        KeyCode::Char('a') => picker.selection.select_all(),
        KeyCode::Char('n') => picker.selection.clear(),
        KeyCode::Enter => {
            let ids = picker.selection.selected_ids();
            match picker.target {
                OperationKind::Kill => ctx.form.draft.kill = Some(ids),
                OperationKind::Cache => ctx.form.draft.cache = Some(ids),
            }
            *ctx.picker = None;
            *ctx.mode = AppMode::ScheduleForm;
        }
        KeyCode::Esc => {
            *ctx.picker = None;
            *ctx.mode = AppMode::ScheduleForm;
        }
        _ => {}
    }
    Ok(())
}
