use crate::queue::TaskQueue;
use crate::schedule::{ScheduleKind, ScheduleStore};
use crate::selection::SelectionController;
use crate::tui::controller::common::commit_and_open;
use crate::tui::logic::{navigate_down, navigate_up};
use crate::tui::state::{AppMode, ProcessingState, ScheduleFormState};
use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::widgets::ListState;
use std::time::Duration;

pub struct HomeContext<'a> {
    pub list_state: &'a mut ListState,
    pub schedules: &'a mut ScheduleStore,
    pub quick: &'a mut SelectionController,
    pub queue: &'a mut TaskQueue,
    pub now: Duration,
    pub form: &'a mut ScheduleFormState,
    pub processing: &'a mut Option<ProcessingState>,
    pub mode: &'a mut AppMode,
}

fn focused_schedule(ctx: &HomeContext) -> Option<String> {
    let idx = ctx.list_state.selected()?;
    ctx.schedules.list().get(idx).map(|s| s.id.clone())
}

pub fn handle_home_key(ctx: &mut HomeContext, code: KeyCode) -> Result<()> {
    match code {
        KeyCode::Up => navigate_up(ctx.list_state),
        KeyCode::Down => navigate_down(ctx.list_state, ctx.schedules.len()),
        KeyCode::Char(' ') => {
            if let Some(id) = focused_schedule(ctx) {
                ctx.schedules.toggle(&id);
            }
        }
        // Run the focused schedule's apps now.
        KeyCode::Enter => {
            let Some(id) = focused_schedule(ctx) else {
                return Ok(());
            };
            if let Some(schedule) = ctx.schedules.get(&id) {
                ctx.quick.set_plan(schedule.kind);
                ctx.quick.select_ids(&schedule.selected_apps);
                commit_and_open(ctx.quick, ctx.queue, ctx.now, None, ctx.processing, ctx.mode)?;
            }
        }
        KeyCode::Char('c') => {
            ctx.quick.set_plan(ScheduleKind::Both);
            ctx.quick.select_all();
            commit_and_open(ctx.quick, ctx.queue, ctx.now, None, ctx.processing, ctx.mode)?;
        }
        KeyCode::Char('n') => {
            *ctx.form = ScheduleFormState::default();
            *ctx.mode = AppMode::ScheduleForm;
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, SampleCatalog};
    use crate::queue::{OperationKind, QueueStatus};
    use crate::schedule::{ScheduleDraft, Weekday};

    struct Harness {
        list_state: ListState,
        schedules: ScheduleStore,
        quick: SelectionController,
        queue: TaskQueue,
        form: ScheduleFormState,
        processing: Option<ProcessingState>,
        mode: AppMode,
    }

    impl Harness {
        fn new() -> Self {
            let catalog = Catalog::from_provider(&SampleCatalog).unwrap();
            let mut list_state = ListState::default();
            list_state.select(Some(0));
            Self {
                list_state,
                schedules: ScheduleStore::new(catalog.seed_schedules().to_vec()),
                quick: SelectionController::quick_clean(&catalog),
                queue: TaskQueue::default(),
                form: ScheduleFormState::default(),
                processing: None,
                mode: AppMode::Tabs,
            }
        }

        fn press(&mut self, code: KeyCode) {
            let mut ctx = HomeContext {
                list_state: &mut self.list_state,
                schedules: &mut self.schedules,
                quick: &mut self.quick,
                queue: &mut self.queue,
                now: Duration::ZERO,
                form: &mut self.form,
                processing: &mut self.processing,
                mode: &mut self.mode,
            };
            handle_home_key(&mut ctx, code).unwrap();
        }
    }

    #[test]
    fn test_space_toggles_schedule() {
        let mut h = Harness::new();
        h.press(KeyCode::Down);
        h.press(KeyCode::Char(' '));
        assert!(h.schedules.get("2").unwrap().enabled);
        h.press(KeyCode::Char(' '));
        assert!(!h.schedules.get("2").unwrap().enabled);
    }

    #[test]
    fn test_run_cache_schedule_now() {
        let mut h = Harness::new();
        h.press(KeyCode::Enter);

        assert_eq!(h.mode, AppMode::Processing);
        // "Daily cleanup" clears cache for apps 1, 2 and 3
        assert_eq!(h.queue.len(), 3);
        assert!(h
            .queue
            .entries()
            .iter()
            .all(|e| e.kind == OperationKind::Cache && e.status == QueueStatus::Pending));
    }

    #[test]
    fn test_run_schedule_with_nothing_to_do_keeps_modal_closed() {
        let mut h = Harness::new();
        // Chrome and Spotify are not running, so a kill-only run has no work.
        let mut draft = ScheduleDraft::default();
        draft.name = "Idle apps".into();
        draft.time = "22:00".into();
        draft.toggle_day(Weekday::Sat);
        draft.kill = Some(vec!["3".into(), "5".into()]);
        h.schedules.create(draft).unwrap();

        h.list_state.select(Some(3));
        h.press(KeyCode::Enter);

        assert_eq!(h.mode, AppMode::Tabs);
        assert!(h.processing.is_none());
        assert!(h.queue.is_empty());
    }

    #[test]
    fn test_quick_clean_everything() {
        let mut h = Harness::new();
        h.press(KeyCode::Char('c'));
        assert_eq!(h.queue.query(Some(OperationKind::Kill)).len(), 4);
        assert_eq!(h.queue.query(Some(OperationKind::Cache)).len(), 8);
    }

    #[test]
    fn test_new_schedule_opens_form() {
        let mut h = Harness::new();
        h.form.draft.name = "stale".into();
        h.press(KeyCode::Char('n'));
        assert_eq!(h.mode, AppMode::ScheduleForm);
        assert!(h.form.draft.name.is_empty());
    }
}
