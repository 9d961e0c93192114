use crate::queue::{OperationKind, TaskQueue};
use crate::selection::{Screen, SelectionController};
use crate::tui::controller::common::commit_and_open;
use crate::tui::logic::{navigate_down, navigate_up, toggle_focused};
use crate::tui::state::{AppMode, ProcessingState};
use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::widgets::ListState;
use std::time::Duration;

/// Keys shared by the kill and clear-cache tabs.
pub struct SelectionKeyContext<'a> {
    pub list_state: &'a mut ListState,
    pub selection: &'a mut SelectionController,
    pub queue: &'a mut TaskQueue,
    pub now: Duration,
    pub high_cache_threshold_mb: u64,
    pub processing: &'a mut Option<ProcessingState>,
    pub mode: &'a mut AppMode,
}

pub fn handle_selection_key(ctx: &mut SelectionKeyContext, code: KeyCode) -> Result<()> {
    match code {
        KeyCode::Up => navigate_up(ctx.list_state),
        KeyCode::Down => navigate_down(ctx.list_state, ctx.selection.candidate_count()),
        KeyCode::Char(' ') => toggle_focused(ctx.selection, ctx.list_state),
        KeyCode::Char('a') => ctx.selection.select_all(),
        KeyCode::Char('n') => ctx.selection.clear(),
        KeyCode::Char('h') if ctx.selection.screen() == Screen::Cache => {
            ctx.selection.select_high_cache(ctx.high_cache_threshold_mb)
        }
        KeyCode::Enter => {
            let kind = match ctx.selection.screen() {
                Screen::Kill => Some(OperationKind::Kill),
                Screen::Cache => Some(OperationKind::Cache),
                Screen::QuickClean => None,
            };
            commit_and_open(
                ctx.selection,
                ctx.queue,
                ctx.now,
                kind,
                ctx.processing,
                ctx.mode,
            )?;
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{sample_app, Catalog};

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                sample_app("A", "Alpha", true, Some("45 MB")),
                sample_app("B", "Beta", false, Some("200 MB")),
            ],
            Vec::new(),
        )
        .unwrap()
    }

    struct Harness {
        list_state: ListState,
        selection: SelectionController,
        queue: TaskQueue,
        processing: Option<ProcessingState>,
        mode: AppMode,
    }

    impl Harness {
        fn new(selection: SelectionController) -> Self {
            let mut list_state = ListState::default();
            list_state.select(Some(0));
            Self {
                list_state,
                selection,
                queue: TaskQueue::default(),
                processing: None,
                mode: AppMode::Tabs,
            }
        }

        fn press(&mut self, code: KeyCode) {
            let mut ctx = SelectionKeyContext {
                list_state: &mut self.list_state,
                selection: &mut self.selection,
                queue: &mut self.queue,
                now: Duration::ZERO,
                high_cache_threshold_mb: 100,
                processing: &mut self.processing,
                mode: &mut self.mode,
            };
            handle_selection_key(&mut ctx, code).unwrap();
        }
    }

    #[test]
    fn test_enter_without_selection_does_nothing() {
        let mut h = Harness::new(SelectionController::kill(&catalog()));
        h.press(KeyCode::Enter);
        assert!(h.queue.is_empty());
        assert_eq!(h.mode, AppMode::Tabs);
    }

    #[test]
    fn test_high_cache_then_commit_opens_modal() {
        let mut h = Harness::new(SelectionController::cache(&catalog()));
        h.press(KeyCode::Char('h'));
        assert!(h.selection.is_selected("B"));
        h.press(KeyCode::Enter);

        assert_eq!(h.mode, AppMode::Processing);
        let processing = h.processing.as_ref().unwrap();
        assert_eq!(processing.kind, Some(OperationKind::Cache));
        assert_eq!(processing.entry_ids.len(), 1);
        assert!(h.selection.is_empty());
    }

    #[test]
    fn test_space_toggles_focused_row() {
        let mut h = Harness::new(SelectionController::cache(&catalog()));
        h.press(KeyCode::Down);
        h.press(KeyCode::Char(' '));
        // cache tab lists largest first: B then A
        assert!(h.selection.is_selected("A"));
        h.press(KeyCode::Char(' '));
        assert!(h.selection.is_empty());
    }

    #[test]
    fn test_high_cache_key_ignored_on_kill_tab() {
        let mut h = Harness::new(SelectionController::kill(&catalog()));
        h.press(KeyCode::Char('h'));
        assert!(h.selection.is_empty());
    }
}
