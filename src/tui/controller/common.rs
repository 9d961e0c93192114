use crate::error::QueueError;
use crate::queue::{OperationKind, TaskQueue};
use crate::selection::SelectionController;
use crate::tui::state::{AppMode, ProcessingState};
use anyhow::Result;
use crossterm::event::KeyCode;
use std::time::Duration;

pub struct HelpContext<'a> {
    pub mode: &'a mut AppMode,
    pub prev_mode: &'a mut Option<AppMode>,
}

pub fn handle_help_key(ctx: &mut HelpContext, code: KeyCode) -> Result<()> {
    if matches!(code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('?')) {
        *ctx.mode = ctx.prev_mode.unwrap_or(AppMode::Tabs);
        *ctx.prev_mode = None;
    }
    Ok(())
}

pub struct ProcessingContext<'a> {
    pub mode: &'a mut AppMode,
    pub processing: &'a mut Option<ProcessingState>,
}

pub fn handle_processing_key(ctx: &mut ProcessingContext, code: KeyCode) -> Result<()> {
    if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
        *ctx.processing = None;
        *ctx.mode = AppMode::Tabs;
    }
    Ok(())
}

/// Commits `selection` and opens the processing modal over the new entries.
/// The modal stays closed when nothing was queued.
pub fn commit_and_open(
    selection: &mut SelectionController,
    queue: &mut TaskQueue,
    now: Duration,
    kind: Option<OperationKind>,
    processing: &mut Option<ProcessingState>,
    mode: &mut AppMode,
) -> Result<(), QueueError> {
    if !selection.can_commit() {
        return Ok(());
    }
    let entry_ids = selection.commit(queue, now)?;
    if entry_ids.is_empty() {
        return Ok(());
    }
    *processing = Some(ProcessingState {
        kind,
        entry_ids,
        opened_at: now,
    });
    *mode = AppMode::Processing;
    Ok(())
}
