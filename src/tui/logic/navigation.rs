use ratatui::widgets::ListState;

pub fn navigate_up(list_state: &mut ListState) {
    if let Some(current) = list_state.selected() {
        if current > 0 {
            list_state.select(Some(current - 1));
        }
    }
}

pub fn navigate_down(list_state: &mut ListState, max_items: usize) {
    let max = max_items.saturating_sub(1);
    if let Some(current) = list_state.selected() {
        if current < max {
            list_state.select(Some(current + 1));
        }
    }
}

/// Keeps the cursor inside a list that may have shrunk or been swapped.
pub fn clamp_cursor(list_state: &mut ListState, len: usize) {
    match (list_state.selected(), len) {
        (_, 0) => list_state.select(None),
        (None, _) => list_state.select(Some(0)),
        (Some(current), len) if current >= len => list_state.select(Some(len - 1)),
        _ => {}
    }
}
