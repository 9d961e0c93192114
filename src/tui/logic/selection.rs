use crate::selection::SelectionController;
use ratatui::widgets::ListState;

fn focused_id(selection: &SelectionController, list_state: &ListState) -> Option<String> {
    let idx = list_state.selected()?;
    selection.candidate_at(idx).map(|app| app.id.clone())
}

pub fn toggle_focused(selection: &mut SelectionController, list_state: &ListState) {
    if let Some(id) = focused_id(selection, list_state) {
        selection.toggle(&id);
    }
}
