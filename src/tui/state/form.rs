use crate::queue::OperationKind;
use crate::schedule::{ScheduleDraft, Weekday};
use crate::selection::SelectionController;
use ratatui::widgets::ListState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Name,
    Time,
    Days,
    Kill,
    Cache,
    Submit,
}

impl FormField {
    const ORDER: [FormField; 6] = [
        FormField::Name,
        FormField::Time,
        FormField::Days,
        FormField::Kill,
        FormField::Cache,
        FormField::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleFormState {
    pub draft: ScheduleDraft,
    pub field: FormField,
    pub day_cursor: usize,
    pub error: Option<String>,
}

impl ScheduleFormState {
    pub fn focused_day(&self) -> Weekday {
        Weekday::ALL[self.day_cursor % Weekday::ALL.len()]
    }
}

/// App-picker dialog opened from the schedule form for one action.
pub struct PickerState {
    pub target: OperationKind,
    pub selection: SelectionController,
    pub list_state: ListState,
}
