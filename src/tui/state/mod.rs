pub mod app_state;
pub mod form;
pub mod modes;
pub mod processing;

pub use app_state::App;
pub use form::{FormField, PickerState, ScheduleFormState};
pub use modes::{AppMode, Tab};
pub use processing::ProcessingState;
