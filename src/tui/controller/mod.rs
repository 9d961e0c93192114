pub mod apps;
pub mod common;
pub mod home;
pub mod schedule_form;
pub mod settings;

pub use apps::handle_selection_key;
pub use common::{handle_help_key, handle_processing_key};
pub use home::handle_home_key;
pub use schedule_form::{handle_picker_key, handle_schedule_form_key};
pub use settings::{handle_settings_key, settings_rows, SettingsRow};
