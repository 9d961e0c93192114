mod apps;
mod header;
mod home;
mod schedule_form;
mod settings;

pub use apps::render_selection;
pub use header::render_header;
pub use home::{render_home, HomeData};
pub use schedule_form::{render_picker, render_schedule_form};
pub use settings::render_settings;
