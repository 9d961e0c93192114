pub mod components;
pub mod screens;

pub use screens::{
    render_header, render_home, render_picker, render_schedule_form, render_selection,
    render_settings, HomeData,
};
