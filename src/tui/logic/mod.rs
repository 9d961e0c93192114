pub mod navigation;
pub mod selection;

pub use navigation::{clamp_cursor, navigate_down, navigate_up};
pub use selection::toggle_focused;
