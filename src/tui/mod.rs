mod app;
pub mod controller;
pub mod logic;
pub mod state;
pub mod view;

pub use state::App;
