mod app;
mod settings_dialog;
pub mod views;

pub use app::{AppServices, CalendarApp};
