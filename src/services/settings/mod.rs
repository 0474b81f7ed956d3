//! Persisted calendar preferences (single row, id = 1).

mod mapper;
mod service;

pub use service::SettingsService;
