// CRM meeting calendar
// Scheduling core, persistence and the egui front end

pub mod models;
pub mod scheduling;
pub mod services;
pub mod ui_egui;
pub mod utils;
