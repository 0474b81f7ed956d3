// CRM meeting calendar
// Main entry point

use anyhow::{anyhow, Context, Result};
use crm_calendar::services::config::AppConfig;
use crm_calendar::ui_egui::{AppServices, CalendarApp};

fn main() -> Result<()> {
    env_logger::init();

    log::info!("Starting CRM Calendar");

    let config = AppConfig::load().context("Failed to load configuration")?;
    let services = AppServices::bootstrap(&config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("CRM Calendar")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CRM Calendar",
        options,
        Box::new(move |cc| Ok(Box::new(CalendarApp::new(cc, services)))),
    )
    .map_err(|e| anyhow!("Calendar window failed: {}", e))
}
