use crate::models::settings::Settings;
use crate::services::database::Database;
use anyhow::{anyhow, Context, Result};

use super::mapper::{row_to_settings, SETTINGS_COLUMNS};

pub struct SettingsService<'a> {
    db: &'a Database,
}

impl<'a> SettingsService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Get the current settings
    pub fn get(&self) -> Result<Settings> {
        let conn = self.db.connection();

        conn.query_row(
            &format!("SELECT {} FROM settings WHERE id = 1", SETTINGS_COLUMNS),
            [],
            row_to_settings,
        )
        .context("Failed to load settings")
    }

    /// Update settings
    pub fn update(&self, settings: &Settings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        let conn = self.db.connection();

        conn.execute(
            "UPDATE settings \
             SET current_view = ?1, \
                 day_start_hour = ?2, \
                 day_end_hour = ?3, \
                 month_cell_limit = ?4, \
                 updated_at = CURRENT_TIMESTAMP \
             WHERE id = 1",
            (
                settings.current_view.as_str(),
                settings.day_start_hour,
                settings.day_end_hour,
                settings.month_cell_limit as i64,
            ),
        )
        .context("Failed to update settings")?;

        log::info!(
            "Settings saved: view={}, hours={}-{}, month_cell_limit={}",
            settings.current_view.as_str(),
            settings.day_start_hour,
            settings.day_end_hour,
            settings.month_cell_limit
        );
        Ok(())
    }
}
