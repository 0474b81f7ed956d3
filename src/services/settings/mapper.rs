use crate::models::settings::Settings;
use crate::models::ui::ViewMode;
use rusqlite::Row;

pub(super) const SETTINGS_COLUMNS: &str =
    "id, current_view, day_start_hour, day_end_hour, month_cell_limit";

pub(super) fn row_to_settings(row: &Row) -> Result<Settings, rusqlite::Error> {
    let current_view: String = row.get(1)?;
    let month_cell_limit: i64 = row.get(4)?;

    Ok(Settings {
        id: Some(row.get(0)?),
        current_view: ViewMode::parse(&current_view),
        day_start_hour: row.get(2)?,
        day_end_hour: row.get(3)?,
        month_cell_limit: month_cell_limit.max(1) as usize,
    })
}
