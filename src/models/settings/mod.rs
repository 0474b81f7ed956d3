// Settings module
// Persisted calendar preferences

use crate::models::ui::ViewMode;

pub const DEFAULT_DAY_START_HOUR: u32 = 8;
pub const DEFAULT_DAY_END_HOUR: u32 = 20;
pub const DEFAULT_MONTH_CELL_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub id: Option<i64>,
    pub current_view: ViewMode,
    /// First hour rendered in day/week grids (inclusive).
    pub day_start_hour: u32,
    /// Hour at which day/week grids stop (exclusive).
    pub day_end_hour: u32,
    /// Maximum meeting chips shown in a month cell before "+N more".
    pub month_cell_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id: Some(1),
            current_view: ViewMode::Week,
            day_start_hour: DEFAULT_DAY_START_HOUR,
            day_end_hour: DEFAULT_DAY_END_HOUR,
            month_cell_limit: DEFAULT_MONTH_CELL_LIMIT,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), String> {
        if self.day_end_hour > 24 {
            return Err("Working day must end at or before 24:00".to_string());
        }

        if self.day_start_hour >= self.day_end_hour {
            return Err("Working day must start before it ends".to_string());
        }

        if self.month_cell_limit == 0 {
            return Err("Month view must show at least one meeting per day".to_string());
        }

        Ok(())
    }
}
