// UI models module
// View selection shared by settings and the calendar composer

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    Day,
    #[default]
    Week,
    Month,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Day, ViewMode::Week, ViewMode::Month];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Day => "Day",
            ViewMode::Week => "Week",
            ViewMode::Month => "Month",
        }
    }

    /// Parse a persisted view name. Unknown names fall back to the week view.
    pub fn parse(value: &str) -> Self {
        match value {
            "Day" => ViewMode::Day,
            "Month" => ViewMode::Month,
            _ => ViewMode::Week,
        }
    }

    /// Whether meetings are placed on an hour grid (day/week) rather than in day cells.
    pub fn is_time_grid(&self) -> bool {
        !matches!(self, ViewMode::Month)
    }
}
