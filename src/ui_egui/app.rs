mod commit;
mod confirm;
mod lifecycle;
mod navigation;
mod settings;
mod shortcuts;
mod status_bar;
mod toast;

pub use self::lifecycle::AppServices;

use self::toast::ToastManager;
use crate::models::meeting::Meeting;
use crate::models::settings::Settings;
use crate::scheduling::{CalendarViewComposer, CommitError, CommitReceipt, MeetingStatus};
use crate::ui_egui::settings_dialog::SettingsDialogState;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::oneshot;

type CommitResult = Result<CommitReceipt, CommitError>;

pub struct CalendarApp {
    services: AppServices,
    /// Persisted preferences; the view mode is written back on change
    settings: Settings,
    /// Open settings window, if any
    settings_dialog: Option<SettingsDialogState>,
    /// Navigation, drag session and commit state
    composer: CalendarViewComposer,
    /// Meetings overlapping the visible range
    meetings: Vec<Meeting>,
    /// Query bounds `meetings` was loaded for
    loaded_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    /// Meetings per derived status across the whole store
    status_counts: HashMap<MeetingStatus, usize>,
    toast_manager: ToastManager,
    /// Result channel of the reschedule commit in flight
    commit_rx: Option<oneshot::Receiver<CommitResult>>,
    is_dark: bool,
}

impl eframe::App for CalendarApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.handle_update(ctx, frame);
    }
}
