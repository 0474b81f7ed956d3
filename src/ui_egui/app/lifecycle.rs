use super::confirm::{render_reschedule_dialog, ConfirmResult};
use super::toast::ToastManager;
use super::CalendarApp;
use crate::models::settings::Settings;
use crate::scheduling::{CalendarView, CalendarViewComposer, DropOutcome, RescheduleCommitter};
use crate::services::config::AppConfig;
use crate::services::database::Database;
use crate::services::meeting::{MeetingService, SqliteMeetingStore};
use crate::services::settings::SettingsService;
use crate::ui_egui::views::month_view::render_month;
use crate::ui_egui::views::palette::GridPalette;
use crate::ui_egui::views::time_grid::render_time_grid;
use crate::ui_egui::views::ViewAction;
use anyhow::{Context, Result};
use chrono::{Local, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const IDLE_REPAINT: Duration = Duration::from_secs(30);
const COMMIT_POLL_REPAINT: Duration = Duration::from_millis(100);

/// Long-lived services shared by the UI thread and the commit task.
pub struct AppServices {
    pub database: Arc<Database>,
    pub committer: Arc<RescheduleCommitter>,
    pub runtime: tokio::runtime::Runtime,
}

impl AppServices {
    pub fn bootstrap(config: &AppConfig) -> Result<Self> {
        let database = Arc::new(initialize_database(config)?);
        let provider = config.provider.build_client()?;
        let reference_tz = config.provider.timezone()?;
        let store = Arc::new(SqliteMeetingStore::new(Arc::clone(&database)));
        let committer = Arc::new(RescheduleCommitter::new(provider, store, reference_tz));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("crm-calendar-sync")
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;

        Ok(Self {
            database,
            committer,
            runtime,
        })
    }
}

impl CalendarApp {
    pub fn new(cc: &eframe::CreationContext<'_>, services: AppServices) -> Self {
        let settings = load_settings_or_default(&SettingsService::new(&services.database));
        log::info!(
            "Loaded settings: view={}, hours={}-{}",
            settings.current_view.as_str(),
            settings.day_start_hour,
            settings.day_end_hour
        );

        let is_dark = matches!(dark_light::detect(), dark_light::Mode::Dark);
        cc.egui_ctx.set_visuals(if is_dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        let composer = CalendarViewComposer::new(Local::now().date_naive(), &settings);

        Self {
            services,
            settings,
            settings_dialog: None,
            composer,
            meetings: Vec::new(),
            loaded_range: None,
            status_counts: HashMap::new(),
            toast_manager: ToastManager::new(),
            commit_rx: None,
            is_dark,
        }
    }

    pub(super) fn handle_update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_commit();
        self.handle_keyboard_shortcuts(ctx);
        self.refresh_meetings(false);

        self.render_navigation_bar(ctx);
        self.render_status_bar(ctx);

        let actions = self.render_main_panel(ctx);
        for action in actions {
            self.apply_view_action(action);
        }

        self.handle_confirm_dialog(ctx);
        self.handle_settings_dialog(ctx);

        // Toasts last so they sit above everything else
        self.toast_manager.render(ctx, self.is_dark);

        // Keeps statuses and the now line current without input
        ctx.request_repaint_after(if self.composer.is_committing() {
            COMMIT_POLL_REPAINT
        } else {
            IDLE_REPAINT
        });
    }

    fn render_main_panel(&self, ctx: &egui::Context) -> Vec<ViewAction> {
        let palette = GridPalette::new(self.is_dark);
        let view = self.composer.compose(&self.meetings, Utc::now(), &Local);
        let session = self.composer.controller().session();
        let dragging = session.map(|s| &s.meeting);
        let hovered = session.and_then(|s| s.hovered);

        egui::CentralPanel::default()
            .show(ctx, |ui| match &view {
                CalendarView::TimeGrid(grid) => {
                    render_time_grid(ui, grid, dragging, hovered, &palette)
                }
                CalendarView::Month(month) => render_month(ui, month, dragging, hovered, &palette),
            })
            .inner
    }

    fn apply_view_action(&mut self, action: ViewAction) {
        match action {
            ViewAction::StartDrag(meeting) => {
                if !self.composer.start_drag(Some(&meeting)) {
                    log::debug!("Drag of meeting {} refused", meeting.id);
                }
            }
            ViewAction::Hover(cell) => self.composer.hover(cell),
            ViewAction::Drop(cell) => match self.composer.drop_on(cell, Utc::now(), &Local) {
                DropOutcome::Rejected(reason) => {
                    log::info!("Drop rejected: {}", reason);
                    self.toast_manager.warning(reason.to_string());
                }
                DropOutcome::Pending(_) | DropOutcome::Ignored => {}
            },
            ViewAction::CancelDrag => self.composer.cancel_drag(),
            ViewAction::OpenLink(url) => {
                if let Err(e) = webbrowser::open(&url) {
                    log::error!("Failed to open join link {}: {}", url, e);
                    self.toast_manager.error("Could not open the join link");
                }
            }
            ViewAction::ShowDay(date) => {
                self.composer.go_to(date);
                self.switch_view(crate::models::ui::ViewMode::Day);
            }
        }
    }

    fn handle_confirm_dialog(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.composer.confirm_prompt(&Local) else {
            return;
        };

        match render_reschedule_dialog(ctx, &prompt) {
            ConfirmResult::Confirmed => self.start_commit(),
            ConfirmResult::Cancelled => {
                if let Some(pending) = self.composer.cancel_pending() {
                    log::info!("Reschedule of meeting {} discarded", pending.meeting.id);
                }
            }
            ConfirmResult::Pending => {}
        }
    }

    /// Reload meetings when the visible range changed, or unconditionally when
    /// `force` is set.
    pub(super) fn refresh_meetings(&mut self, force: bool) {
        let bounds = self.composer.query_bounds(&Local);
        if !force && self.loaded_range == Some(bounds) {
            return;
        }

        let result = {
            let conn = self.services.database.connection();
            MeetingService::new(&conn).find_by_date_range(bounds.0, bounds.1)
        };

        match result {
            Ok(meetings) => {
                log::debug!("Loaded {} meetings for {} - {}", meetings.len(), bounds.0, bounds.1);
                self.meetings = meetings;
                self.refresh_status_counts();
            }
            Err(e) => {
                log::error!("Failed to load meetings: {:#}", e);
                self.toast_manager.error("Could not load meetings");
            }
        }
        // Record the range even on failure so a broken database is not re-queried
        // every frame.
        self.loaded_range = Some(bounds);
    }
}

fn initialize_database(config: &AppConfig) -> Result<Database> {
    let db_path = config.resolve_database_path()?;
    log::info!("Opening database at {}", db_path.display());

    let db = Database::new(&db_path.to_string_lossy())?;
    db.initialize_schema()
        .context("Failed to initialize database schema")?;
    Ok(db)
}

fn load_settings_or_default(settings_service: &SettingsService) -> Settings {
    match settings_service.get() {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Failed to load settings: {}, using defaults", e);
            Settings::default()
        }
    }
}
