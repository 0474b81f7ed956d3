use super::CalendarApp;
use crate::models::ui::ViewMode;
use crate::services::settings::SettingsService;
use chrono::Local;
use egui::RichText;

impl CalendarApp {
    pub(super) fn render_navigation_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("navigation_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("◀").on_hover_text("Previous").clicked() {
                    self.composer.previous();
                }
                if ui.button("Today").clicked() {
                    self.jump_to_today();
                }
                if ui.button("▶").on_hover_text("Next").clicked() {
                    self.composer.next();
                }

                ui.add_space(12.0);
                ui.label(RichText::new(self.composer.title()).heading());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙").on_hover_text("Settings (Ctrl+S)").clicked() {
                        self.open_settings_dialog();
                    }
                    ui.add_space(8.0);

                    // Right-to-left, so iterate in reverse to read Day, Week, Month
                    for mode in ViewMode::ALL.iter().rev() {
                        let selected = self.composer.view_mode() == *mode;
                        if ui.selectable_label(selected, mode.as_str()).clicked() && !selected {
                            self.switch_view(*mode);
                        }
                    }

                    if self.composer.is_committing() {
                        ui.spinner();
                        ui.label(RichText::new("Saving…").weak());
                    }
                });
            });
        });
    }

    pub(super) fn jump_to_today(&mut self) {
        self.composer.today(Local::now().date_naive());
    }

    /// Change the active view and remember it for the next launch.
    pub(super) fn switch_view(&mut self, mode: ViewMode) {
        if self.composer.controller().is_dragging() {
            self.composer.cancel_drag();
        }
        self.composer.set_view(mode);

        if self.settings.current_view == mode {
            return;
        }
        self.settings.current_view = mode;
        if let Err(e) = SettingsService::new(&self.services.database).update(&self.settings) {
            log::error!("Failed to persist view mode: {:#}", e);
        }
    }
}
