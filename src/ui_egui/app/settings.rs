use super::CalendarApp;
use crate::ui_egui::settings_dialog::{
    render_settings_dialog, SettingsDialogResult, SettingsDialogState,
};

impl CalendarApp {
    pub(super) fn open_settings_dialog(&mut self) {
        if self.settings_dialog.is_none() {
            self.settings_dialog = Some(SettingsDialogState::new(&self.settings));
        }
    }

    pub(super) fn handle_settings_dialog(&mut self, ctx: &egui::Context) {
        let Some(state) = self.settings_dialog.as_mut() else {
            return;
        };
        // The toolbar may have switched views while the window was open
        state.draft.current_view = self.settings.current_view;

        match render_settings_dialog(ctx, state, &self.services.database) {
            SettingsDialogResult::Saved(saved) => {
                self.composer.apply_settings(&saved);
                self.settings = saved;
                self.settings_dialog = None;
                self.toast_manager.success("Settings saved");
            }
            SettingsDialogResult::Cancelled => self.settings_dialog = None,
            SettingsDialogResult::Open => {}
        }
    }
}
