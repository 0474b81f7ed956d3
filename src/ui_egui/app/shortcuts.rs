use super::CalendarApp;
use crate::models::ui::ViewMode;

impl CalendarApp {
    pub(super) fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        // Text fields keep their keys
        if ctx.wants_keyboard_input() {
            return;
        }

        let (escape, settings, left, right, today, view) = ctx.input(|i| {
            let plain = !i.modifiers.ctrl && !i.modifiers.command && !i.modifiers.alt;
            let view = if !plain {
                None
            } else if i.key_pressed(egui::Key::D) {
                Some(ViewMode::Day)
            } else if i.key_pressed(egui::Key::W) {
                Some(ViewMode::Week)
            } else if i.key_pressed(egui::Key::M) {
                Some(ViewMode::Month)
            } else {
                None
            };
            (
                i.key_pressed(egui::Key::Escape),
                i.modifiers.command && i.key_pressed(egui::Key::S),
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
                plain && i.key_pressed(egui::Key::T),
                view,
            )
        });

        if self.settings_dialog.is_some() {
            if escape {
                self.settings_dialog = None;
            }
            return;
        }

        if settings {
            self.open_settings_dialog();
            return;
        }

        if escape {
            // The confirm dialog handles its own Escape
            if self.composer.controller().is_dragging() {
                self.composer.cancel_drag();
            }
            return;
        }

        // No navigation while a move is awaiting confirmation
        if self.composer.controller().pending().is_some() {
            return;
        }

        if left {
            self.composer.previous();
        }
        if right {
            self.composer.next();
        }
        if today {
            self.jump_to_today();
        }
        if let Some(mode) = view {
            self.switch_view(mode);
        }
    }
}
