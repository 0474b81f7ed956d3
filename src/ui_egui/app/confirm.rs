//! Reschedule confirmation dialog.
//!
//! Shown while a dropped meeting awaits confirmation. Both buttons are disabled
//! while the commit runs, so the same move cannot be submitted twice.

use crate::scheduling::ConfirmPrompt;
use egui::{Context, RichText};

/// Result of a confirmation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmResult {
    /// User confirmed the action
    Confirmed,
    /// User cancelled the action
    Cancelled,
    /// Dialog is still open
    Pending,
}

/// Render the dialog for `prompt` and report what the user chose this frame.
pub fn render_reschedule_dialog(ctx: &Context, prompt: &ConfirmPrompt) -> ConfirmResult {
    let mut result = ConfirmResult::Pending;

    egui::Window::new("Reschedule Meeting")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_min_width(300.0);
            ui.set_max_width(400.0);

            ui.add_space(10.0);
            ui.label(format!("Move \"{}\" to:", prompt.subject));
            ui.add_space(6.0);
            ui.label(RichText::new(&prompt.date_label).strong());
            ui.label(RichText::new(&prompt.time_label).strong());

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_enabled_ui(!prompt.busy, |ui| {
                        let label = if prompt.busy { "Saving…" } else { "Reschedule" };
                        if ui.button(label).clicked() {
                            result = ConfirmResult::Confirmed;
                        }

                        ui.add_space(10.0);

                        if ui.button("Cancel").clicked() {
                            result = ConfirmResult::Cancelled;
                        }
                    });

                    if prompt.busy {
                        ui.spinner();
                    }
                });
            });

            ui.add_space(5.0);
        });

    if !prompt.busy && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        result = ConfirmResult::Cancelled;
    }

    result
}
