use crate::models::settings::Settings;
use crate::services::database::Database;
use crate::services::settings::SettingsService;
use anyhow::Result;
use egui::{Color32, RichText};

const LABEL_WIDTH: f32 = 180.0;
const MAX_MONTH_CELL_LIMIT: usize = 10;

/// Draft edited by the open settings window.
#[derive(Debug, Clone)]
pub struct SettingsDialogState {
    pub draft: Settings,
    pub error: Option<String>,
}

impl SettingsDialogState {
    pub fn new(current: &Settings) -> Self {
        Self {
            draft: current.clone(),
            error: None,
        }
    }
}

/// What the user did with the settings window this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsDialogResult {
    /// Saved and persisted; carries the stored settings
    Saved(Settings),
    Cancelled,
    Open,
}

/// Validate and persist `draft`, returning what was stored.
pub fn save_settings(database: &Database, draft: &Settings) -> Result<Settings> {
    SettingsService::new(database).update(draft)?;
    Ok(draft.clone())
}

/// Render the settings window.
pub fn render_settings_dialog(
    ctx: &egui::Context,
    state: &mut SettingsDialogState,
    database: &Database,
) -> SettingsDialogResult {
    let mut result = SettingsDialogResult::Open;
    let mut window_open = true;

    egui::Window::new("Settings")
        .open(&mut window_open)
        .collapsible(false)
        .resizable(false)
        .default_width(380.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if let Some(error) = &state.error {
                ui.colored_label(Color32::RED, RichText::new(error).strong());
                ui.add_space(8.0);
            }

            ui.heading("Working hours");
            ui.add_space(4.0);

            labelled_row(ui, "Day starts at:", |ui| {
                ui.add(
                    egui::DragValue::new(&mut state.draft.day_start_hour)
                        .range(0..=23)
                        .suffix(":00"),
                );
            });
            labelled_row(ui, "Day ends at:", |ui| {
                ui.add(
                    egui::DragValue::new(&mut state.draft.day_end_hour)
                        .range(1..=24)
                        .suffix(":00"),
                );
            });

            if state.draft.day_start_hour >= state.draft.day_end_hour {
                ui.horizontal(|ui| {
                    ui.add_space(LABEL_WIDTH);
                    ui.colored_label(Color32::LIGHT_RED, "⚠ Day must start before it ends");
                });
            }

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(8.0);

            ui.heading("Month view");
            ui.add_space(4.0);

            labelled_row(ui, "Meetings per day:", |ui| {
                ui.add(
                    egui::DragValue::new(&mut state.draft.month_cell_limit)
                        .range(1..=MAX_MONTH_CELL_LIMIT),
                );
            });

            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button("💾 Save").clicked() {
                    match save_settings(database, &state.draft) {
                        Ok(saved) => result = SettingsDialogResult::Saved(saved),
                        Err(e) => {
                            log::warn!("Settings not saved: {:#}", e);
                            state.error = Some(format!("Failed to save settings: {}", e));
                        }
                    }
                }

                if ui.button("✖ Cancel").clicked() {
                    result = SettingsDialogResult::Cancelled;
                }

                ui.add_space(20.0);

                if ui
                    .button(RichText::new("↺ Reset to Defaults").color(Color32::LIGHT_BLUE))
                    .clicked()
                {
                    state.draft = Settings {
                        current_view: state.draft.current_view,
                        ..Settings::default()
                    };
                    state.error = None;
                }
            });
        });

    if !window_open {
        result = SettingsDialogResult::Cancelled;
    }
    result
}

fn labelled_row(ui: &mut egui::Ui, label: &str, add_value: impl FnOnce(&mut egui::Ui)) {
    ui.horizontal(|ui| {
        ui.allocate_ui_with_layout(
            egui::Vec2::new(LABEL_WIDTH, 20.0),
            egui::Layout::right_to_left(egui::Align::Center),
            |ui| {
                ui.label(label);
            },
        );
        add_value(ui);
    });
}
