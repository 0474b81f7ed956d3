//! Footer with per-status meeting counts.

use super::CalendarApp;
use crate::scheduling::MeetingStatus;
use crate::services::meeting::MeetingService;
use chrono::Utc;
use egui::{Color32, RichText};

const STATUS_ORDER: [MeetingStatus; 4] = [
    MeetingStatus::Scheduled,
    MeetingStatus::Ongoing,
    MeetingStatus::Completed,
    MeetingStatus::Cancelled,
];

fn secondary_text_color(is_dark: bool) -> Color32 {
    if is_dark {
        Color32::from_gray(160)
    } else {
        Color32::from_gray(100)
    }
}

impl CalendarApp {
    pub(super) fn render_status_bar(&self, ctx: &egui::Context) {
        let color = secondary_text_color(self.is_dark);

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(RichText::new("All meetings:").small().color(color));
                    for status in STATUS_ORDER {
                        let count = self.status_counts.get(&status).copied().unwrap_or(0);
                        ui.add_space(8.0);
                        ui.label(
                            RichText::new(format!("{} {}", count, status.label()))
                                .small()
                                .color(color),
                        );
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new("Drag a meeting to reschedule · Ctrl+S settings")
                                .small()
                                .color(color),
                        );
                    });
                });
            });
    }

    /// Recount meetings per status as of now.
    pub(super) fn refresh_status_counts(&mut self) {
        let result = {
            let conn = self.services.database.connection();
            MeetingService::new(&conn).count_by_status(Utc::now())
        };

        match result {
            Ok(counts) => self.status_counts = counts,
            Err(e) => log::error!("Failed to count meetings by status: {:#}", e),
        }
    }
}
