//! Calendar view rendering.
//!
//! Views draw a composed [`CalendarView`](crate::scheduling::CalendarView) and
//! report what the user did as [`ViewAction`]s; they never mutate state.

use chrono::NaiveDate;
use egui::{Response, RichText};

use crate::models::meeting::Meeting;
use crate::scheduling::{HoverCell, MeetingStatus};

pub mod month_view;
pub mod palette;
pub mod time_grid;

/// Interaction reported by a view for the app to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    StartDrag(Meeting),
    Hover(HoverCell),
    Drop(HoverCell),
    CancelDrag,
    OpenLink(String),
    ShowDay(NaiveDate),
}

/// Shared chip behaviour: drag to reschedule, hover for details, right-click menu.
pub(crate) fn chip_interaction(
    response: Response,
    meeting: &Meeting,
    status: MeetingStatus,
    time_label: &str,
) -> Option<ViewAction> {
    let mut action = None;

    if response.drag_started() {
        action = Some(ViewAction::StartDrag(meeting.clone()));
    }

    let mut tooltip = format!("{}\n{}\n{}", meeting.subject, time_label, status.label());
    if !meeting.attendees.is_empty() {
        let names: Vec<&str> = meeting.attendees.iter().map(|a| a.display_name()).collect();
        tooltip.push_str(&format!("\nWith: {}", names.join(", ")));
    }
    let response = response.on_hover_text(tooltip);

    response.context_menu(|ui| {
        ui.set_min_width(160.0);
        ui.label(RichText::new(&meeting.subject).strong());
        ui.label(RichText::new(status.label()).weak());
        ui.separator();

        match meeting.join_link() {
            Some(link) => {
                if ui.button("🔗 Open join link").clicked() {
                    action = Some(ViewAction::OpenLink(link.to_string()));
                    ui.close_menu();
                }
            }
            None => {
                ui.label(RichText::new("No join link").italics().weak());
            }
        }
    });

    action
}

/// Pointer position while a drag is in progress, and whether it was released
/// this frame.
pub(crate) fn drag_pointer(ui: &egui::Ui) -> (Option<egui::Pos2>, bool) {
    ui.input(|i| {
        (
            i.pointer.interact_pos().or(i.pointer.hover_pos()),
            i.pointer.any_released(),
        )
    })
}
