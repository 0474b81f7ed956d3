//! Month grid: whole weeks, Monday first. Each day cell is a drop target that
//! keeps the meeting's time of day.

use egui::{Align2, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use super::palette::GridPalette;
use super::{chip_interaction, drag_pointer, ViewAction};
use crate::models::meeting::Meeting;
use crate::scheduling::composer::{MonthCell, MonthChip, MonthView};
use crate::scheduling::HoverCell;

const WEEKDAY_HEADER_HEIGHT: f32 = 24.0;
const DAY_NUMBER_HEIGHT: f32 = 20.0;
const CHIP_HEIGHT: f32 = 18.0;
const CHIP_SPACING: f32 = 2.0;
const MIN_CELL_HEIGHT: f32 = 90.0;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn render_month(
    ui: &mut egui::Ui,
    view: &MonthView,
    dragging: Option<&Meeting>,
    hovered: Option<HoverCell>,
    palette: &GridPalette,
) -> Vec<ViewAction> {
    let mut actions = Vec::new();
    let cell_width = ui.available_width() / 7.0;

    let (header_rect, _) =
        ui.allocate_exact_size(Vec2::new(cell_width * 7.0, WEEKDAY_HEADER_HEIGHT), Sense::hover());
    let header_painter = ui.painter_at(header_rect);
    for (idx, name) in WEEKDAYS.iter().enumerate() {
        header_painter.text(
            Pos2::new(
                header_rect.left() + (idx as f32 + 0.5) * cell_width,
                header_rect.center().y,
            ),
            Align2::CENTER_CENTER,
            name,
            FontId::proportional(13.0),
            palette.muted_text,
        );
    }

    let rows = view.weeks.len().max(1);
    let cell_height = (ui.available_height() / rows as f32).max(MIN_CELL_HEIGHT);
    let (grid_rect, _) =
        ui.allocate_exact_size(Vec2::new(cell_width * 7.0, cell_height * rows as f32), Sense::hover());

    for (row, week) in view.weeks.iter().enumerate() {
        for (col, cell) in week.iter().enumerate() {
            let rect = Rect::from_min_size(
                Pos2::new(
                    grid_rect.left() + col as f32 * cell_width,
                    grid_rect.top() + row as f32 * cell_height,
                ),
                Vec2::new(cell_width, cell_height),
            );
            let is_drop_target = dragging.is_some() && hovered.is_some_and(|h| h.day == cell.date);
            actions.extend(render_cell(ui, rect, cell, dragging, is_drop_target, palette));
        }
    }

    if dragging.is_some() {
        let (pointer, released) = drag_pointer(ui);
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);

        let cell = pointer.filter(|pos| grid_rect.contains(*pos)).and_then(|pos| {
            let col = ((pos.x - grid_rect.left()) / cell_width).floor() as usize;
            let row = ((pos.y - grid_rect.top()) / cell_height).floor() as usize;
            view.weeks
                .get(row)
                .and_then(|week| week.get(col))
                .map(|cell| HoverCell::day(cell.date))
        });

        match (cell, released) {
            (Some(cell), true) => actions.push(ViewAction::Drop(cell)),
            (None, true) => actions.push(ViewAction::CancelDrag),
            (Some(cell), false) => actions.push(ViewAction::Hover(cell)),
            (None, false) => {}
        }
    }

    actions
}

fn render_cell(
    ui: &egui::Ui,
    rect: Rect,
    cell: &MonthCell,
    dragging: Option<&Meeting>,
    is_drop_target: bool,
    palette: &GridPalette,
) -> Vec<ViewAction> {
    let mut actions = Vec::new();
    let painter = ui.painter_at(rect);

    let fill = if cell.is_today {
        palette.today_bg
    } else if cell.in_current_month {
        palette.background
    } else {
        palette.other_month_bg
    };
    painter.rect_filled(rect, 0.0, fill);
    painter.rect_stroke(rect, 0.0, Stroke::new(1.0, palette.line));
    if is_drop_target {
        painter.rect_filled(rect.shrink(1.0), 2.0, palette.drop_target);
    }

    let number_color = if cell.is_today {
        palette.now_line
    } else if cell.in_current_month {
        palette.text
    } else {
        palette.muted_text
    };
    let number_rect = Rect::from_min_size(rect.left_top(), Vec2::new(rect.width(), DAY_NUMBER_HEIGHT));
    painter.text(
        number_rect.left_center() + Vec2::new(6.0, 0.0),
        Align2::LEFT_CENTER,
        cell.date.format("%-d").to_string(),
        FontId::proportional(13.0),
        number_color,
    );
    if ui
        .interact(number_rect, ui.id().with(("month_day", cell.date)), Sense::click())
        .on_hover_text("Open day view")
        .clicked()
    {
        actions.push(ViewAction::ShowDay(cell.date));
    }

    let mut y = rect.top() + DAY_NUMBER_HEIGHT;
    for chip in &cell.chips {
        let chip_rect = Rect::from_min_size(
            Pos2::new(rect.left() + 3.0, y),
            Vec2::new(rect.width() - 6.0, CHIP_HEIGHT),
        );
        if chip_rect.bottom() > rect.bottom() {
            break;
        }
        if let Some(action) = draw_chip(ui, chip_rect, chip, dragging, palette) {
            actions.push(action);
        }
        y += CHIP_HEIGHT + CHIP_SPACING;
    }

    if let Some(label) = &cell.overflow {
        let more_rect = Rect::from_min_size(
            Pos2::new(rect.left() + 3.0, y),
            Vec2::new(rect.width() - 6.0, CHIP_HEIGHT),
        );
        painter.text(
            more_rect.left_center() + Vec2::new(4.0, 0.0),
            Align2::LEFT_CENTER,
            label,
            FontId::proportional(11.0),
            palette.muted_text,
        );
        if ui
            .interact(more_rect, ui.id().with(("month_more", cell.date)), Sense::click())
            .on_hover_text(format!("{} more meetings on this day", cell.hidden))
            .clicked()
        {
            actions.push(ViewAction::ShowDay(cell.date));
        }
    }

    actions
}

fn draw_chip(
    ui: &egui::Ui,
    rect: Rect,
    chip: &MonthChip,
    dragging: Option<&Meeting>,
    palette: &GridPalette,
) -> Option<ViewAction> {
    let is_dragged = dragging.is_some_and(|m| m.id == chip.meeting.id);
    let fill = palette.status_fill(chip.status);
    let fill = if is_dragged { fill.gamma_multiply(0.45) } else { fill };

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 3.0, fill);
    painter.text(
        rect.left_center() + Vec2::new(4.0, 0.0),
        Align2::LEFT_CENTER,
        format!("{} {}", chip.time_label, chip.meeting.subject),
        FontId::proportional(11.0),
        palette.chip_text,
    );

    let response = ui.interact(
        rect,
        ui.id().with(("month_chip", chip.meeting.id.as_str())),
        Sense::click_and_drag(),
    );
    chip_interaction(response, &chip.meeting, chip.status, &chip.time_label)
}
