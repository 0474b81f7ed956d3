//! Day and week hour grid.
//!
//! One column per visible day, one row per working hour. Each hour cell is a drop
//! target; the meeting chips are drag sources.

use egui::{Align2, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use super::palette::GridPalette;
use super::{chip_interaction, drag_pointer, ViewAction};
use crate::models::meeting::Meeting;
use crate::scheduling::composer::{GridChip, TimeGridView};
use crate::scheduling::time_grid::{GridMetrics, MIN_BLOCK_MINUTES};
use crate::scheduling::HoverCell;

pub const HOUR_HEIGHT: f32 = 48.0;
const TIME_LABEL_WIDTH: f32 = 56.0;
const HEADER_HEIGHT: f32 = 28.0;
const CHIP_GAP: f32 = 2.0;
const MIN_COLUMN_WIDTH: f32 = 60.0;

pub fn render_time_grid(
    ui: &mut egui::Ui,
    view: &TimeGridView,
    dragging: Option<&Meeting>,
    hovered: Option<HoverCell>,
    palette: &GridPalette,
) -> Vec<ViewAction> {
    let mut actions = Vec::new();
    let metrics = GridMetrics::new(view.hours, HOUR_HEIGHT);
    let columns = view.columns.len().max(1);
    let col_width = ((ui.available_width() - TIME_LABEL_WIDTH) / columns as f32).max(MIN_COLUMN_WIDTH);

    render_header(ui, view, col_width, palette, &mut actions);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .drag_to_scroll(false)
        .show(ui, |ui| {
            let size = Vec2::new(
                TIME_LABEL_WIDTH + col_width * columns as f32,
                metrics.total_height(),
            );
            let (grid_rect, _) = ui.allocate_exact_size(size, Sense::hover());
            let painter = ui.painter_at(grid_rect);

            for (idx, column) in view.columns.iter().enumerate() {
                let rect = column_rect(grid_rect, idx, col_width);
                let fill = if column.is_today {
                    palette.today_bg
                } else {
                    palette.background
                };
                painter.rect_filled(rect, 0.0, fill);
                painter.line_segment(
                    [rect.left_top(), rect.left_bottom()],
                    Stroke::new(1.0, palette.line),
                );
            }

            for (row, hour) in view.hours.hours().enumerate() {
                let y = grid_rect.top() + row as f32 * HOUR_HEIGHT;
                painter.line_segment(
                    [
                        Pos2::new(grid_rect.left() + TIME_LABEL_WIDTH, y),
                        Pos2::new(grid_rect.right(), y),
                    ],
                    Stroke::new(1.0, palette.line),
                );
                painter.text(
                    Pos2::new(grid_rect.left() + TIME_LABEL_WIDTH - 6.0, y + 2.0),
                    Align2::RIGHT_TOP,
                    format!("{:02}:00", hour),
                    FontId::proportional(12.0),
                    palette.muted_text,
                );
            }

            if let (Some(meeting), Some(cell)) = (dragging, hovered) {
                if let Some(rect) = drop_preview_rect(grid_rect, view, col_width, &metrics, meeting, cell) {
                    painter.rect_filled(rect, 4.0, palette.drop_target);
                }
            }

            for (idx, column) in view.columns.iter().enumerate() {
                let col = column_rect(grid_rect, idx, col_width);
                for chip in &column.chips {
                    let rect = chip_rect(col, grid_rect.top(), chip, &metrics).intersect(grid_rect);
                    if rect.height() <= 0.0 {
                        continue;
                    }
                    if let Some(action) = draw_chip(ui, rect, chip, dragging, palette) {
                        actions.push(action);
                    }
                }
            }

            if let Some(now) = view.now_line {
                if let Some(idx) = view.columns.iter().position(|c| c.date == now.date) {
                    let col = column_rect(grid_rect, idx, col_width);
                    let y = grid_rect.top() + metrics.y_for_minutes(now.offset);
                    painter.circle_filled(Pos2::new(col.left() + 3.0, y), 3.0, palette.now_line);
                    painter.line_segment(
                        [Pos2::new(col.left(), y), Pos2::new(col.right(), y)],
                        Stroke::new(2.0, palette.now_line),
                    );
                }
            }

            if dragging.is_some() {
                actions.extend(track_drag(ui, grid_rect, view, col_width, &metrics));
            }
        });

    actions
}

fn render_header(
    ui: &mut egui::Ui,
    view: &TimeGridView,
    col_width: f32,
    palette: &GridPalette,
    actions: &mut Vec<ViewAction>,
) {
    let size = Vec2::new(
        TIME_LABEL_WIDTH + col_width * view.columns.len() as f32,
        HEADER_HEIGHT,
    );
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);

    for (idx, column) in view.columns.iter().enumerate() {
        let cell = Rect::from_min_size(
            Pos2::new(rect.left() + TIME_LABEL_WIDTH + idx as f32 * col_width, rect.top()),
            Vec2::new(col_width, HEADER_HEIGHT),
        );
        let color = if column.is_today {
            palette.now_line
        } else {
            palette.text
        };
        painter.text(
            cell.center(),
            Align2::CENTER_CENTER,
            column.date.format("%a %-d").to_string(),
            FontId::proportional(13.0),
            color,
        );

        let response = ui
            .interact(cell, ui.id().with(("day_header", column.date)), Sense::click())
            .on_hover_text("Open day view");
        if response.clicked() {
            actions.push(ViewAction::ShowDay(column.date));
        }
    }
}

fn column_rect(grid_rect: Rect, idx: usize, col_width: f32) -> Rect {
    Rect::from_min_size(
        Pos2::new(
            grid_rect.left() + TIME_LABEL_WIDTH + idx as f32 * col_width,
            grid_rect.top(),
        ),
        Vec2::new(col_width, grid_rect.height()),
    )
}

fn chip_rect(col: Rect, grid_top: f32, chip: &GridChip, metrics: &GridMetrics) -> Rect {
    let (top, height) = metrics.block_extent(chip.placement);
    let lane_width = col.width() / chip.lane.count.max(1) as f32;
    let left = col.left() + lane_width * chip.lane.index as f32;

    Rect::from_min_size(
        Pos2::new(left + CHIP_GAP, grid_top + top + 1.0),
        Vec2::new(
            (lane_width - 2.0 * CHIP_GAP).max(4.0),
            (height - 2.0).max(4.0),
        ),
    )
}

fn draw_chip(
    ui: &egui::Ui,
    rect: Rect,
    chip: &GridChip,
    dragging: Option<&Meeting>,
    palette: &GridPalette,
) -> Option<ViewAction> {
    let is_dragged = dragging.is_some_and(|m| m.id == chip.meeting.id);
    let fill = palette.status_fill(chip.status);
    let fill = if is_dragged { fill.gamma_multiply(0.45) } else { fill };

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, fill);
    painter.text(
        rect.left_top() + Vec2::new(4.0, 2.0),
        Align2::LEFT_TOP,
        &chip.meeting.subject,
        FontId::proportional(12.0),
        palette.chip_text,
    );
    if rect.height() >= 32.0 {
        painter.text(
            rect.left_top() + Vec2::new(4.0, 16.0),
            Align2::LEFT_TOP,
            &chip.time_label,
            FontId::proportional(11.0),
            palette.chip_text,
        );
    }

    let response = ui.interact(
        rect,
        ui.id().with(("grid_chip", chip.meeting.id.as_str())),
        Sense::click_and_drag(),
    );
    if response.hovered() && dragging.is_none() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
    }
    chip_interaction(response, &chip.meeting, chip.status, &chip.time_label)
}

fn drop_preview_rect(
    grid_rect: Rect,
    view: &TimeGridView,
    col_width: f32,
    metrics: &GridMetrics,
    meeting: &Meeting,
    cell: HoverCell,
) -> Option<Rect> {
    let idx = view.columns.iter().position(|c| c.date == cell.day)?;
    let hour = cell.hour?;
    let col = column_rect(grid_rect, idx, col_width);

    let top = metrics.y_for_minutes((hour.saturating_sub(view.hours.start_hour()) * 60) as f32);
    let minutes = meeting.duration().num_minutes().max(MIN_BLOCK_MINUTES);
    let height = metrics.y_for_minutes(minutes as f32);

    Some(
        Rect::from_min_size(
            Pos2::new(col.left(), grid_rect.top() + top),
            Vec2::new(col_width, height),
        )
        .intersect(grid_rect),
    )
}

/// Translate the pointer into hover/drop actions for the active drag.
fn track_drag(
    ui: &egui::Ui,
    grid_rect: Rect,
    view: &TimeGridView,
    col_width: f32,
    metrics: &GridMetrics,
) -> Vec<ViewAction> {
    let (pointer, released) = drag_pointer(ui);
    ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);

    let cell = pointer
        .filter(|pos| grid_rect.contains(*pos))
        .and_then(|pos| {
            let column = ((pos.x - grid_rect.left() - TIME_LABEL_WIDTH) / col_width).floor();
            if column < 0.0 {
                return None;
            }
            let day = view.columns.get(column as usize)?.date;
            let hour = metrics.hour_at(pos.y - grid_rect.top())?;
            Some(HoverCell::slot(day, hour))
        });

    match (cell, released) {
        (Some(cell), true) => vec![ViewAction::Drop(cell)],
        (None, true) => vec![ViewAction::CancelDrag],
        (Some(cell), false) => vec![ViewAction::Hover(cell)],
        (None, false) => Vec::new(),
    }
}
