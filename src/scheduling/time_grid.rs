//! Mapping between wall-clock time and grid coordinates.
//!
//! Day and week views draw one row per hour inside a working-hours window. All
//! offsets here are in minutes from the top of that window; [`GridMetrics`] turns
//! them into pixels for the renderer and back again for drop targets.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::collections::BTreeMap;

/// Blocks shorter than this are stretched so they stay visible and clickable.
pub const MIN_BLOCK_MINUTES: i64 = 30;

/// Hour range `[start_hour, end_hour)` rendered in day/week grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    start_hour: u32,
    end_hour: u32,
}

impl WorkingHours {
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, String> {
        if end_hour > 24 || start_hour >= end_hour {
            return Err(format!(
                "Invalid working hours {:02}:00-{:02}:00",
                start_hour, end_hour
            ));
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    /// Hour rows from top to bottom.
    pub fn hours(&self) -> std::ops::Range<u32> {
        self.start_hour..self.end_hour
    }

    pub fn total_minutes(&self) -> i64 {
        i64::from(self.end_hour - self.start_hour) * 60
    }

    /// Minutes from the top of the window; negative above it.
    pub fn offset_of(&self, time: NaiveTime) -> i64 {
        (i64::from(time.hour()) - i64::from(self.start_hour)) * 60 + i64::from(time.minute())
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start_hour: crate::models::settings::DEFAULT_DAY_START_HOUR,
            end_hour: crate::models::settings::DEFAULT_DAY_END_HOUR,
        }
    }
}

/// Vertical placement of a meeting block, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPlacement {
    pub top: i64,
    pub height: i64,
}

/// Place a meeting in the day/week grid.
///
/// Returns `None` when the start lies outside the window; such meetings are not
/// drawn in the time grid but still appear in month cells.
pub fn place(start: NaiveDateTime, end: NaiveDateTime, hours: WorkingHours) -> Option<GridPlacement> {
    let top = hours.offset_of(start.time());
    if top < 0 || top > hours.total_minutes() {
        return None;
    }

    let duration = (end - start).num_minutes();
    Some(GridPlacement {
        top,
        height: duration.max(MIN_BLOCK_MINUTES),
    })
}

/// Offset of the live "current time" line, or `None` when outside the window.
pub fn now_offset(now: NaiveTime, hours: WorkingHours) -> Option<f32> {
    let minutes = hours.offset_of(now) as f32 + now.second() as f32 / 60.0;
    if minutes < 0.0 || minutes > hours.total_minutes() as f32 {
        return None;
    }
    Some(minutes)
}

/// Side-by-side position of a block among meetings that overlap it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lane {
    pub index: usize,
    pub count: usize,
}

/// Assign overlapping intervals to lanes.
///
/// Intervals are processed by start time and take the first free lane. Every
/// interval in a connected cluster of overlaps shares the cluster's lane count, so
/// blocks in one cluster have equal widths. Short intervals are widened to
/// [`MIN_BLOCK_MINUTES`] first since that is how tall they render.
pub fn assign_lanes(intervals: &[(NaiveDateTime, NaiveDateTime)]) -> Vec<Lane> {
    let mut order: Vec<usize> = (0..intervals.len()).collect();
    order.sort_by_key(|&i| (intervals[i].0, intervals[i].1));

    let mut lanes = vec![Lane { index: 0, count: 1 }; intervals.len()];
    let mut lane_ends: Vec<NaiveDateTime> = Vec::new();
    let mut cluster: Vec<usize> = Vec::new();
    let mut cluster_end: Option<NaiveDateTime> = None;

    for idx in order {
        let (start, end) = intervals[idx];
        let end = end.max(start + Duration::minutes(MIN_BLOCK_MINUTES));

        if cluster_end.is_some_and(|cluster_end| start >= cluster_end) {
            close_cluster(&mut lanes, &cluster, lane_ends.len());
            cluster.clear();
            lane_ends.clear();
            cluster_end = None;
        }

        let lane = match lane_ends.iter().position(|lane_end| *lane_end <= start) {
            Some(free) => {
                lane_ends[free] = end;
                free
            }
            None => {
                lane_ends.push(end);
                lane_ends.len() - 1
            }
        };

        lanes[idx].index = lane;
        cluster.push(idx);
        cluster_end = Some(cluster_end.map_or(end, |current| current.max(end)));
    }

    close_cluster(&mut lanes, &cluster, lane_ends.len());
    lanes
}

fn close_cluster(lanes: &mut [Lane], cluster: &[usize], count: usize) {
    for &idx in cluster {
        lanes[idx].count = count.max(1);
    }
}

/// Group items by calendar day, keeping input order within each day.
pub fn bucket_by_day<T, F>(items: impl IntoIterator<Item = T>, day_of: F) -> BTreeMap<NaiveDate, Vec<T>>
where
    F: Fn(&T) -> NaiveDate,
{
    let mut buckets: BTreeMap<NaiveDate, Vec<T>> = BTreeMap::new();
    for item in items {
        buckets.entry(day_of(&item)).or_default().push(item);
    }
    buckets
}

/// Split a day's entries into the visible ones and the hidden count.
pub fn cap_entries<T>(mut entries: Vec<T>, limit: usize) -> (Vec<T>, usize) {
    if entries.len() <= limit {
        return (entries, 0);
    }
    let hidden = entries.len() - limit;
    entries.truncate(limit);
    (entries, hidden)
}

pub fn overflow_label(hidden: usize) -> Option<String> {
    (hidden > 0).then(|| format!("+{} more", hidden))
}

/// Pixel scale for a rendered hour grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub hours: WorkingHours,
    pub hour_height: f32,
}

impl GridMetrics {
    pub fn new(hours: WorkingHours, hour_height: f32) -> Self {
        Self { hours, hour_height }
    }

    pub fn total_height(&self) -> f32 {
        self.y_for_minutes(self.hours.total_minutes() as f32)
    }

    /// `(top, height)` in pixels relative to the grid's top edge, kept inside the
    /// grid. A block starting on the bottom boundary is lifted so its minimum
    /// height stays visible.
    pub fn block_extent(&self, placement: GridPlacement) -> (f32, f32) {
        let total = self.total_height();
        let min_height = self.y_for_minutes(MIN_BLOCK_MINUTES as f32).min(total);
        let top = self
            .y_for_minutes(placement.top as f32)
            .min(total - min_height);
        let height = self
            .y_for_minutes(placement.height as f32)
            .min(total - top);
        (top, height)
    }

    pub fn y_for_minutes(&self, minutes: f32) -> f32 {
        minutes * self.hour_height / 60.0
    }

    /// Hour row under a pointer at `y` pixels below the grid's top edge.
    pub fn hour_at(&self, y: f32) -> Option<u32> {
        if y < 0.0 || y >= self.total_height() {
            return None;
        }
        let row = (y / self.hour_height).floor() as u32;
        Some(self.hours.start_hour() + row)
    }
}
