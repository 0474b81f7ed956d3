//! Drag-to-reschedule state machine.
//!
//! `Idle -> Dragging -> {Idle | PendingConfirm}`. Validation happens when the
//! meeting is dropped, not when the drag starts, so every chip drags the same way
//! and the user is told why a move was refused.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use thiserror::Error;

use super::status::{resolve_status, MeetingStatus};
use crate::models::meeting::Meeting;
use crate::models::ui::ViewMode;

/// Grid cell under the pointer. Month cells carry no hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverCell {
    pub day: NaiveDate,
    pub hour: Option<u32>,
}

impl HoverCell {
    pub fn day(day: NaiveDate) -> Self {
        Self { day, hour: None }
    }

    pub fn slot(day: NaiveDate, hour: u32) -> Self {
        Self {
            day,
            hour: Some(hour),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub meeting: Meeting,
    pub view: ViewMode,
    pub hovered: Option<HoverCell>,
}

/// A proposed move awaiting explicit confirmation. Nothing is written until the
/// user confirms it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReschedule {
    pub meeting: Meeting,
    pub new_start: DateTime<Utc>,
    pub new_end: DateTime<Utc>,
}

impl PendingReschedule {
    /// Target date and time formatted for the confirmation prompt.
    pub fn target_labels<Tz: TimeZone>(&self, tz: &Tz) -> (String, String)
    where
        Tz::Offset: std::fmt::Display,
    {
        let start = self.new_start.with_timezone(tz);
        let end = self.new_end.with_timezone(tz);
        (
            start.format("%A, %B %-d, %Y").to_string(),
            format!("{} - {}", start.format("%H:%M"), end.format("%H:%M")),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DropRejection {
    #[error("\"{subject}\" is cancelled and cannot be rescheduled")]
    Cancelled { subject: String },
    #[error("\"{subject}\" is completed and cannot be rescheduled")]
    Completed { subject: String },
    #[error("Cannot reschedule a meeting into the past")]
    InPast,
    #[error("{0:02}:00 is not a valid hour")]
    InvalidHour(u32),
    #[error("{0} does not exist in the local timezone")]
    NonexistentLocalTime(NaiveDateTime),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// No drag was active.
    Ignored,
    Rejected(DropRejection),
    Pending(PendingReschedule),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
    PendingConfirm(PendingReschedule),
}

/// Owns the single drag session and the single pending reschedule.
#[derive(Debug, Default)]
pub struct RescheduleController {
    state: DragState,
}

impl RescheduleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&PendingReschedule> {
        match &self.state {
            DragState::PendingConfirm(pending) => Some(pending),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Begin dragging `meeting`. Returns `false` without changing state when there is
    /// no meeting, or when a drag or a pending confirmation already exists.
    pub fn start_drag(&mut self, meeting: Option<&Meeting>, view: ViewMode) -> bool {
        let Some(meeting) = meeting else {
            return false;
        };
        if !matches!(self.state, DragState::Idle) {
            return false;
        }

        self.state = DragState::Dragging(DragSession {
            meeting: meeting.clone(),
            view,
            hovered: None,
        });
        true
    }

    pub fn hover(&mut self, cell: HoverCell) {
        if let DragState::Dragging(session) = &mut self.state {
            session.hovered = Some(cell);
        }
    }

    /// Validate a drop and, when it is acceptable, move to `PendingConfirm`.
    pub fn drop_on<Tz: TimeZone>(
        &mut self,
        cell: HoverCell,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> DropOutcome {
        if !self.is_dragging() {
            return DropOutcome::Ignored;
        }
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return DropOutcome::Ignored;
        };

        match propose(&session.meeting, session.view, cell, now, tz) {
            Ok(pending) => {
                log::debug!(
                    "Proposed moving meeting {} to {}",
                    pending.meeting.id,
                    pending.new_start
                );
                self.state = DragState::PendingConfirm(pending.clone());
                DropOutcome::Pending(pending)
            }
            Err(rejection) => {
                log::warn!(
                    "Rejected drop of meeting {}: {}",
                    session.meeting.id,
                    rejection
                );
                DropOutcome::Rejected(rejection)
            }
        }
    }

    /// Abandon the current drag. Safe to call at any time; a pending confirmation
    /// is left alone.
    pub fn cancel_drag(&mut self) {
        if self.is_dragging() {
            self.state = DragState::Idle;
        }
    }

    /// Discard the pending reschedule without side effects.
    pub fn cancel_pending(&mut self) -> Option<PendingReschedule> {
        match std::mem::take(&mut self.state) {
            DragState::PendingConfirm(pending) => Some(pending),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Clear the pending reschedule after it was committed.
    pub fn complete_pending(&mut self) {
        if self.pending().is_some() {
            self.state = DragState::Idle;
        }
    }
}

/// Run the drop validation gate for `meeting` landing on `cell`.
pub fn propose<Tz: TimeZone>(
    meeting: &Meeting,
    view: ViewMode,
    cell: HoverCell,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<PendingReschedule, DropRejection> {
    match resolve_status(meeting, now) {
        MeetingStatus::Cancelled => {
            return Err(DropRejection::Cancelled {
                subject: meeting.subject.clone(),
            })
        }
        MeetingStatus::Completed => {
            return Err(DropRejection::Completed {
                subject: meeting.subject.clone(),
            })
        }
        MeetingStatus::Scheduled | MeetingStatus::Ongoing => {}
    }

    let duration = meeting.duration();
    let new_start = target_start(meeting, view, cell, tz)?;
    let new_end = new_start + duration;

    if new_start < now {
        return Err(DropRejection::InPast);
    }

    Ok(PendingReschedule {
        meeting: meeting.clone(),
        new_start,
        new_end,
    })
}

/// New start for a drop.
///
/// Month cells keep the original time of day and swap the date. Day/week slots
/// take the dropped hour (or the original hour when the cell has none) on the
/// dropped day, at minute zero.
pub fn target_start<Tz: TimeZone>(
    meeting: &Meeting,
    view: ViewMode,
    cell: HoverCell,
    tz: &Tz,
) -> Result<DateTime<Utc>, DropRejection> {
    let original = meeting.start.with_timezone(tz).naive_local();

    let naive = if view.is_time_grid() {
        let hour = cell.hour.unwrap_or(original.hour());
        let time = NaiveTime::from_hms_opt(hour, 0, 0).ok_or(DropRejection::InvalidHour(hour))?;
        cell.day.and_time(time)
    } else {
        cell.day.and_time(original.time())
    };

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or(DropRejection::NonexistentLocalTime(naive))
}
