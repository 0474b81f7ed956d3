//! Derived meeting status.
//!
//! A meeting only ever stores one override, `cancelled`. Every other state is
//! recomputed from its interval against an explicit `now` on each evaluation.

use chrono::{DateTime, Utc};

use crate::models::meeting::{Meeting, StoredStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeetingStatus {
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

impl MeetingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MeetingStatus::Scheduled => "Scheduled",
            MeetingStatus::Ongoing => "Ongoing",
            MeetingStatus::Completed => "Completed",
            MeetingStatus::Cancelled => "Cancelled",
        }
    }

    /// Terminal meetings can no longer be moved on the calendar.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MeetingStatus::Completed | MeetingStatus::Cancelled)
    }

    /// Chip fill as `(r, g, b)`.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            MeetingStatus::Scheduled => (66, 133, 244),
            MeetingStatus::Ongoing => (52, 168, 83),
            MeetingStatus::Completed => (140, 140, 150),
            MeetingStatus::Cancelled => (219, 68, 55),
        }
    }
}

/// Resolve the status of a typed meeting.
pub fn resolve_status(meeting: &Meeting, now: DateTime<Utc>) -> MeetingStatus {
    resolve(meeting.status, Some(meeting.start), Some(meeting.end), now)
}

/// Resolve the status from raw stored values.
///
/// Timestamps that fail to parse as RFC 3339 degrade to `Scheduled` instead of
/// failing, so a single malformed record cannot break a calendar render.
pub fn resolve_status_parts(
    stored_status: &str,
    start: &str,
    end: &str,
    now: DateTime<Utc>,
) -> MeetingStatus {
    resolve(
        StoredStatus::from_db(stored_status),
        parse_instant(start),
        parse_instant(end),
        now,
    )
}

fn resolve(
    stored: StoredStatus,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> MeetingStatus {
    if stored == StoredStatus::Cancelled {
        return MeetingStatus::Cancelled;
    }

    let (Some(start), Some(end)) = (start, end) else {
        return MeetingStatus::Scheduled;
    };

    if now >= end {
        MeetingStatus::Completed
    } else if start <= now {
        MeetingStatus::Ongoing
    } else {
        MeetingStatus::Scheduled
    }
}

fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
