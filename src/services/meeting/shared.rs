use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;

use crate::models::meeting::{Attendee, Meeting, MeetingOutcome, StoredStatus};

pub(crate) const MEETING_COLUMNS: &str = "id, subject, description, start_datetime, end_datetime,
        join_link, attendees, lead_id, contact_id, status, outcome, organizer,
        created_at, updated_at";

/// Timestamps are stored as fixed-width UTC RFC 3339 (nanoseconds, `Z` suffix) so
/// that string order matches time order in range queries.
pub(crate) fn format_instant(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub(crate) fn serialize_attendees(attendees: &[Attendee]) -> Option<String> {
    if attendees.is_empty() {
        return None;
    }
    serde_json::to_string(attendees).ok()
}

fn deserialize_attendees(json: Option<&str>) -> Vec<Attendee> {
    let Some(json) = json.filter(|json| !json.trim().is_empty()) else {
        return Vec::new();
    };

    serde_json::from_str(json).unwrap_or_else(|err| {
        log::warn!("Ignoring unreadable attendee list: {}", err);
        Vec::new()
    })
}

/// Raw column values of a `meetings` row, before timestamp parsing.
pub(crate) struct MeetingRow {
    id: String,
    subject: String,
    description: Option<String>,
    start: String,
    end: String,
    join_link: Option<String>,
    attendees: Option<String>,
    lead_id: Option<String>,
    contact_id: Option<String>,
    status: String,
    outcome: Option<String>,
    organizer: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl MeetingRow {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            subject: row.get(1)?,
            description: row.get(2)?,
            start: row.get(3)?,
            end: row.get(4)?,
            join_link: row.get(5)?,
            attendees: row.get(6)?,
            lead_id: row.get(7)?,
            contact_id: row.get(8)?,
            status: row.get(9)?,
            outcome: row.get(10)?,
            organizer: row.get(11)?,
            created_at: row.get(12)?,
            updated_at: row.get(13)?,
        })
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    /// Convert to a typed meeting; fails when either interval timestamp is invalid.
    pub(crate) fn into_meeting(self) -> Result<Meeting, String> {
        let start = parse_instant(&self.start)
            .ok_or_else(|| format!("invalid start timestamp '{}'", self.start))?;
        let end = parse_instant(&self.end)
            .ok_or_else(|| format!("invalid end timestamp '{}'", self.end))?;

        Ok(Meeting {
            attendees: deserialize_attendees(self.attendees.as_deref()),
            id: self.id,
            subject: self.subject,
            description: self.description,
            start,
            end,
            join_link: self.join_link,
            lead_id: self.lead_id,
            contact_id: self.contact_id,
            status: StoredStatus::from_db(&self.status),
            outcome: self.outcome.as_deref().and_then(MeetingOutcome::from_db),
            organizer: self.organizer,
            created_at: self.created_at.as_deref().and_then(parse_instant),
            updated_at: self.updated_at.as_deref().and_then(parse_instant),
        })
    }
}

/// Keep parsable rows, logging and skipping the rest so one bad record does not
/// hide the whole calendar.
pub(crate) fn collect_meetings(rows: Vec<MeetingRow>) -> Vec<Meeting> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id().to_string();
            match row.into_meeting() {
                Ok(meeting) => Some(meeting),
                Err(err) => {
                    log::warn!("Skipping meeting {}: {}", id, err);
                    None
                }
            }
        })
        .collect()
}
