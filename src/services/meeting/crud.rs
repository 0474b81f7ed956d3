use super::shared::{format_instant, serialize_attendees, MeetingRow, MEETING_COLUMNS};
use super::MeetingService;
use crate::models::meeting::{Meeting, MeetingOutcome, StoredStatus};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

impl<'a> MeetingService<'a> {
    /// Insert a meeting. An empty id is replaced with a fresh UUID.
    pub fn create(&self, mut meeting: Meeting) -> Result<Meeting> {
        meeting.validate().map_err(|e| anyhow!(e))?;

        if meeting.id.trim().is_empty() {
            meeting.id = uuid::Uuid::new_v4().to_string();
        }

        let now = Utc::now();
        self.conn
            .execute(
                "INSERT INTO meetings (
                    id, subject, description, start_datetime, end_datetime,
                    join_link, attendees, lead_id, contact_id, status, outcome, organizer,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    meeting.id,
                    meeting.subject,
                    meeting.description,
                    format_instant(meeting.start),
                    format_instant(meeting.end),
                    meeting.join_link,
                    serialize_attendees(&meeting.attendees),
                    meeting.lead_id,
                    meeting.contact_id,
                    meeting.status.as_str(),
                    meeting.outcome.map(|o| o.as_str()),
                    meeting.organizer,
                    format_instant(now),
                    format_instant(now),
                ],
            )
            .context("Failed to insert meeting")?;

        meeting.created_at = Some(now);
        meeting.updated_at = Some(now);
        Ok(meeting)
    }

    /// Retrieve a meeting by id.
    pub fn get(&self, id: &str) -> Result<Option<Meeting>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM meetings WHERE id = ?1", MEETING_COLUMNS),
                [id],
                MeetingRow::from_row,
            )
            .optional()
            .context("Failed to load meeting")?;

        row.map(|row| {
            row.into_meeting()
                .map_err(|err| anyhow!("Meeting {} is unreadable: {}", id, err))
        })
        .transpose()
    }

    /// Move a meeting. Only the interval (and `updated_at`) is written.
    pub fn update_interval(
        &self,
        id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<()> {
        if end <= start {
            return Err(anyhow!("Meeting end time must be after start time"));
        }

        let rows_affected = self
            .conn
            .execute(
                "UPDATE meetings
                 SET start_datetime = ?1, end_datetime = ?2, updated_at = ?3
                 WHERE id = ?4",
                params![
                    format_instant(start),
                    format_instant(end),
                    format_instant(Utc::now()),
                    id
                ],
            )
            .context("Failed to update meeting time")?;

        if rows_affected == 0 {
            return Err(anyhow!("Meeting with id {} not found", id));
        }

        Ok(())
    }

    /// Mark a meeting cancelled. This is the only status ever written.
    pub fn cancel(&self, id: &str) -> Result<()> {
        self.set_column(id, "status", Some(StoredStatus::Cancelled.as_str()))
    }

    pub fn set_outcome(&self, id: &str, outcome: Option<MeetingOutcome>) -> Result<()> {
        self.set_column(id, "outcome", outcome.map(|o| o.as_str()))
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM meetings WHERE id = ?1", [id])
            .context("Failed to delete meeting")?;

        if rows_affected == 0 {
            return Err(anyhow!("Meeting with id {} not found", id));
        }

        Ok(())
    }

    fn set_column(&self, id: &str, column: &'static str, value: Option<&str>) -> Result<()> {
        let rows_affected = self
            .conn
            .execute(
                &format!(
                    "UPDATE meetings SET {} = ?1, updated_at = ?2 WHERE id = ?3",
                    column
                ),
                params![value, format_instant(Utc::now()), id],
            )
            .with_context(|| format!("Failed to update meeting {}", column))?;

        if rows_affected == 0 {
            return Err(anyhow!("Meeting with id {} not found", id));
        }

        Ok(())
    }
}
