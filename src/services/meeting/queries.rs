use std::collections::HashMap;

use super::shared::{collect_meetings, format_instant, MeetingRow, MEETING_COLUMNS};
use super::MeetingService;
use crate::models::meeting::Meeting;
use crate::scheduling::status::{resolve_status_parts, MeetingStatus};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

impl<'a> MeetingService<'a> {
    /// Meetings overlapping `[start, end)`.
    pub fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Meeting>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM meetings
             WHERE start_datetime < ?1 AND end_datetime > ?2
             ORDER BY start_datetime ASC",
            MEETING_COLUMNS
        ))?;

        let rows = stmt
            .query_map(
                [format_instant(end), format_instant(start)],
                MeetingRow::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to query meetings by date range")?;

        Ok(collect_meetings(rows))
    }

    /// Count meetings per derived status, reading raw stored values so rows with
    /// malformed timestamps are still counted (as scheduled).
    pub fn count_by_status(&self, now: DateTime<Utc>) -> Result<HashMap<MeetingStatus, usize>> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, start_datetime, end_datetime FROM meetings")?;

        let mut counts = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        for row in rows {
            let (status, start, end) = row.context("Failed to read meeting status")?;
            *counts
                .entry(resolve_status_parts(&status, &start, &end, now))
                .or_insert(0) += 1;
        }

        Ok(counts)
    }
}
