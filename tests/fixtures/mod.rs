// Test fixtures - reusable test data
// Provides consistent meetings and instants across the integration tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use crm_calendar::models::meeting::{Attendee, Meeting, StoredStatus};

/// Monday, Jan 15 2024 at `hour:minute` UTC
pub fn jan_15(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, hour, minute, 0).unwrap()
}

pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

/// Pipeline review, Jan 15 09:00-10:00 UTC, no join link
pub fn pipeline_review() -> Meeting {
    Meeting::builder()
        .id("meeting-pipeline")
        .subject("Pipeline review")
        .start(jan_15(9, 0))
        .end(jan_15(10, 0))
        .attendee(Attendee::named("dana@example.com", "Dana"))
        .build()
        .unwrap()
}

/// Same slot as `pipeline_review`, but mirrored by a provider event
pub fn linked_demo() -> Meeting {
    Meeting::builder()
        .id("meeting-demo")
        .subject("Product demo")
        .start(jan_15(9, 0))
        .end(jan_15(10, 0))
        .join_link("https://meet.example.com/demo")
        .lead_id("lead-42")
        .build()
        .unwrap()
}

pub fn cancelled_call() -> Meeting {
    Meeting::builder()
        .id("meeting-cancelled")
        .subject("Intro call")
        .start(jan_15(13, 0))
        .end(jan_15(13, 30))
        .status(StoredStatus::Cancelled)
        .build()
        .unwrap()
}

/// Meeting of `minutes` starting at `start`, with a generated subject
pub fn meeting_at(id: &str, start: DateTime<Utc>, minutes: i64) -> Meeting {
    Meeting::builder()
        .id(id)
        .subject(format!("Meeting {}", id))
        .start(start)
        .end(start + Duration::minutes(minutes))
        .build()
        .unwrap()
}
