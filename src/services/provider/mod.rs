//! External meeting provider (video/calendar) synchronization.
//!
//! Meetings with a join link are mirrored by an event at the provider. When such a
//! meeting is moved, the provider event is moved first; the local record is only
//! written once the provider accepted the change.

mod http;

pub use http::HttpMeetingProvider;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

const PROVIDER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Payload sent to the provider when a meeting moves.
///
/// Times are wall-clock strings in `timezone`, the format video providers expect
/// alongside an IANA zone name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderEventUpdate {
    #[serde(skip)]
    pub meeting_id: String,
    pub join_url: String,
    pub start_time: String,
    pub end_time: String,
    pub timezone: String,
}

impl ProviderEventUpdate {
    pub fn new(
        meeting_id: impl Into<String>,
        join_url: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timezone: Tz,
    ) -> Self {
        Self {
            meeting_id: meeting_id.into(),
            join_url: join_url.into(),
            start_time: start
                .with_timezone(&timezone)
                .format(PROVIDER_TIME_FORMAT)
                .to_string(),
            end_time: end
                .with_timezone(&timezone)
                .format(PROVIDER_TIME_FORMAT)
                .to_string(),
            timezone: timezone.name().to_string(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeetingProviderSync: Send + Sync {
    /// Move the provider event linked to a meeting. Calling it twice with the same
    /// update leaves the provider in the same state.
    async fn update_event(&self, update: ProviderEventUpdate) -> Result<()>;
}

/// Stand-in used when no provider endpoint is configured. Every update fails so a
/// linked meeting is never moved locally while its provider event stays put.
#[derive(Debug, Default)]
pub struct UnconfiguredProvider;

#[async_trait]
impl MeetingProviderSync for UnconfiguredProvider {
    async fn update_event(&self, update: ProviderEventUpdate) -> Result<()> {
        log::warn!(
            "Provider sync requested for meeting {} but no provider endpoint is configured",
            update.meeting_id
        );
        Err(anyhow!(
            "No meeting provider is configured; set [provider].endpoint in config.toml"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_update_renders_wall_clock_in_reference_zone() {
        let start = Utc.with_ymd_and_hms(2024, 7, 1, 14, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 7, 1, 15, 0, 0).unwrap();

        let update = ProviderEventUpdate::new(
            "m-1",
            "https://meet.example.com/x",
            start,
            end,
            chrono_tz::America::New_York,
        );

        assert_eq!(update.start_time, "2024-07-01T10:00:00");
        assert_eq!(update.end_time, "2024-07-01T11:00:00");
        assert_eq!(update.timezone, "America/New_York");
    }

    #[test]
    fn test_update_body_omits_meeting_id() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let update = ProviderEventUpdate::new(
            "m-1",
            "https://meet.example.com/x",
            start,
            start + chrono::Duration::hours(1),
            Tz::UTC,
        );

        let body = serde_json::to_value(&update).unwrap();
        assert!(body.get("meeting_id").is_none());
        assert_eq!(body["start_time"], "2024-01-15T09:00:00");
        assert_eq!(body["timezone"], "UTC");
    }

    #[tokio::test]
    async fn test_unconfigured_provider_always_fails() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let update = ProviderEventUpdate::new(
            "m-1",
            "https://meet.example.com/x",
            start,
            start + chrono::Duration::hours(1),
            Tz::UTC,
        );

        let err = UnconfiguredProvider.update_event(update).await.unwrap_err();
        assert!(err.to_string().contains("No meeting provider is configured"));
    }
}
