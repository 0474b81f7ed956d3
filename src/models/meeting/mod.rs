// Meeting module
// Scheduled CRM meeting record

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Persisted status of a meeting.
///
/// Only an explicit cancellation is ever stored. Whether a meeting is ongoing or
/// completed is derived from its interval at read time (see
/// [`crate::scheduling::status`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoredStatus {
    #[default]
    Scheduled,
    Cancelled,
}

impl StoredStatus {
    pub const CANCELLED_LITERAL: &'static str = "cancelled";

    /// Parse the stored literal. Anything other than `"cancelled"` is treated as the
    /// scheduled default, including legacy temporal values like `"completed"`.
    pub fn from_db(value: &str) -> Self {
        if value.trim() == Self::CANCELLED_LITERAL {
            StoredStatus::Cancelled
        } else {
            StoredStatus::Scheduled
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoredStatus::Scheduled => "scheduled",
            StoredStatus::Cancelled => Self::CANCELLED_LITERAL,
        }
    }
}

/// Outcome tag recorded after a meeting took place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingOutcome {
    Successful,
    FollowUpNeeded,
    NoShow,
    Rescheduled,
}

impl MeetingOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingOutcome::Successful => "successful",
            MeetingOutcome::FollowUpNeeded => "follow_up_needed",
            MeetingOutcome::NoShow => "no_show",
            MeetingOutcome::Rescheduled => "rescheduled",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "successful" => Some(MeetingOutcome::Successful),
            "follow_up_needed" => Some(MeetingOutcome::FollowUpNeeded),
            "no_show" => Some(MeetingOutcome::NoShow),
            "rescheduled" => Some(MeetingOutcome::Rescheduled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Attendee {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn named(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }

    /// Name when present, otherwise the email address.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// A scheduled meeting with optional links to a lead or contact record.
#[derive(Debug, Clone, PartialEq)]
pub struct Meeting {
    pub id: String,
    pub subject: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub join_link: Option<String>,
    pub attendees: Vec<Attendee>,
    pub lead_id: Option<String>,
    pub contact_id: Option<String>,
    pub status: StoredStatus,
    pub outcome: Option<MeetingOutcome>,
    pub organizer: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Meeting {
    /// Create a new meeting with required fields. The id is left empty and is
    /// assigned by the store on insert.
    ///
    /// # Examples
    /// ```
    /// use crm_calendar::models::meeting::Meeting;
    /// use chrono::{Duration, Utc};
    ///
    /// let start = Utc::now();
    /// let meeting = Meeting::new("Discovery call", start, start + Duration::minutes(30)).unwrap();
    /// assert_eq!(meeting.duration(), Duration::minutes(30));
    /// ```
    pub fn new(
        subject: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, String> {
        let meeting = Self {
            id: String::new(),
            subject: subject.into(),
            description: None,
            start,
            end,
            join_link: None,
            attendees: Vec::new(),
            lead_id: None,
            contact_id: None,
            status: StoredStatus::Scheduled,
            outcome: None,
            organizer: None,
            created_at: None,
            updated_at: None,
        };

        meeting.validate()?;
        Ok(meeting)
    }

    pub fn builder() -> MeetingBuilder {
        MeetingBuilder::default()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.subject.trim().is_empty() {
            return Err("Meeting subject cannot be empty".to_string());
        }

        if self.end <= self.start {
            return Err("Meeting end time must be after start time".to_string());
        }

        if let Some(attendee) = self.attendees.iter().find(|a| !a.email.contains('@')) {
            return Err(format!("Invalid attendee email: {}", attendee.email));
        }

        Ok(())
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == StoredStatus::Cancelled
    }

    /// Join link with surrounding whitespace removed; blank links count as absent.
    pub fn join_link(&self) -> Option<&str> {
        self.join_link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }
}

/// Builder for creating meetings with optional fields
#[derive(Default)]
pub struct MeetingBuilder {
    id: Option<String>,
    subject: Option<String>,
    description: Option<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    join_link: Option<String>,
    attendees: Vec<Attendee>,
    lead_id: Option<String>,
    contact_id: Option<String>,
    status: StoredStatus,
    outcome: Option<MeetingOutcome>,
    organizer: Option<String>,
}

impl MeetingBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn join_link(mut self, link: impl Into<String>) -> Self {
        self.join_link = Some(link.into());
        self
    }

    pub fn attendee(mut self, attendee: Attendee) -> Self {
        self.attendees.push(attendee);
        self
    }

    pub fn lead_id(mut self, lead_id: impl Into<String>) -> Self {
        self.lead_id = Some(lead_id.into());
        self
    }

    pub fn contact_id(mut self, contact_id: impl Into<String>) -> Self {
        self.contact_id = Some(contact_id.into());
        self
    }

    pub fn status(mut self, status: StoredStatus) -> Self {
        self.status = status;
        self
    }

    pub fn outcome(mut self, outcome: MeetingOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn organizer(mut self, organizer: impl Into<String>) -> Self {
        self.organizer = Some(organizer.into());
        self
    }

    pub fn build(self) -> Result<Meeting, String> {
        let subject = self.subject.ok_or("Meeting subject is required")?;
        let start = self.start.ok_or("Meeting start time is required")?;
        let end = self.end.ok_or("Meeting end time is required")?;

        let meeting = Meeting {
            id: self.id.unwrap_or_default(),
            subject,
            description: self.description,
            start,
            end,
            join_link: self.join_link,
            attendees: self.attendees,
            lead_id: self.lead_id,
            contact_id: self.contact_id,
            status: self.status,
            outcome: self.outcome,
            organizer: self.organizer,
            created_at: None,
            updated_at: None,
        };

        meeting.validate()?;
        Ok(meeting)
    }
}
