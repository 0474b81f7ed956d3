//! Two-phase write for a confirmed reschedule: provider event first, then the
//! local record.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use super::drag::PendingReschedule;
use crate::services::meeting::{IntervalUpdate, MeetingStore};
use crate::services::provider::{MeetingProviderSync, ProviderEventUpdate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    pub meeting_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Whether a provider event was moved as part of the commit.
    pub synced: bool,
}

#[derive(Debug, Error)]
pub enum CommitError {
    /// The provider refused or could not be reached. Nothing was written.
    #[error("Could not update the provider event: {0:#}")]
    ProviderSync(anyhow::Error),
    /// The local write failed. When `synced` is true the provider event already
    /// carries the new time and the two are out of step.
    #[error("Could not save the new meeting time: {error:#}")]
    Persistence { synced: bool, error: anyhow::Error },
}

impl CommitError {
    /// Message for the notice shown to the user. Never claims success.
    pub fn user_message(&self) -> String {
        match self {
            CommitError::ProviderSync(_) => {
                "Reschedule failed: the video meeting could not be updated. The meeting was not moved."
                    .to_string()
            }
            CommitError::Persistence { synced: true, .. } => {
                "Reschedule failed: the video meeting was moved but the new time could not be saved. \
                 Retry or move the video meeting back."
                    .to_string()
            }
            CommitError::Persistence { synced: false, .. } => {
                "Reschedule failed: the new time could not be saved.".to_string()
            }
        }
    }

    /// True when an external write succeeded but the local one did not.
    pub fn is_partial(&self) -> bool {
        matches!(self, CommitError::Persistence { synced: true, .. })
    }
}

pub struct RescheduleCommitter {
    provider: Arc<dyn MeetingProviderSync>,
    store: Arc<dyn MeetingStore>,
    reference_tz: Tz,
}

impl RescheduleCommitter {
    pub fn new(
        provider: Arc<dyn MeetingProviderSync>,
        store: Arc<dyn MeetingStore>,
        reference_tz: Tz,
    ) -> Self {
        Self {
            provider,
            store,
            reference_tz,
        }
    }

    /// Apply a confirmed reschedule. The store is only written after the provider
    /// accepted the move (or when the meeting has no join link).
    pub async fn commit(&self, pending: &PendingReschedule) -> Result<CommitReceipt, CommitError> {
        let meeting = &pending.meeting;

        let synced = match meeting.join_link() {
            Some(link) => {
                let update = ProviderEventUpdate::new(
                    meeting.id.clone(),
                    link,
                    pending.new_start,
                    pending.new_end,
                    self.reference_tz,
                );
                if let Err(err) = self.provider.update_event(update).await {
                    log::error!("Provider sync failed for meeting {}: {:#}", meeting.id, err);
                    return Err(CommitError::ProviderSync(err));
                }
                true
            }
            None => false,
        };

        let update = IntervalUpdate {
            meeting_id: meeting.id.clone(),
            start: pending.new_start,
            end: pending.new_end,
        };
        if let Err(err) = self.store.update_interval(update).await {
            log::error!(
                "Persisting new time for meeting {} failed (provider synced: {}): {:#}",
                meeting.id,
                synced,
                err
            );
            return Err(CommitError::Persistence { synced, error: err });
        }

        log::info!(
            "Rescheduled meeting {} to {} - {}",
            meeting.id,
            pending.new_start,
            pending.new_end
        );

        Ok(CommitReceipt {
            meeting_id: meeting.id.clone(),
            start: pending.new_start,
            end: pending.new_end,
            synced,
        })
    }
}
