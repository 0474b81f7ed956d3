use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::MeetingService;
use crate::services::database::Database;

/// New interval for a single meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalUpdate {
    pub meeting_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Persistence port used by the reschedule committer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeetingStore: Send + Sync {
    /// Write the new start/end of a meeting. No other field changes.
    async fn update_interval(&self, update: IntervalUpdate) -> Result<()>;
}

/// `MeetingStore` backed by the application SQLite database. Queries run on the
/// blocking thread pool.
#[derive(Clone)]
pub struct SqliteMeetingStore {
    db: Arc<Database>,
}

impl SqliteMeetingStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MeetingStore for SqliteMeetingStore {
    async fn update_interval(&self, update: IntervalUpdate) -> Result<()> {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let conn = db.connection();
            MeetingService::new(&conn).update_interval(
                &update.meeting_id,
                update.start,
                update.end,
            )
        })
        .await
        .context("Meeting update task failed")?
    }
}
