//! Runs confirmed reschedules off the UI thread and folds the result back in.

use super::CalendarApp;
use std::sync::Arc;
use tokio::sync::oneshot::{self, error::TryRecvError};

impl CalendarApp {
    /// Hand the pending reschedule to the runtime. No-op if nothing is pending
    /// or a commit is already running.
    pub(super) fn start_commit(&mut self) {
        let Some(pending) = self.composer.begin_commit() else {
            return;
        };

        log::info!(
            "Committing reschedule of meeting {} to {}",
            pending.meeting.id,
            pending.new_start
        );

        let committer = Arc::clone(&self.services.committer);
        let (tx, rx) = oneshot::channel();
        self.services.runtime.spawn(async move {
            let result = committer.commit(&pending).await;
            // The receiver is only gone when the app is shutting down
            let _ = tx.send(result);
        });
        self.commit_rx = Some(rx);
    }

    pub(super) fn poll_commit(&mut self) {
        let Some(rx) = self.commit_rx.as_mut() else {
            return;
        };

        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => {
                log::error!("Reschedule task ended without reporting a result");
                self.commit_rx = None;
                self.composer.abort_commit();
                self.toast_manager
                    .error("Reschedule failed: the save was interrupted. Please try again.");
                return;
            }
        };
        self.commit_rx = None;

        let mut meeting_updated = false;
        self.composer.finish_commit(&result, |receipt| {
            log::info!("Meeting {} now starts at {}", receipt.meeting_id, receipt.start);
            meeting_updated = true;
        });

        match result {
            Ok(receipt) => {
                self.toast_manager.success(if receipt.synced {
                    "Meeting rescheduled and video meeting updated"
                } else {
                    "Meeting rescheduled"
                });
            }
            Err(err) => {
                log::error!("Reschedule failed: {:#}", err);
                self.toast_manager.error(err.user_message());
            }
        }

        if meeting_updated {
            self.refresh_meetings(true);
        }
    }
}
