// End-to-end reschedule flow: status, drag, confirm, commit and month layout
mod fixtures;

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use chrono_tz::Tz;
use crm_calendar::models::meeting::Meeting;
use crm_calendar::models::settings::Settings;
use crm_calendar::models::ui::ViewMode;
use crm_calendar::scheduling::{
    resolve_status, CalendarView, CalendarViewComposer, CommitError, DropOutcome, DropRejection,
    HoverCell, MeetingStatus, RescheduleCommitter,
};
use crm_calendar::services::database::Database;
use crm_calendar::services::meeting::{IntervalUpdate, MeetingService, MeetingStore, SqliteMeetingStore};
use crm_calendar::services::provider::{MeetingProviderSync, ProviderEventUpdate};
use fixtures::{date, jan_15, linked_demo, meeting_at, pipeline_review};
use pretty_assertions::assert_eq;

type CallLog = Arc<Mutex<Vec<String>>>;

/// Provider double that records each call in a shared log
struct RecordingProvider {
    log: CallLog,
    fail: bool,
}

#[async_trait]
impl MeetingProviderSync for RecordingProvider {
    async fn update_event(&self, update: ProviderEventUpdate) -> Result<()> {
        self.log.lock().unwrap().push(format!(
            "provider {} {} {} {}",
            update.meeting_id, update.start_time, update.end_time, update.timezone
        ));
        if self.fail {
            Err(anyhow!("provider returned 502"))
        } else {
            Ok(())
        }
    }
}

/// Store double that records each call in the same log
struct RecordingStore {
    log: CallLog,
}

#[async_trait]
impl MeetingStore for RecordingStore {
    async fn update_interval(&self, update: IntervalUpdate) -> Result<()> {
        self.log.lock().unwrap().push(format!(
            "store {} {}",
            update.meeting_id,
            update.start.to_rfc3339()
        ));
        Ok(())
    }
}

fn composer(view: ViewMode) -> CalendarViewComposer {
    let settings = Settings {
        current_view: view,
        ..Settings::default()
    };
    CalendarViewComposer::new(date(1, 15), &settings)
}

fn recording_committer(fail_provider: bool) -> (RescheduleCommitter, CallLog) {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let committer = RescheduleCommitter::new(
        Arc::new(RecordingProvider {
            log: Arc::clone(&log),
            fail: fail_provider,
        }),
        Arc::new(RecordingStore {
            log: Arc::clone(&log),
        }),
        Tz::UTC,
    );
    (committer, log)
}

#[test]
fn test_scenario_a_meeting_in_progress_is_ongoing() {
    assert_eq!(
        resolve_status(&pipeline_review(), jan_15(9, 30)),
        MeetingStatus::Ongoing
    );
}

#[test]
fn test_scenario_b_meeting_past_its_end_is_completed() {
    assert_eq!(
        resolve_status(&pipeline_review(), jan_15(11, 0)),
        MeetingStatus::Completed
    );
}

#[tokio::test]
async fn test_scenario_c_week_drop_confirms_and_syncs_before_store() {
    let mut composer = composer(ViewMode::Week);
    let meeting = linked_demo();
    let now = jan_15(8, 0);

    assert!(composer.start_drag(Some(&meeting)));
    let outcome = composer.drop_on(HoverCell::slot(date(1, 17), 14), now, &Utc);

    let DropOutcome::Pending(pending) = outcome else {
        panic!("expected a pending reschedule, got {:?}", outcome);
    };
    assert_eq!(pending.new_start, jan_15(14, 0) + Duration::days(2));
    assert_eq!(pending.new_end, jan_15(15, 0) + Duration::days(2));

    let prompt = composer.confirm_prompt(&Utc).expect("dialog is shown");
    assert_eq!(prompt.subject, "Product demo");
    assert_eq!(prompt.date_label, "Wednesday, January 17, 2024");
    assert_eq!(prompt.time_label, "14:00 - 15:00");

    let (committer, log) = recording_committer(false);
    let pending = composer.begin_commit().expect("commit starts");
    assert!(composer.confirm_prompt(&Utc).is_some_and(|p| p.busy));

    let result = committer.commit(&pending).await;

    let mut notified = 0;
    composer.finish_commit(&result, |_| notified += 1);

    assert_eq!(notified, 1);
    assert!(composer.confirm_prompt(&Utc).is_none());
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "provider meeting-demo 2024-01-17T14:00:00 2024-01-17T15:00:00 UTC".to_string(),
            "store meeting-demo 2024-01-17T14:00:00+00:00".to_string(),
        ]
    );
}

#[test]
fn test_scenario_d_completed_meeting_drop_is_rejected() {
    let mut composer = composer(ViewMode::Week);
    let meeting = pipeline_review();

    composer.start_drag(Some(&meeting));
    let outcome = composer.drop_on(HoverCell::slot(date(1, 18), 10), jan_15(11, 0), &Utc);

    assert_eq!(
        outcome,
        DropOutcome::Rejected(DropRejection::Completed {
            subject: "Pipeline review".to_string()
        })
    );
    assert!(composer.confirm_prompt(&Utc).is_none());
    assert!(composer.begin_commit().is_none());
}

#[test]
fn test_scenario_e_drop_into_past_is_rejected() {
    let mut composer = composer(ViewMode::Week);
    let meeting = pipeline_review();

    composer.start_drag(Some(&meeting));
    let outcome = composer.drop_on(HoverCell::slot(date(1, 15), 8), jan_15(8, 30), &Utc);

    let DropOutcome::Rejected(reason) = outcome else {
        panic!("expected a rejection, got {:?}", outcome);
    };
    assert_eq!(reason, DropRejection::InPast);
    assert!(reason.to_string().contains("past"));
    assert!(composer.confirm_prompt(&Utc).is_none());
}

#[test]
fn test_scenario_f_month_cell_shows_three_chips_and_overflow() {
    let composer = composer(ViewMode::Month);
    let day = jan_15(0, 0) + Duration::days(1);
    let meetings: Vec<Meeting> = (0..5)
        .map(|i| meeting_at(&format!("m{}", i), day + Duration::hours(9 + i), 30))
        .collect();

    let CalendarView::Month(month) = composer.compose(&meetings, jan_15(8, 0), &Utc) else {
        panic!("month view expected");
    };
    let cell = month
        .weeks
        .iter()
        .flatten()
        .find(|cell| cell.date == date(1, 16))
        .expect("Jan 16 is visible");

    assert_eq!(cell.chips.len(), 3);
    assert_eq!(cell.hidden, 2);
    assert_eq!(cell.overflow.as_deref(), Some("+2 more"));
    let shown: Vec<&str> = cell.chips.iter().map(|c| c.meeting.id.as_str()).collect();
    assert_eq!(shown, vec!["m0", "m1", "m2"]);
}

#[tokio::test]
async fn test_provider_failure_keeps_meeting_and_pending_move() {
    let mut composer = composer(ViewMode::Week);
    let meeting = linked_demo();

    composer.start_drag(Some(&meeting));
    composer.drop_on(HoverCell::slot(date(1, 17), 14), jan_15(8, 0), &Utc);

    let (committer, log) = recording_committer(true);
    let pending = composer.begin_commit().unwrap();
    let result = committer.commit(&pending).await;

    let mut notified = false;
    composer.finish_commit(&result, |_| notified = true);

    assert!(matches!(result, Err(CommitError::ProviderSync(_))));
    assert!(!notified);
    assert_eq!(log.lock().unwrap().len(), 1, "store must not be written");
    assert!(composer.confirm_prompt(&Utc).is_some_and(|p| !p.busy));
}

#[tokio::test]
async fn test_month_drop_commits_to_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(
        Database::new(dir.path().join("flow.db").to_str().unwrap()).expect("open database"),
    );
    db.initialize_schema().unwrap();
    let meeting = {
        let conn = db.connection();
        MeetingService::new(&conn).create(pipeline_review()).unwrap()
    };

    let mut composer = composer(ViewMode::Month);
    composer.start_drag(Some(&meeting));
    composer.drop_on(HoverCell::day(date(1, 22)), jan_15(8, 0), &Utc);

    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let committer = RescheduleCommitter::new(
        Arc::new(RecordingProvider {
            log: Arc::clone(&log),
            fail: false,
        }),
        Arc::new(SqliteMeetingStore::new(Arc::clone(&db))),
        Tz::UTC,
    );
    let pending = composer.begin_commit().unwrap();
    let receipt = committer.commit(&pending).await.expect("commit succeeds");

    // No join link, so the provider is never involved
    assert!(!receipt.synced);
    assert!(log.lock().unwrap().is_empty());

    let conn = db.connection();
    let stored = MeetingService::new(&conn).get(&meeting.id).unwrap().unwrap();
    assert_eq!(stored.start, jan_15(9, 0) + Duration::days(7));
    assert_eq!(stored.end, jan_15(10, 0) + Duration::days(7));
}
