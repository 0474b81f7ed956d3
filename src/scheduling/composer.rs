//! Calendar view composition.
//!
//! [`CalendarViewComposer`] owns the navigation state (current date and view mode),
//! the reschedule controller and the commit-in-flight flag. `compose` turns a
//! meeting list into a presentational model that the egui layer draws without
//! doing any date math of its own.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use std::fmt::Display;

use super::commit::{CommitError, CommitReceipt};
use super::drag::{DropOutcome, HoverCell, PendingReschedule, RescheduleController};
use super::status::{resolve_status, MeetingStatus};
use super::time_grid::{
    assign_lanes, bucket_by_day, cap_entries, now_offset, overflow_label, place, GridPlacement,
    Lane, WorkingHours,
};
use crate::models::meeting::Meeting;
use crate::models::settings::Settings;
use crate::models::ui::ViewMode;
use crate::utils::date::{days_between, month_grid_span, shift_month_preserving_day, week_start};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitState {
    #[default]
    Idle,
    Committing,
}

/// A meeting chip in a day/week column.
#[derive(Debug, Clone, PartialEq)]
pub struct GridChip {
    pub meeting: Meeting,
    pub status: MeetingStatus,
    pub placement: GridPlacement,
    pub lane: Lane,
    pub time_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub is_today: bool,
    pub chips: Vec<GridChip>,
}

/// Position of the live "current time" line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NowLine {
    pub date: NaiveDate,
    /// Minutes below the top of the working-hours window.
    pub offset: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeGridView {
    pub hours: WorkingHours,
    pub columns: Vec<DayColumn>,
    pub now_line: Option<NowLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthChip {
    pub meeting: Meeting,
    pub status: MeetingStatus,
    pub time_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthCell {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub is_today: bool,
    pub chips: Vec<MonthChip>,
    pub hidden: usize,
    /// `"+N more"` when some meetings did not fit.
    pub overflow: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthView {
    pub weeks: Vec<Vec<MonthCell>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CalendarView {
    TimeGrid(TimeGridView),
    Month(MonthView),
}

/// Contents of the reschedule confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub subject: String,
    pub date_label: String,
    pub time_label: String,
    /// Buttons are disabled while the commit runs.
    pub busy: bool,
}

pub struct CalendarViewComposer {
    current_date: NaiveDate,
    view_mode: ViewMode,
    hours: WorkingHours,
    month_cell_limit: usize,
    controller: RescheduleController,
    commit_state: CommitState,
}

impl CalendarViewComposer {
    pub fn new(current_date: NaiveDate, settings: &Settings) -> Self {
        let mut composer = Self {
            current_date,
            view_mode: settings.current_view,
            hours: WorkingHours::default(),
            month_cell_limit: settings.month_cell_limit.max(1),
            controller: RescheduleController::new(),
            commit_state: CommitState::Idle,
        };
        composer.apply_settings(settings);
        composer
    }

    /// Pick up changed working hours or month cell limit.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.hours = WorkingHours::new(settings.day_start_hour, settings.day_end_hour)
            .unwrap_or_else(|err| {
                log::warn!("{}; falling back to default working hours", err);
                WorkingHours::default()
            });
        self.month_cell_limit = settings.month_cell_limit.max(1);
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn working_hours(&self) -> WorkingHours {
        self.hours
    }

    pub fn controller(&self) -> &RescheduleController {
        &self.controller
    }

    pub fn commit_state(&self) -> CommitState {
        self.commit_state
    }

    pub fn is_committing(&self) -> bool {
        self.commit_state == CommitState::Committing
    }

    // Navigation

    pub fn set_view(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.current_date = date;
    }

    pub fn previous(&mut self) {
        self.current_date = self.shifted(-1);
    }

    pub fn next(&mut self) {
        self.current_date = self.shifted(1);
    }

    pub fn today(&mut self, today: NaiveDate) {
        self.current_date = today;
    }

    fn shifted(&self, step: i32) -> NaiveDate {
        match self.view_mode {
            ViewMode::Day => self.current_date + Duration::days(i64::from(step)),
            ViewMode::Week => self.current_date + Duration::weeks(i64::from(step)),
            ViewMode::Month => shift_month_preserving_day(self.current_date, step),
        }
    }

    /// Inclusive first and last visible dates for the active view.
    pub fn visible_range(&self) -> (NaiveDate, NaiveDate) {
        match self.view_mode {
            ViewMode::Day => (self.current_date, self.current_date),
            ViewMode::Week => {
                let start = week_start(self.current_date);
                (start, start + Duration::days(6))
            }
            ViewMode::Month => month_grid_span(self.current_date),
        }
    }

    pub fn visible_days(&self) -> Vec<NaiveDate> {
        let (first, last) = self.visible_range();
        days_between(first, last).collect()
    }

    /// UTC bounds `[start, end)` covering the visible range in `tz`, for fetching.
    pub fn query_bounds<Tz: TimeZone>(&self, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
        let (first, last) = self.visible_range();
        (
            local_midnight(first, tz),
            local_midnight(last + Duration::days(1), tz),
        )
    }

    /// Headline for the navigation bar.
    pub fn title(&self) -> String {
        let (first, last) = self.visible_range();
        match self.view_mode {
            ViewMode::Day => self.current_date.format("%A, %B %-d, %Y").to_string(),
            ViewMode::Week => format!("{} - {}", first.format("%b %-d"), last.format("%b %-d, %Y")),
            ViewMode::Month => self.current_date.format("%B %Y").to_string(),
        }
    }

    // Composition

    pub fn compose<Tz: TimeZone>(&self, meetings: &[Meeting], now: DateTime<Utc>, tz: &Tz) -> CalendarView
    where
        Tz::Offset: Display,
    {
        if self.view_mode.is_time_grid() {
            CalendarView::TimeGrid(self.compose_time_grid(meetings, now, tz))
        } else {
            CalendarView::Month(self.compose_month(meetings, now, tz))
        }
    }

    fn compose_time_grid<Tz: TimeZone>(
        &self,
        meetings: &[Meeting],
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> TimeGridView
    where
        Tz::Offset: Display,
    {
        let local_now = now.with_timezone(tz).naive_local();
        let today = local_now.date();
        let days = self.visible_days();
        let (first, last) = self.visible_range();

        let mut by_day = bucket_by_day(
            meetings
                .iter()
                .filter(|m| (first..=last).contains(&local_day(m.start, tz))),
            |m| local_day(m.start, tz),
        );

        let columns = days
            .into_iter()
            .map(|date| {
                let placed: Vec<(&Meeting, GridPlacement)> = by_day
                    .remove(&date)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|m| {
                        let start = m.start.with_timezone(tz).naive_local();
                        let end = m.end.with_timezone(tz).naive_local();
                        place(start, end, self.hours).map(|placement| (m, placement))
                    })
                    .collect();

                let intervals: Vec<_> = placed
                    .iter()
                    .map(|(m, _)| {
                        (
                            m.start.with_timezone(tz).naive_local(),
                            m.end.with_timezone(tz).naive_local(),
                        )
                    })
                    .collect();
                let lanes = assign_lanes(&intervals);

                let chips = placed
                    .into_iter()
                    .zip(lanes)
                    .map(|((meeting, placement), lane)| GridChip {
                        status: resolve_status(meeting, now),
                        time_label: time_range_label(meeting, tz),
                        meeting: meeting.clone(),
                        placement,
                        lane,
                    })
                    .collect();

                DayColumn {
                    date,
                    is_today: date == today,
                    chips,
                }
            })
            .collect::<Vec<_>>();

        let now_line = columns
            .iter()
            .any(|column| column.is_today)
            .then(|| now_offset(local_now.time(), self.hours))
            .flatten()
            .map(|offset| NowLine {
                date: today,
                offset,
            });

        TimeGridView {
            hours: self.hours,
            columns,
            now_line,
        }
    }

    fn compose_month<Tz: TimeZone>(&self, meetings: &[Meeting], now: DateTime<Utc>, tz: &Tz) -> MonthView
    where
        Tz::Offset: Display,
    {
        let today = now.with_timezone(tz).date_naive();
        let month = (self.current_date.year(), self.current_date.month());

        let mut sorted: Vec<&Meeting> = meetings.iter().collect();
        sorted.sort_by_key(|m| m.start);
        let mut by_day = bucket_by_day(sorted, |m| local_day(m.start, tz));

        let cells: Vec<MonthCell> = self
            .visible_days()
            .into_iter()
            .map(|date| {
                let (visible, hidden) =
                    cap_entries(by_day.remove(&date).unwrap_or_default(), self.month_cell_limit);
                MonthCell {
                    date,
                    in_current_month: (date.year(), date.month()) == month,
                    is_today: date == today,
                    chips: visible
                        .into_iter()
                        .map(|meeting| MonthChip {
                            status: resolve_status(meeting, now),
                            time_label: meeting
                                .start
                                .with_timezone(tz)
                                .format("%H:%M")
                                .to_string(),
                            meeting: meeting.clone(),
                        })
                        .collect(),
                    hidden,
                    overflow: overflow_label(hidden),
                }
            })
            .collect();

        MonthView {
            weeks: cells.chunks(7).map(<[MonthCell]>::to_vec).collect(),
        }
    }

    // Reschedule flow

    /// Start dragging a meeting in the active view. Refused while a reschedule is
    /// pending or being committed.
    pub fn start_drag(&mut self, meeting: Option<&Meeting>) -> bool {
        if self.is_committing() {
            return false;
        }
        self.controller.start_drag(meeting, self.view_mode)
    }

    pub fn hover(&mut self, cell: HoverCell) {
        self.controller.hover(cell);
    }

    pub fn drop_on<Tz: TimeZone>(&mut self, cell: HoverCell, now: DateTime<Utc>, tz: &Tz) -> DropOutcome {
        self.controller.drop_on(cell, now, tz)
    }

    pub fn cancel_drag(&mut self) {
        self.controller.cancel_drag();
    }

    pub fn confirm_prompt<Tz: TimeZone>(&self, tz: &Tz) -> Option<ConfirmPrompt>
    where
        Tz::Offset: Display,
    {
        self.controller.pending().map(|pending| {
            let (date_label, time_label) = pending.target_labels(tz);
            ConfirmPrompt {
                subject: pending.meeting.subject.clone(),
                date_label,
                time_label,
                busy: self.is_committing(),
            }
        })
    }

    /// Mark the pending reschedule as committing and hand it to the caller.
    /// Returns `None` when nothing is pending or a commit is already running.
    pub fn begin_commit(&mut self) -> Option<PendingReschedule> {
        if self.is_committing() {
            return None;
        }
        let pending = self.controller.pending()?.clone();
        self.commit_state = CommitState::Committing;
        Some(pending)
    }

    /// Record the commit result. On success the pending reschedule is cleared and
    /// `on_meeting_updated` runs exactly once; on failure it is kept for a retry.
    pub fn finish_commit<F>(&mut self, result: &Result<CommitReceipt, CommitError>, on_meeting_updated: F)
    where
        F: FnOnce(&CommitReceipt),
    {
        if !self.is_committing() {
            log::warn!("Ignoring commit result with no commit in flight");
            return;
        }
        self.commit_state = CommitState::Idle;

        if let Ok(receipt) = result {
            self.controller.complete_pending();
            on_meeting_updated(receipt);
        }
    }

    /// The commit task went away without reporting. Leave the pending
    /// reschedule in place so the user can retry or cancel.
    pub fn abort_commit(&mut self) {
        if self.is_committing() {
            log::warn!("Commit ended without a result; keeping reschedule for retry");
            self.commit_state = CommitState::Idle;
        }
    }

    /// Discard the pending reschedule. Ignored while the commit runs.
    pub fn cancel_pending(&mut self) -> Option<PendingReschedule> {
        if self.is_committing() {
            return None;
        }
        self.controller.cancel_pending()
    }
}

fn local_day<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    // Zones that skip midnight for DST start the day at 01:00.
    [0, 1]
        .into_iter()
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .find_map(|time| tz.from_local_datetime(&date.and_time(time)).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

fn time_range_label<Tz: TimeZone>(meeting: &Meeting, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    format!(
        "{} - {}",
        meeting.start.with_timezone(tz).format("%H:%M"),
        meeting.end.with_timezone(tz).format("%H:%M")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::meeting::StoredStatus;
    use crate::scheduling::drag::DropRejection;
    use anyhow::anyhow;
    use chrono::FixedOffset;
    use pretty_assertions::assert_eq;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn utc(month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, hour, minute, 0).unwrap()
    }

    fn meeting(id: &str, start: DateTime<Utc>, minutes: i64) -> Meeting {
        Meeting::builder()
            .id(id)
            .subject(format!("Meeting {}", id))
            .start(start)
            .end(start + Duration::minutes(minutes))
            .build()
            .unwrap()
    }

    fn composer(view: ViewMode, current: NaiveDate) -> CalendarViewComposer {
        let settings = Settings {
            current_view: view,
            ..Settings::default()
        };
        CalendarViewComposer::new(current, &settings)
    }

    fn receipt(pending: &PendingReschedule) -> CommitReceipt {
        CommitReceipt {
            meeting_id: pending.meeting.id.clone(),
            start: pending.new_start,
            end: pending.new_end,
            synced: false,
        }
    }

    #[test]
    fn test_visible_range_per_view() {
        let mut composer = composer(ViewMode::Week, date(1, 17));
        assert_eq!(composer.visible_range(), (date(1, 15), date(1, 21)));

        composer.set_view(ViewMode::Day);
        assert_eq!(composer.visible_range(), (date(1, 17), date(1, 17)));

        composer.set_view(ViewMode::Month);
        assert_eq!(composer.visible_range(), (date(1, 1), date(2, 4)));
        assert_eq!(composer.visible_days().len(), 35);
    }

    #[test]
    fn test_navigation_steps_by_view_unit() {
        let mut composer = composer(ViewMode::Week, date(1, 17));
        composer.next();
        assert_eq!(composer.current_date(), date(1, 24));
        composer.previous();
        composer.previous();
        assert_eq!(composer.current_date(), date(1, 10));

        composer.set_view(ViewMode::Day);
        composer.next();
        assert_eq!(composer.current_date(), date(1, 11));

        composer.set_view(ViewMode::Month);
        composer.go_to(date(1, 31));
        composer.next();
        assert_eq!(composer.current_date(), date(2, 29));

        composer.today(date(3, 5));
        assert_eq!(composer.current_date(), date(3, 5));
    }

    #[test]
    fn test_query_bounds_follow_zone() {
        let composer = composer(ViewMode::Day, date(1, 17));
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            composer.query_bounds(&tz),
            (utc(1, 16, 22, 0), utc(1, 17, 22, 0))
        );
    }

    #[test]
    fn test_week_grid_places_and_excludes() {
        let composer = composer(ViewMode::Week, date(1, 17));
        let meetings = vec![
            meeting("a", utc(1, 16, 9, 15), 90),
            meeting("early", utc(1, 16, 6, 0), 60),
            meeting("short", utc(1, 18, 13, 0), 10),
            meeting("next-week", utc(1, 23, 9, 0), 60),
        ];

        let CalendarView::TimeGrid(view) = composer.compose(&meetings, utc(1, 10, 8, 0), &Utc) else {
            panic!("week view should compose a time grid");
        };

        assert_eq!(view.columns.len(), 7);
        let tuesday = &view.columns[1];
        assert_eq!(tuesday.date, date(1, 16));
        assert_eq!(tuesday.chips.len(), 1);
        assert_eq!(tuesday.chips[0].meeting.id, "a");
        assert_eq!(tuesday.chips[0].placement, GridPlacement { top: 75, height: 90 });
        assert_eq!(tuesday.chips[0].time_label, "09:15 - 10:45");

        let thursday = &view.columns[3];
        assert_eq!(thursday.chips[0].placement.height, 30);

        let total: usize = view.columns.iter().map(|c| c.chips.len()).sum();
        assert_eq!(total, 2);
        assert_eq!(view.now_line, None);
    }

    #[test]
    fn test_overlapping_meetings_share_lanes() {
        let composer = composer(ViewMode::Day, date(1, 16));
        let meetings = vec![
            meeting("a", utc(1, 16, 9, 0), 60),
            meeting("b", utc(1, 16, 9, 30), 60),
        ];

        let CalendarView::TimeGrid(view) = composer.compose(&meetings, utc(1, 10, 8, 0), &Utc) else {
            panic!("day view should compose a time grid");
        };

        let lanes: Vec<_> = view.columns[0].chips.iter().map(|c| c.lane).collect();
        assert_eq!(lanes, vec![Lane { index: 0, count: 2 }, Lane { index: 1, count: 2 }]);
    }

    #[test]
    fn test_today_column_and_now_line() {
        let composer = composer(ViewMode::Week, date(1, 17));
        let now = utc(1, 17, 9, 30);

        let CalendarView::TimeGrid(view) = composer.compose(&[], now, &Utc) else {
            panic!("week view should compose a time grid");
        };

        let today: Vec<_> = view.columns.iter().filter(|c| c.is_today).collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].date, date(1, 17));
        assert_eq!(
            view.now_line,
            Some(NowLine {
                date: date(1, 17),
                offset: 90.0
            })
        );
    }

    #[test]
    fn test_now_line_hidden_outside_working_hours() {
        let composer = composer(ViewMode::Week, date(1, 17));
        let CalendarView::TimeGrid(view) = composer.compose(&[], utc(1, 17, 22, 0), &Utc) else {
            panic!("week view should compose a time grid");
        };
        assert_eq!(view.now_line, None);
    }

    #[test]
    fn test_chip_status_is_derived() {
        let composer = composer(ViewMode::Day, date(1, 15));
        let mut cancelled = meeting("c", utc(1, 15, 11, 0), 60);
        cancelled.status = StoredStatus::Cancelled;
        let meetings = vec![meeting("a", utc(1, 15, 9, 0), 60), cancelled];

        let CalendarView::TimeGrid(view) = composer.compose(&meetings, utc(1, 15, 9, 30), &Utc) else {
            panic!("day view should compose a time grid");
        };
        let statuses: Vec<_> = view.columns[0].chips.iter().map(|c| c.status).collect();
        assert_eq!(statuses, vec![MeetingStatus::Ongoing, MeetingStatus::Cancelled]);
    }

    #[test]
    fn test_month_cell_caps_and_reports_overflow() {
        let composer = composer(ViewMode::Month, date(1, 10));
        let meetings: Vec<_> = (0..5)
            .rev()
            .map(|i| meeting(&format!("m{}", i), utc(1, 16, 8 + i, 0), 30))
            .collect();

        let CalendarView::Month(view) = composer.compose(&meetings, utc(1, 10, 8, 0), &Utc) else {
            panic!("month view should compose a month grid");
        };

        let cell = view
            .weeks
            .iter()
            .flatten()
            .find(|cell| cell.date == date(1, 16))
            .unwrap();
        assert_eq!(cell.chips.len(), 3);
        assert_eq!(cell.hidden, 2);
        assert_eq!(cell.overflow.as_deref(), Some("+2 more"));
        let ids: Vec<_> = cell.chips.iter().map(|c| c.meeting.id.as_str()).collect();
        assert_eq!(ids, vec!["m0", "m1", "m2"]);
    }

    #[test]
    fn test_month_cells_flag_adjacent_days_and_today() {
        let composer = composer(ViewMode::Month, date(9, 10));
        let CalendarView::Month(view) = composer.compose(&[], utc(9, 12, 8, 0), &Utc) else {
            panic!("month view should compose a month grid");
        };

        assert_eq!(view.weeks.len(), 6);
        assert!(view.weeks.iter().all(|week| week.len() == 7));
        assert!(!view.weeks[0][0].in_current_month);
        assert!(view.weeks[0][6].in_current_month);
        let today: Vec<_> = view.weeks.iter().flatten().filter(|c| c.is_today).collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].date, date(9, 12));
    }

    #[test]
    fn test_month_view_keeps_meetings_outside_working_hours() {
        let composer = composer(ViewMode::Month, date(1, 10));
        let meetings = vec![meeting("late", utc(1, 16, 22, 0), 60)];
        let CalendarView::Month(view) = composer.compose(&meetings, utc(1, 10, 8, 0), &Utc) else {
            panic!("month view should compose a month grid");
        };
        let total: usize = view.weeks.iter().flatten().map(|c| c.chips.len()).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_confirm_then_commit_success_notifies_once() {
        let mut composer = composer(ViewMode::Week, date(1, 15));
        let original = meeting("m", utc(1, 15, 9, 0), 60);
        let now = utc(1, 10, 8, 0);

        assert!(composer.start_drag(Some(&original)));
        let outcome = composer.drop_on(HoverCell::slot(date(1, 17), 14), now, &Utc);
        assert!(matches!(outcome, DropOutcome::Pending(_)));

        let prompt = composer.confirm_prompt(&Utc).unwrap();
        assert_eq!(prompt.subject, "Meeting m");
        assert_eq!(prompt.date_label, "Wednesday, January 17, 2024");
        assert_eq!(prompt.time_label, "14:00 - 15:00");
        assert!(!prompt.busy);

        let pending = composer.begin_commit().unwrap();
        assert!(composer.confirm_prompt(&Utc).unwrap().busy);
        assert!(composer.begin_commit().is_none());
        assert!(composer.cancel_pending().is_none());
        assert!(!composer.start_drag(Some(&original)));

        let mut notified = 0;
        composer.finish_commit(&Ok(receipt(&pending)), |_| notified += 1);

        assert_eq!(notified, 1);
        assert_eq!(composer.commit_state(), CommitState::Idle);
        assert!(composer.confirm_prompt(&Utc).is_none());
    }

    #[test]
    fn test_commit_failure_keeps_pending_for_retry() {
        let mut composer = composer(ViewMode::Week, date(1, 15));
        let original = meeting("m", utc(1, 15, 9, 0), 60);

        composer.start_drag(Some(&original));
        composer.drop_on(HoverCell::slot(date(1, 17), 14), utc(1, 10, 8, 0), &Utc);
        composer.begin_commit().unwrap();

        let mut notified = false;
        composer.finish_commit(
            &Err(CommitError::ProviderSync(anyhow!("timeout"))),
            |_| notified = true,
        );

        assert!(!notified);
        assert!(!composer.is_committing());
        assert!(composer.controller().pending().is_some());
        assert!(composer.begin_commit().is_some());
    }

    #[test]
    fn test_aborted_commit_unblocks_retry() {
        let mut composer = composer(ViewMode::Week, date(1, 15));
        let original = meeting("m", utc(1, 15, 9, 0), 60);

        composer.start_drag(Some(&original));
        composer.drop_on(HoverCell::slot(date(1, 17), 14), utc(1, 10, 8, 0), &Utc);
        composer.begin_commit().unwrap();
        assert!(composer.cancel_pending().is_none());

        composer.abort_commit();

        assert_eq!(composer.commit_state(), CommitState::Idle);
        assert!(composer.confirm_prompt(&Utc).is_some_and(|p| !p.busy));
        assert!(composer.cancel_pending().is_some());
    }

    #[test]
    fn test_cancel_pending_discards_without_commit() {
        let mut composer = composer(ViewMode::Month, date(1, 15));
        let original = meeting("m", utc(1, 15, 9, 0), 60);

        composer.start_drag(Some(&original));
        composer.drop_on(HoverCell::day(date(1, 20)), utc(1, 10, 8, 0), &Utc);

        let discarded = composer.cancel_pending().unwrap();
        assert_eq!(discarded.new_start, utc(1, 20, 9, 0));
        assert!(composer.confirm_prompt(&Utc).is_none());
        assert!(composer.begin_commit().is_none());
    }

    #[test]
    fn test_rejected_drop_shows_no_dialog() {
        let mut composer = composer(ViewMode::Week, date(1, 15));
        let original = meeting("m", utc(1, 15, 9, 0), 60);

        composer.start_drag(Some(&original));
        let outcome = composer.drop_on(HoverCell::slot(date(1, 15), 8), utc(1, 15, 8, 30), &Utc);

        assert_eq!(outcome, DropOutcome::Rejected(DropRejection::InPast));
        assert!(composer.confirm_prompt(&Utc).is_none());
    }

    #[test]
    fn test_invalid_settings_fall_back_to_default_hours() {
        let settings = Settings {
            day_start_hour: 20,
            day_end_hour: 6,
            ..Settings::default()
        };
        let composer = CalendarViewComposer::new(date(1, 15), &settings);
        assert_eq!(composer.working_hours(), WorkingHours::default());
    }
}
