// Date utility functions
// Calendar arithmetic shared by navigation and view composition

use chrono::{Datelike, Duration, Months, NaiveDate};

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Move by whole months, clamping the day to the target month's length
/// (Jan 31 + 1 month = Feb 28/29).
pub fn shift_month_preserving_day(date: NaiveDate, delta_months: i32) -> NaiveDate {
    let months = Months::new(delta_months.unsigned_abs());
    let shifted = if delta_months >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(date)
}

/// Inclusive `(first, last)` span of the whole weeks covering `date`'s month,
/// Monday through Sunday.
pub fn month_grid_span(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = week_start(first_of_month(date));
    let last = week_start(last_of_month(date)) + Duration::days(6);
    (first, last)
}

/// Every date from `first` to `last`, inclusive.
pub fn days_between(first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    first.iter_days().take_while(move |day| *day <= last)
}
