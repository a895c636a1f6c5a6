use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, SubsecRound, Timelike};

pub const WEEK_START_FORMAT: &str = "%Y-%m-%d";
pub const LOGGED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// This is the standard way of converting a date to a string in weekhours.
pub fn format_week_start(date: NaiveDate) -> String {
    date.format(WEEK_START_FORMAT).to_string()
}

pub fn format_logged_at(moment: NaiveDateTime) -> String {
    moment.format(LOGGED_AT_FORMAT).to_string()
}

/// Returns the Monday of the week `date` belongs to.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday().into())
}

/// Drops seconds and anything below them.
pub fn truncate_to_minute(moment: NaiveDateTime) -> NaiveDateTime {
    let moment = moment.trunc_subsecs(0);
    moment.with_second(0).unwrap_or(moment)
}
