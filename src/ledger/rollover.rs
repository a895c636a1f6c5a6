use chrono::NaiveDate;
use tracing::{debug, info};

use crate::utils::time::monday_of;

use super::entities::{Ledger, WeekRecord};

/// Makes sure the last week of the ledger is the week `today` belongs to. Appends at most one
/// empty week and returns `true` if it did.
///
/// Only calendar dates are compared, so calling this any number of times during a day is safe.
/// A `today` earlier than the last stored week (clock moved back) leaves the ledger untouched.
pub fn ensure_current_week(ledger: &mut Ledger, today: NaiveDate) -> bool {
    let monday = monday_of(today);

    match ledger.current_week() {
        Some(last) if monday <= last.week_start => {
            debug!("Week starting {} is still current", last.week_start);
            false
        }
        _ => {
            info!("Starting a new week on {monday}");
            ledger.push_week(WeekRecord::new(monday));
            true
        }
    }
}
