use chrono::NaiveDateTime;
use tracing::debug;

use crate::{
    error::InputError,
    utils::time::{monday_of, truncate_to_minute},
};

use super::{
    entities::{Ledger, Task, WeekRecord},
    hours::Hours,
};

/// Appends a task to the current week. If the ledger has no weeks yet, the week of `now` is
/// created first.
pub fn log_task(
    ledger: &mut Ledger,
    description: impl Into<String>,
    hours: Hours,
    now: NaiveDateTime,
) -> &Task {
    let task = Task {
        description: description.into(),
        hours,
        logged_at: truncate_to_minute(now),
    };
    debug!("Logging task {task:?}");

    let week = ledger.current_week_or_insert_with(|| WeekRecord::new(monday_of(now.date())));
    week.tasks.push(task);
    let last = week.tasks.len() - 1;
    &week.tasks[last]
}

/// Replaces hours of a task in the current week. `number` is 1-based, the way tasks are listed to
/// the user. Historical weeks can't be edited.
pub fn edit_task_hours(
    ledger: &mut Ledger,
    number: usize,
    hours: Hours,
) -> Result<&Task, InputError> {
    let Some(week) = ledger.current_week_mut() else {
        return Err(InputError::NoTasks);
    };
    let task_count = week.tasks.len();
    if task_count == 0 {
        return Err(InputError::NoTasks);
    }
    let task = number
        .checked_sub(1)
        .and_then(|index| week.tasks.get_mut(index))
        .ok_or(InputError::TaskOutOfRange { number, task_count })?;

    debug!("Changing hours of {:?} from {} to {hours}", task.description, task.hours);
    task.hours = hours;
    Ok(task)
}
