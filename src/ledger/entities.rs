use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::hours::{hours_ser, Hours};

/// A single piece of logged work.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Task {
    pub description: String,
    #[serde(with = "hours_ser")]
    pub hours: Hours,
    /// Minute precision, see [crate::utils::time::truncate_to_minute].
    #[serde(with = "logged_at_ser")]
    pub logged_at: NaiveDateTime,
}

/// Bucket of tasks logged during one week. `week_start` is always a Monday.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct WeekRecord {
    pub week_start: NaiveDate,
    pub tasks: Vec<Task>,
}

impl WeekRecord {
    pub fn new(week_start: NaiveDate) -> Self {
        Self {
            week_start,
            tasks: vec![],
        }
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Exact sum of all task hours.
    pub fn hours_spent(&self) -> Decimal {
        self.tasks.iter().map(|task| task.hours.value()).sum()
    }
}

/// All weeks ever recorded, oldest first. New weeks are only ever appended at the end, so the
/// last entry is the current week.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Default)]
#[serde(transparent)]
pub struct Ledger {
    weeks: Vec<WeekRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weeks(&self) -> &[WeekRecord] {
        &self.weeks
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn current_week(&self) -> Option<&WeekRecord> {
        self.weeks.last()
    }

    pub fn current_week_mut(&mut self) -> Option<&mut WeekRecord> {
        self.weeks.last_mut()
    }

    /// Appends a week at the tail. Callers are responsible for keeping `week_start` ordered, see
    /// [super::rollover::ensure_current_week].
    pub(crate) fn push_week(&mut self, week: WeekRecord) -> &mut WeekRecord {
        self.weeks.push(week);
        let last = self.weeks.len() - 1;
        &mut self.weeks[last]
    }

    /// Returns the current week, creating it with `create` when the ledger is empty.
    pub(crate) fn current_week_or_insert_with(
        &mut self,
        create: impl FnOnce() -> WeekRecord,
    ) -> &mut WeekRecord {
        if self.weeks.is_empty() {
            self.weeks.push(create());
        }
        let last = self.weeks.len() - 1;
        &mut self.weeks[last]
    }

    /// Checks invariants that can't be expressed through types. Only this program writes the
    /// record file, so any violation means the file is damaged.
    pub fn validate(&self) -> Result<()> {
        let mut previous: Option<NaiveDate> = None;
        for week in &self.weeks {
            if week.week_start.weekday() != Weekday::Mon {
                bail!(
                    "Week starting {} doesn't start on a Monday",
                    week.week_start
                );
            }
            if let Some(previous) = previous.filter(|p| *p >= week.week_start) {
                bail!(
                    "Week starting {} is stored after week starting {previous}",
                    week.week_start
                );
            }
            previous = Some(week.week_start);
        }
        Ok(())
    }
}

impl From<Vec<WeekRecord>> for Ledger {
    fn from(weeks: Vec<WeekRecord>) -> Self {
        Self { weeks }
    }
}

mod logged_at_ser {
    use chrono::NaiveDateTime;
    use serde::{self, de::Error, Deserialize, Deserializer, Serializer};

    use crate::utils::time::{format_logged_at, LOGGED_AT_FORMAT};

    pub fn serialize<S>(moment: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_logged_at(*moment))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, LOGGED_AT_FORMAT).map_err(D::Error::custom)
    }
}
