use std::path::PathBuf;

use anyhow::Result;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::{
    error::TrackerError,
    ledger::{
        entities::{Ledger, Task, WeekRecord},
        hours::Hours,
        rollover::ensure_current_week,
        summary::{render_history, render_summary},
        tasks::{edit_task_hours, log_task},
    },
    storage::ledger_storage::LedgerStorage,
    utils::{clock::Clock, dir::DEFAULT_RECORD_FILE},
};

pub const DEFAULT_WEEKLY_BUDGET: Decimal = Decimal::from_parts(16, 0, 0, false, 0);

/// Everything read once at start.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub record_file: PathBuf,
    pub weekly_budget: Decimal,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            record_file: PathBuf::from(DEFAULT_RECORD_FILE),
            weekly_budget: DEFAULT_WEEKLY_BUDGET,
        }
    }
}

/// Owns the ledger while the program runs. Every change goes to storage before the call returns.
pub struct Tracker<S: LedgerStorage> {
    ledger: Ledger,
    storage: S,
    clock: Box<dyn Clock>,
    weekly_budget: Decimal,
}

impl<S: LedgerStorage> Tracker<S> {
    /// Loads the ledger and makes sure the current week exists.
    pub async fn open(storage: S, clock: Box<dyn Clock>, config: &TrackerConfig) -> Result<Self> {
        let ledger = storage.load().await?;
        info!(
            "Loaded ledger with {} weeks, weekly budget is {}h",
            ledger.weeks().len(),
            config.weekly_budget
        );
        let mut tracker = Self {
            ledger,
            storage,
            clock,
            weekly_budget: config.weekly_budget,
        };
        tracker.roll_over().await?;
        Ok(tracker)
    }

    /// Appends the week of today if the calendar moved on. Storage is rewritten either way,
    /// which also creates the record file on first run.
    pub async fn roll_over(&mut self) -> Result<bool> {
        let today = self.clock.time().date();
        let appended = ensure_current_week(&mut self.ledger, today);
        self.storage.save(&self.ledger).await?;
        Ok(appended)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn weekly_budget(&self) -> Decimal {
        self.weekly_budget
    }

    pub fn current_week(&self) -> Option<&WeekRecord> {
        self.ledger.current_week()
    }

    #[instrument(skip(self))]
    pub async fn log_task(&mut self, description: String, hours: Hours) -> Result<Task> {
        let now = self.clock.time();
        let task = log_task(&mut self.ledger, description, hours, now).clone();
        self.storage.save(&self.ledger).await?;
        Ok(task)
    }

    #[instrument(skip(self))]
    pub async fn edit_task_hours(
        &mut self,
        number: usize,
        hours: Hours,
    ) -> Result<Task, TrackerError> {
        let task = edit_task_hours(&mut self.ledger, number, hours)?.clone();
        self.storage.save(&self.ledger).await?;
        Ok(task)
    }

    /// [None] when no week was ever recorded.
    pub fn summary(&self) -> Option<String> {
        self.current_week()
            .map(|week| render_summary(week, self.weekly_budget))
    }

    pub fn history(&self) -> String {
        render_history(&self.ledger)
    }
}
