//! Text reports over the ledger. Rendering goes through [Display] wrappers so the shell can write
//! them straight into its output.

use std::fmt::{self, Display, Formatter};

use rust_decimal::Decimal;

use crate::utils::time::{format_logged_at, format_week_start};

use super::entities::{Ledger, Task, WeekRecord};

/// Exact sum of hours logged during `week`.
pub fn hours_spent(week: &WeekRecord) -> Decimal {
    week.hours_spent()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    Remaining(Decimal),
    Exceeded { budget: Decimal },
}

/// Spending exactly the budget still counts as being within it.
pub fn budget_status(week: &WeekRecord, weekly_budget: Decimal) -> BudgetStatus {
    let total = hours_spent(week);
    if total > weekly_budget {
        BudgetStatus::Exceeded {
            budget: weekly_budget,
        }
    } else {
        BudgetStatus::Remaining(weekly_budget - total)
    }
}

pub fn render_summary(week: &WeekRecord, weekly_budget: Decimal) -> String {
    WeekSummary {
        week,
        weekly_budget,
    }
    .to_string()
}

pub fn render_history(ledger: &Ledger) -> String {
    History { ledger }.to_string()
}

/// Numbered list of the week's tasks, starting from 1.
pub fn render_task_list(week: &WeekRecord) -> String {
    let mut out = String::new();
    for (number, task) in week.tasks.iter().enumerate() {
        out += &format!("{}. {}\n", number + 1, TaskLine(task));
    }
    out
}

struct TaskLine<'a>(&'a Task);

impl Display for TaskLine<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({})",
            format_logged_at(self.0.logged_at),
            self.0.description,
            self.0.hours
        )
    }
}

pub struct WeekSummary<'a> {
    pub week: &'a WeekRecord,
    pub weekly_budget: Decimal,
}

impl Display for WeekSummary<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let week = self.week;
        writeln!(f, "Week starting {}", format_week_start(week.week_start))?;
        writeln!(f, "Total hours spent: {:.2}h", hours_spent(week))?;
        match budget_status(week, self.weekly_budget) {
            BudgetStatus::Exceeded { budget } => {
                writeln!(f, "Warning: you went over the weekly limit of {budget}h!")?
            }
            BudgetStatus::Remaining(left) => {
                writeln!(f, "You still have {left:.2}h available this week.")?
            }
        }
        writeln!(f)?;
        writeln!(f, "Tasks:")?;
        if week.tasks.is_empty() {
            writeln!(f, "   (no tasks yet)")?;
        }
        for task in &week.tasks {
            writeln!(f, " - {}", TaskLine(task))?;
        }
        Ok(())
    }
}

pub struct History<'a> {
    pub ledger: &'a Ledger,
}

impl Display for History<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.ledger.is_empty() {
            return writeln!(f, "No records yet.");
        }

        writeln!(f, "Task history by week:")?;
        for week in self.ledger.weeks() {
            writeln!(f)?;
            writeln!(f, "Week starting {}", format_week_start(week.week_start))?;
            writeln!(f, "   Total: {:.2}h", hours_spent(week))?;
            if week.tasks.is_empty() {
                writeln!(f, "    (no tasks)")?;
            }
            for task in &week.tasks {
                writeln!(f, "    - {}", TaskLine(task))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::ledger::{
        entities::{Ledger, Task, WeekRecord},
        hours::Hours,
    };

    use super::{
        budget_status, render_history, render_summary, render_task_list, BudgetStatus,
    };

    fn week(day: u32, hours: &[&str]) -> WeekRecord {
        let start = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        hours.iter().enumerate().fold(WeekRecord::new(start), |week, (i, h)| {
            week.with_task(Task {
                description: format!("task {}", i + 1),
                hours: Hours::from_str(h).unwrap(),
                logged_at: start.and_hms_opt(8 + i as u32, 5, 0).unwrap(),
            })
        })
    }

    #[test]
    fn test_budget_boundary_is_not_exceeded() {
        let w = week(3, &["10", "6"]);
        assert_eq!(
            budget_status(&w, Decimal::from(16)),
            BudgetStatus::Remaining(Decimal::ZERO)
        );
        assert!(render_summary(&w, Decimal::from(16))
            .contains("You still have 0.00h available this week."));
    }

    #[test]
    fn test_budget_exceeded() {
        let w = week(3, &["10", "6.01"]);
        assert_eq!(
            budget_status(&w, Decimal::from(16)),
            BudgetStatus::Exceeded {
                budget: Decimal::from(16)
            }
        );
        let summary = render_summary(&w, Decimal::from(16));
        assert!(summary.contains("Total hours spent: 16.01h"));
        assert!(summary.contains("weekly limit of 16h"));
        assert!(!summary.contains("available"));
    }

    #[test]
    fn test_summary_with_maximal_tasks() {
        let w = week(3, &["168", "168"]);
        let summary = render_summary(&w, Decimal::from(16));
        assert!(summary.contains("Total hours spent: 336.00h"));
        assert!(summary.contains("weekly limit of 16h"));

        let ledger = Ledger::from(vec![w]);
        assert!(render_history(&ledger).contains("Total: 336.00h"));
    }

    #[test]
    fn test_summary_layout() {
        let w = week(3, &["1.5", "0,25"]);
        assert_eq!(
            render_summary(&w, Decimal::from(16)),
            "Week starting 2024-06-03\n\
             Total hours spent: 1.75h\n\
             You still have 14.25h available this week.\n\
             \n\
             Tasks:\n \
             - [2024-06-03 08:05] task 1 (1.50h)\n \
             - [2024-06-03 09:05] task 2 (0.25h)\n"
        );
    }

    #[test]
    fn test_summary_without_tasks() {
        let summary = render_summary(&week(3, &[]), Decimal::from(16));
        assert!(summary.contains("Total hours spent: 0.00h"));
        assert!(summary.contains("You still have 16.00h"));
        assert!(summary.contains("(no tasks yet)"));
    }

    #[test]
    fn test_history() {
        assert_eq!(render_history(&Ledger::new()), "No records yet.\n");

        let ledger = Ledger::from(vec![week(3, &["2"]), week(10, &[])]);
        assert_eq!(
            render_history(&ledger),
            "Task history by week:\n\
             \n\
             Week starting 2024-06-03\n   \
             Total: 2.00h\n    \
             - [2024-06-03 08:05] task 1 (2.00h)\n\
             \n\
             Week starting 2024-06-10\n   \
             Total: 0.00h\n    \
             (no tasks)\n"
        );
    }

    #[test]
    fn test_task_list_numbering() {
        assert_eq!(
            render_task_list(&week(3, &["1", "2"])),
            "1. [2024-06-03 08:05] task 1 (1.00h)\n\
             2. [2024-06-03 09:05] task 2 (2.00h)\n"
        );
        assert_eq!(render_task_list(&week(3, &[])), "");
    }
}
