use std::{io::Write, str::FromStr};

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, info, warn};

use crate::{
    error::{InputError, TrackerError},
    ledger::{hours::Hours, summary::render_task_list},
    storage::ledger_storage::LedgerStorage,
    tracker::Tracker,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddTask,
    ShowSummary,
    ShowHistory,
    EditTask,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::AddTask),
            "2" => Ok(Self::ShowSummary),
            "3" => Ok(Self::ShowHistory),
            "4" => Ok(Self::EditTask),
            "5" => Ok(Self::Exit),
            other => Err(InputError::UnknownOption(other.to_string())),
        }
    }
}

/// Parses a 1-based task number as typed by the user. Range is checked by the ledger.
pub fn parse_task_number(s: &str) -> Result<usize, InputError> {
    s.trim()
        .parse::<usize>()
        .map_err(|_| InputError::InvalidTaskNumber(s.trim().to_string()))
}

const MENU: &str = "\n====== Weekly Hours Tracker ======\n\
                    1. Add task\n\
                    2. Show current week summary\n\
                    3. Show full history\n\
                    4. Edit a task in the current week\n\
                    5. Exit\n";

/// Interactive menu over a [Tracker]. Reads answers line by line from `input`; closing the input
/// ends the loop like choosing exit does.
pub struct Shell<S: LedgerStorage, R, W> {
    tracker: Tracker<S>,
    input: Lines<R>,
    output: W,
}

impl<S, R, W> Shell<S, R, W>
where
    S: LedgerStorage,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(tracker: Tracker<S>, input: R, output: W) -> Self {
        Self {
            tracker,
            input: input.lines(),
            output,
        }
    }

    pub fn into_parts(self) -> (Tracker<S>, W) {
        (self.tracker, self.output)
    }

    /// Executes the menu loop. Only storage failures end it early.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            write!(self.output, "{MENU}")?;
            let Some(answer) = self.prompt("Choose an option: ").await? else {
                break;
            };

            let outcome = match answer.parse::<MenuChoice>() {
                Ok(MenuChoice::AddTask) => self.add_task().await,
                Ok(MenuChoice::ShowSummary) => self.show_summary(),
                Ok(MenuChoice::ShowHistory) => self.show_history(),
                Ok(MenuChoice::EditTask) => self.edit_task().await,
                Ok(MenuChoice::Exit) => break,
                Err(e) => Err(e.into()),
            };

            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::InputClosed) => break,
                Err(TrackerError::Input(e)) => {
                    debug!("Rejected input: {e:?}");
                    writeln!(self.output, "{e}")?;
                }
                Err(TrackerError::Storage(e)) => return Err(e),
            }
        }

        writeln!(self.output, "See you next time!")?;
        info!("Shell finished");
        Ok(())
    }

    async fn add_task(&mut self) -> Result<Flow, TrackerError> {
        let Some(description) = self.prompt("Task description: ").await? else {
            return Ok(Flow::InputClosed);
        };
        let Some(raw_hours) = self.prompt("Hours spent (e.g. 1.5 for 1h30): ").await? else {
            return Ok(Flow::InputClosed);
        };
        let hours = raw_hours.parse::<Hours>()?;

        self.tracker.log_task(description, hours).await?;
        self.say("Task added.")?;
        Ok(Flow::Continue)
    }

    fn show_summary(&mut self) -> Result<Flow, TrackerError> {
        match self.tracker.summary() {
            Some(summary) => write!(self.output, "\n{summary}").map_err(anyhow::Error::from)?,
            None => self.say("No weeks recorded yet.")?,
        }
        Ok(Flow::Continue)
    }

    fn show_history(&mut self) -> Result<Flow, TrackerError> {
        let history = self.tracker.history();
        write!(self.output, "\n{history}").map_err(anyhow::Error::from)?;
        Ok(Flow::Continue)
    }

    async fn edit_task(&mut self) -> Result<Flow, TrackerError> {
        let list = match self.tracker.current_week() {
            Some(week) if !week.tasks.is_empty() => render_task_list(week),
            _ => return Err(InputError::NoTasks.into()),
        };
        write!(self.output, "\nThis week's tasks:\n{list}").map_err(anyhow::Error::from)?;

        let Some(raw_number) = self.prompt("\nWhich task do you want to edit? (number): ").await?
        else {
            return Ok(Flow::InputClosed);
        };
        let number = parse_task_number(&raw_number)?;
        let selected = self
            .tracker
            .current_week()
            .and_then(|week| number.checked_sub(1).and_then(|i| week.tasks.get(i)))
            .map(|task| format!("Selected: {} ({})", task.description, task.hours));
        match selected {
            Some(selected) => self.say(&selected)?,
            None => {
                let task_count = self.tracker.current_week().map_or(0, |w| w.tasks.len());
                return Err(InputError::TaskOutOfRange { number, task_count }.into());
            }
        }

        let Some(raw_hours) = self.prompt("New number of hours: ").await? else {
            return Ok(Flow::InputClosed);
        };
        let hours = raw_hours.parse::<Hours>()?;

        self.tracker.edit_task_hours(number, hours).await?;
        self.say("Task updated.")?;
        Ok(Flow::Continue)
    }

    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        let line = self.input.next_line().await?;
        if line.is_none() {
            warn!("Input closed while waiting for an answer");
        }
        Ok(line)
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }
}

enum Flow {
    Continue,
    InputClosed,
}
