//! Error types for weekhours.
//!
//! [InputError] is always recoverable: the shell reports it and shows the menu again.
//! Everything else travels as [anyhow::Error] and ends the program.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Enter a valid number for the hours.")]
    InvalidHours(String),

    #[error("Enter a value greater than 0.")]
    NonPositiveHours,

    #[error("A single task can't take more than {max} hours.")]
    TooManyHours { max: Decimal },

    #[error("Invalid task number.")]
    InvalidTaskNumber(String),

    #[error("Invalid task number.")]
    TaskOutOfRange { number: usize, task_count: usize },

    #[error("There are no tasks to edit this week.")]
    NoTasks,

    #[error("Invalid option.")]
    UnknownOption(String),
}

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
