pub mod shell;

use std::{io::Write, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use shell::Shell;
use tokio::io::BufReader;
use tracing::{info, level_filters::LevelFilter};

use crate::{
    ledger::hours::Hours,
    storage::ledger_storage::JsonLedgerStorage,
    tracker::{Tracker, TrackerConfig, DEFAULT_WEEKLY_BUDGET},
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, DEFAULT_RECORD_FILE},
        logging::{enable_logging, LOG_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "weekhours", version, long_about = None)]
#[command(about = "Tracks weekly work hours against a fixed budget", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Option<Commands>,
    #[arg(
        long,
        help = "Record file. By default it's saved into $XDG_STATE_HOME/weekhours or $HOME/.local/state/weekhours"
    )]
    file: Option<PathBuf>,
    #[arg(
        long,
        default_value_t = DEFAULT_WEEKLY_BUDGET,
        value_parser = parse_budget,
        help = "Weekly budget in hours"
    )]
    budget: Decimal,
    #[arg(long, help = "Enable trace logging")]
    log: bool,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console", help = "Mirror logs to stderr")]
    log_console: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Interactive menu. Used when no command is given")]
    Shell,
    #[command(about = "Print the summary of the current week")]
    Summary,
    #[command(about = "Print every recorded week")]
    History,
    #[command(about = "Log a task into the current week")]
    Add {
        #[arg(long, short, default_value = "", help = "Task description")]
        description: String,
        #[arg(long, help = "Hours spent, for example 1.5 or 1,5")]
        hours: Hours,
    },
}

fn parse_budget(s: &str) -> Result<Decimal, String> {
    let budget = s
        .trim()
        .replace(',', ".")
        .parse::<Decimal>()
        .map_err(|e| format!("{s:?} is not a number: {e}"))?;
    if budget <= Decimal::ZERO {
        return Err(format!("weekly budget must be positive, got {budget}"));
    }
    Ok(budget.normalize())
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = create_application_default_path()?;
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(
        LOG_PREFIX,
        &app_dir.join("logs"),
        logging_level,
        args.log_console,
    )?;

    let config = TrackerConfig {
        record_file: args
            .file
            .unwrap_or_else(|| app_dir.join(DEFAULT_RECORD_FILE)),
        weekly_budget: args.budget,
    };
    info!("Starting with {config:?}");

    let mut tracker = Tracker::open(
        JsonLedgerStorage::new(config.record_file.clone()),
        Box::new(DefaultClock),
        &config,
    )
    .await?;

    let mut stdout = std::io::stdout();
    match args.commands.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let mut shell = Shell::new(tracker, BufReader::new(tokio::io::stdin()), stdout);
            shell.run().await?;
        }
        Commands::Summary => match tracker.summary() {
            Some(summary) => write!(stdout, "{summary}")?,
            None => writeln!(stdout, "No weeks recorded yet.")?,
        },
        Commands::History => write!(stdout, "{}", tracker.history())?,
        Commands::Add { description, hours } => {
            let task = tracker.log_task(description, hours).await?;
            writeln!(stdout, "Task added: {} ({})", task.description, task.hours)?;
        }
    }
    Ok(())
}
