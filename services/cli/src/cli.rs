use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use job_tracker::applications::{ApplicationStatus, RestGateway};
use job_tracker::config::AppConfig;
use job_tracker::error::AppError;
use job_tracker::telemetry;

use crate::commands;
use crate::demo::{run_demo, DemoArgs};

#[derive(Parser, Debug)]
#[command(
    name = "job-tracker",
    about = "Track job applications stored in a remote table",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Store(StoreCommand),
    /// Walk through a scripted session against an in-memory store
    Demo(DemoArgs),
}

/// Commands that run against the configured remote store.
#[derive(Subcommand, Debug)]
pub(crate) enum StoreCommand {
    /// List applications, newest first
    List(ListArgs),
    /// Record a new application
    Add(AddArgs),
    /// Delete one application by id
    Delete(DeleteArgs),
    /// Delete every application
    Clear(ClearArgs),
    /// Show summary statistics
    Stats(StatsArgs),
    /// Write the current list to a CSV file
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    /// Print records as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct AddArgs {
    #[arg(long)]
    pub(crate) company: String,
    #[arg(long)]
    pub(crate) role: String,
    /// Fit score between 0 and 100
    #[arg(long = "match", allow_hyphen_values = true)]
    pub(crate) match_score: String,
    /// Submission date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub(crate) date: Option<String>,
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<ApplicationStatus>,
    /// Follow-up date (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) followup: Option<String>,
    #[arg(long)]
    pub(crate) salary: Option<String>,
    #[arg(long)]
    pub(crate) tags: Option<String>,
    #[arg(long)]
    pub(crate) link: Option<String>,
    #[arg(long)]
    pub(crate) notes: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct DeleteArgs {
    pub(crate) id: String,
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub(crate) yes: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub(crate) yes: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct StatsArgs {
    /// Day used for the follow-ups due list (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    /// Directory the CSV file is written to
    #[arg(long, default_value = ".")]
    pub(crate) dir: PathBuf,
    /// Export date used in the file name (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Demo(args) => run_demo(args).await,
        Command::Store(command) => {
            let store = config.require_store()?;
            let gateway = Arc::new(RestGateway::new(store)?);
            commands::run(command, gateway).await
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_status(raw: &str) -> Result<ApplicationStatus, String> {
    raw.parse::<ApplicationStatus>().map_err(|err| {
        let known: Vec<_> = ApplicationStatus::ALL
            .iter()
            .map(|status| status.label())
            .collect();
        format!("{err}; expected one of {}", known.join(", "))
    })
}
