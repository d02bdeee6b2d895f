use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::Args;
use job_tracker::applications::{
    ApplicationStatus, ApplicationTracker, DirectorySink, ExportSink, InMemoryGateway,
};
use job_tracker::error::AppError;

use crate::cli::{parse_date, AddArgs};
use crate::commands::{add, render_list, render_stats, today};
use crate::prompt::TerminalPrompt;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the session date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Also write the demo CSV export into this directory
    #[arg(long)]
    pub(crate) export_dir: Option<PathBuf>,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today: day, export_dir } = args;
    let day = day.unwrap_or_else(today);

    let gateway = Arc::new(InMemoryGateway::new());
    let tracker = ApplicationTracker::new(gateway, Arc::new(TerminalPrompt::new(true)));
    tracker.refresh().await?;

    println!("Job tracker demo ({day})");
    println!("\nEmpty store");
    render_stats(&tracker, day);

    for (company, role, match_score, status) in [
        ("Pied Piper", "Compression Engineer", "80", ApplicationStatus::Applied),
        ("Hooli", "Platform Engineer", "60", ApplicationStatus::Offer),
    ] {
        add(
            &tracker,
            AddArgs {
                company: company.to_string(),
                role: role.to_string(),
                match_score: match_score.to_string(),
                status: Some(status),
                ..AddArgs::default()
            },
            day,
        )
        .await?;
    }

    println!("\nAfter two applications");
    render_list(&tracker.records());
    println!();
    render_stats(&tracker, day);

    let rejected = add(
        &tracker,
        AddArgs {
            company: "Out Of Range Inc".to_string(),
            role: "Engineer".to_string(),
            match_score: "101".to_string(),
            ..AddArgs::default()
        },
        day,
    )
    .await;
    if let Err(err) = rejected {
        println!("\nRejected before reaching the store: {err}");
    }
    tracker.close_form();

    if let Some(export) = tracker.export_csv(day)? {
        println!("\n{} ({})", export.filename, export.mime);
        print!("{}", export.as_str());
        if let Some(dir) = export_dir {
            let path = DirectorySink::new(dir).deliver(&export)?;
            println!("Written to {}", path.display());
        }
    }

    tracker.clear_all().await?;
    println!("\nAfter clearing: {} applications", tracker.records().len());
    Ok(())
}
