use std::sync::Arc;

use chrono::{Local, NaiveDate};
use job_tracker::applications::{
    ApplicationGateway, ApplicationId, ApplicationRecord, ApplicationTracker, ConfirmationPrompt,
    DirectorySink, DraftEdit, ExportSink, MutationOutcome,
};
use job_tracker::error::AppError;
use tracing::info;

use crate::cli::{AddArgs, StoreCommand};
use crate::prompt::TerminalPrompt;

pub(crate) async fn run<G>(command: StoreCommand, gateway: Arc<G>) -> Result<(), AppError>
where
    G: ApplicationGateway + 'static,
{
    let assume_yes = match &command {
        StoreCommand::Delete(args) => args.yes,
        StoreCommand::Clear(args) => args.yes,
        _ => false,
    };
    let tracker = ApplicationTracker::new(gateway, Arc::new(TerminalPrompt::new(assume_yes)));
    tracker.refresh().await?;

    match command {
        StoreCommand::List(args) => {
            let records = tracker.records();
            if args.json {
                let json = serde_json::to_string_pretty(records.as_slice())
                    .map_err(std::io::Error::from)?;
                println!("{json}");
            } else {
                render_list(&records);
            }
        }
        StoreCommand::Add(args) => {
            add(&tracker, args, today()).await?;
            println!("Application saved. {} on record.", tracker.records().len());
        }
        StoreCommand::Delete(args) => {
            let id = ApplicationId(args.id);
            report_outcome(tracker.delete(&id).await?, "Application deleted.");
        }
        StoreCommand::Clear(_) => {
            report_outcome(tracker.clear_all().await?, "All applications deleted.");
        }
        StoreCommand::Stats(args) => {
            render_stats(&tracker, args.today.unwrap_or_else(today));
        }
        StoreCommand::Export(args) => {
            let export_date = args.today.unwrap_or_else(today);
            match tracker.export_csv(export_date)? {
                Some(export) => {
                    let path = DirectorySink::new(&args.dir).deliver(&export)?;
                    info!(path = %path.display(), bytes = export.bytes.len(), "export written");
                    println!("Exported {} applications to {}", tracker.records().len(), path.display());
                }
                None => println!("No applications to export."),
            }
        }
    }

    Ok(())
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Fill the creation form from command-line flags and submit it.
pub(crate) async fn add<G, C>(
    tracker: &ApplicationTracker<G, C>,
    args: AddArgs,
    today: NaiveDate,
) -> Result<(), AppError>
where
    G: ApplicationGateway + ?Sized,
    C: ConfirmationPrompt + ?Sized,
{
    let AddArgs {
        company,
        role,
        match_score,
        date,
        status,
        followup,
        salary,
        tags,
        link,
        notes,
    } = args;

    tracker.open_form(today);
    let mut edits = vec![
        DraftEdit::Company(company),
        DraftEdit::Role(role),
        DraftEdit::MatchScore(match_score),
    ];
    edits.extend(date.map(DraftEdit::Date));
    edits.extend(status.map(DraftEdit::Status));
    edits.extend(followup.map(DraftEdit::Followup));
    edits.extend(salary.map(DraftEdit::Salary));
    edits.extend(tags.map(DraftEdit::Tags));
    edits.extend(link.map(DraftEdit::Link));
    edits.extend(notes.map(DraftEdit::Notes));

    for edit in edits {
        tracker.edit_draft(edit)?;
    }
    tracker.submit().await?;
    Ok(())
}

fn report_outcome(outcome: MutationOutcome, applied: &str) {
    match outcome {
        MutationOutcome::Applied => println!("{applied}"),
        MutationOutcome::Declined => println!("Cancelled; nothing was changed."),
    }
}

pub(crate) fn render_list(records: &[ApplicationRecord]) {
    if records.is_empty() {
        println!("No applications yet.");
        return;
    }

    println!(
        "{:<12} {:<10} {:<24} {:<28} {:>5} {:<12} {:<10}",
        "ID", "Date", "Company", "Role", "Match", "Status", "Follow-up"
    );
    for record in records {
        println!(
            "{:<12} {:<10} {:<24} {:<28} {:>5} {:<12} {:<10}",
            record.id.as_str(),
            record.date.to_string(),
            truncate(&record.company, 24),
            truncate(&record.role, 28),
            record.match_score,
            record.status.label(),
            record
                .followup
                .map(|date| date.to_string())
                .unwrap_or_default(),
        );
    }
}

pub(crate) fn render_stats<G, C>(tracker: &ApplicationTracker<G, C>, today: NaiveDate)
where
    G: ApplicationGateway + ?Sized,
    C: ConfirmationPrompt + ?Sized,
{
    let stats = tracker.stats();
    println!("Applications:   {}", stats.total);
    println!("Interviews:     {}", stats.interviews);
    println!("Response rate:  {}%", stats.response_rate);
    println!("Average match:  {}%", stats.avg_match);

    println!("\nBy status");
    for entry in tracker.status_breakdown() {
        println!("  {:<12} {}", entry.status_label, entry.count);
    }

    let due = tracker.followups_due(today);
    if !due.is_empty() {
        println!("\nFollow-ups due by {today}");
        for record in due {
            let followup = record
                .followup
                .map(|date| date.to_string())
                .unwrap_or_default();
            println!("  {followup}  {} ({})", record.company, record.role);
        }
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut shortened: String = value.chars().take(width.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}
