mod cli;
mod commands;
mod demo;
mod prompt;

use job_tracker::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
