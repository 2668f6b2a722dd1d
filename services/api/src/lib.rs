mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use grant_classifier::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
