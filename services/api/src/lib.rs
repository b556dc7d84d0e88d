mod cli;
mod commands;
mod infra;
mod routes;
mod seed;
mod server;

use tinysteps::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
