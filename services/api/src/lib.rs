mod cli;
mod infra;
mod routes;
mod server;

use screener_builder::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
