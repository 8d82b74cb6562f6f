mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;

use crate::{bot::start, config::Config, error::AppError, scheduler::voice_audit};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;

    tracing::info!(
        "Starting sticky voice bot (retry ceiling {}, backoff base {})",
        config.max_reconnect_attempts,
        config.backoff_base
    );

    let (client, service) = start::init_bot(&config).await?;

    // Start voice audit scheduler
    voice_audit::start_scheduler(service, &config.voice_audit_cron).await?;

    start::start_bot(client).await
}
