use tokio_cron_scheduler::{Job, JobScheduler};

use crate::error::AppError;
use crate::service::voice::StickyVoiceService;

/// Starts the voice audit scheduler
///
/// On every tick the audit walks the settled sticky sessions and:
/// - Hands sessions whose voice connection silently dropped to recovery
/// - Re-asserts self-mute and restarts a stopped keep-alive stream
///
/// # Arguments
/// - `service`: Sticky voice service owning the sessions
/// - `schedule`: Six-field cron expression, seconds first
pub async fn start_scheduler(service: StickyVoiceService, schedule: &str) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let service = service.clone();

        Box::pin(async move {
            let report = service.audit().await;
            if report.recovering > 0 {
                tracing::info!(
                    "Voice audit sent {} session(s) to recovery",
                    report.recovering
                );
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Voice audit scheduler started ({})", schedule);

    Ok(())
}
