use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler};

use crate::schedule::ScheduleService;

/// Keeps the grid cache warm by loading every timetable document on a cron
/// schedule, so that the first teacher search after expiry is not cold.
pub struct PrefetchService {
    schedule: Arc<ScheduleService>,
    scheduler: JobScheduler,
}

impl PrefetchService {
    pub async fn new(schedule: Arc<ScheduleService>) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;
        Ok(Self { schedule, scheduler })
    }

    /// Registers the job for `cron` (six fields, seconds first) and starts
    /// the scheduler.
    pub async fn start(&mut self, cron: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let schedule = self.schedule.clone();

        let job = Job::new_async(cron, move |_uuid, _l| {
            let schedule = schedule.clone();
            Box::pin(async move {
                let report = schedule.prefetch_all().await;
                if report.failed > 0 {
                    tracing::warn!("Prefetch could not load {} document(s)", report.failed);
                }
            })
        })?;

        self.scheduler.add(job).await?;
        self.scheduler.start().await?;

        tracing::info!("Prefetch service started with schedule '{}'", cron);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        Ok(())
    }
}
