//! Cron scheduler for the periodic offline sweep.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{error, info, warn};

use labhub_core::config::worker::WorkerConfig;
use labhub_core::error::AppError;
use labhub_service::heartbeat::OfflineMonitor;

/// Cron-based scheduler wrapping the offline sweep.
///
/// Ticks never overlap: a tick that finds the previous sweep still
/// running logs and returns instead of queueing behind it.
pub struct SweepScheduler {
    scheduler: JobScheduler,
    monitor: Arc<OfflineMonitor>,
    guard: Arc<Mutex<()>>,
    config: WorkerConfig,
}

impl std::fmt::Debug for SweepScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepScheduler").finish()
    }
}

impl SweepScheduler {
    /// Create a new scheduler.
    pub async fn new(monitor: Arc<OfflineMonitor>, config: WorkerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;
        Ok(Self {
            scheduler,
            monitor,
            guard: Arc::new(Mutex::new(())),
            config,
        })
    }

    /// Register the sweep schedule and start ticking.
    pub async fn start(&self) -> Result<(), AppError> {
        if !self.config.enabled {
            info!("Worker disabled, offline sweep not scheduled");
            return Ok(());
        }

        let monitor = Arc::clone(&self.monitor);
        let guard = Arc::clone(&self.guard);
        let job = CronJob::new_async(
            self.config.offline_sweep_schedule.as_str(),
            move |_uuid, _lock| {
                let monitor = Arc::clone(&monitor);
                let guard = Arc::clone(&guard);
                Box::pin(async move {
                    run_guarded_sweep(&monitor, &guard).await;
                })
            },
        )
        .map_err(|e| AppError::internal(format!("Failed to create sweep schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add sweep schedule: {e}")))?;
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!(
            schedule = %self.config.offline_sweep_schedule,
            "Offline sweep scheduled"
        );
        Ok(())
    }

    /// Shut the scheduler down.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;
        info!("Sweep scheduler shut down");
        Ok(())
    }
}

/// One scheduler tick: run the sweep unless one is still in flight.
async fn run_guarded_sweep(monitor: &OfflineMonitor, guard: &Mutex<()>) {
    let Ok(_permit) = guard.try_lock() else {
        warn!("Previous offline sweep still running, skipping tick");
        return;
    };
    if let Err(e) = monitor.sweep().await {
        error!(error = %e, "Offline sweep failed");
    }
}
