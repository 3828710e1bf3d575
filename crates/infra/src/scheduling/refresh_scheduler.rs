//! Periodic refresh scheduler.
//!
//! Registers one repeated job that drives a [`RefreshJob`] at a fixed
//! interval. Every async lifecycle step is bounded by a timeout and the
//! monitor task is cancelled explicitly on stop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use harvest_core::ReconciliationService;
use harvest_domain::{HarvestError, RefreshConfig};
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Work performed on every tick.
#[async_trait]
pub trait RefreshJob: Send + Sync {
    async fn run(&self) -> Result<(), HarvestError>;
}

#[async_trait]
impl RefreshJob for ReconciliationService {
    async fn run(&self) -> Result<(), HarvestError> {
        let outcome = self.refresh_once().await;
        match outcome.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Configuration for the refresh scheduler.
#[derive(Debug, Clone)]
pub struct RefreshSchedulerConfig {
    /// Delay between two refresh runs.
    pub interval: Duration,
    /// Timeout applied to a single refresh.
    pub job_timeout: Duration,
    pub start_timeout: Duration,
    pub stop_timeout: Duration,
    /// Timeout for awaiting the monitor task join handle.
    pub join_timeout: Duration,
}

impl Default for RefreshSchedulerConfig {
    fn default() -> Self {
        Self::from(&RefreshConfig::default())
    }
}

impl From<&RefreshConfig> for RefreshSchedulerConfig {
    fn from(config: &RefreshConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_seconds),
            job_timeout: Duration::from_secs(config.job_timeout_seconds),
            start_timeout: Duration::from_secs(5),
            stop_timeout: Duration::from_secs(5),
            join_timeout: Duration::from_secs(5),
        }
    }
}

/// Refresh scheduler with explicit lifecycle management.
///
/// The underlying job scheduler is created on each start so the instance
/// can be restarted after a stop.
pub struct RefreshScheduler {
    scheduler: Option<JobScheduler>,
    config: RefreshSchedulerConfig,
    job_id: Option<Uuid>,
    monitor_handle: Option<JoinHandle<()>>,
    cancellation: CancellationToken,
    job: Arc<dyn RefreshJob>,
}

impl RefreshScheduler {
    /// Create a scheduler for `job`.
    ///
    /// # Errors
    /// Returns [`SchedulerError::InvalidInterval`] for a zero interval.
    pub fn new(config: RefreshSchedulerConfig, job: Arc<dyn RefreshJob>) -> SchedulerResult<Self> {
        if config.interval.is_zero() {
            return Err(SchedulerError::InvalidInterval(config.interval));
        }
        Ok(Self {
            scheduler: None,
            config,
            job_id: None,
            monitor_handle: None,
            cancellation: CancellationToken::new(),
            job,
        })
    }

    pub fn config(&self) -> &RefreshSchedulerConfig {
        &self.config
    }

    /// Identifier of the registered job while running.
    pub fn job_id(&self) -> Option<Uuid> {
        self.job_id
    }

    /// Start the scheduler, spawning the monitoring task.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.cancellation = CancellationToken::new();

        let scheduler = JobScheduler::new()
            .await
            .map_err(|source| SchedulerError::CreationFailed { source })?;
        let job_id = self.register_refresh_job(&scheduler).await?;

        let start_timeout = self.config.start_timeout;
        tokio::time::timeout(start_timeout, scheduler.start())
            .await
            .map_err(|source| SchedulerError::Timeout { duration: start_timeout, source })?
            .map_err(|source| SchedulerError::StartFailed { source })?;

        let cancel = self.cancellation.clone();
        self.monitor_handle = Some(tokio::spawn(Self::monitor_task(cancel)));
        self.scheduler = Some(scheduler);
        self.job_id = Some(job_id);

        info!(interval_secs = self.config.interval.as_secs(), "Refresh scheduler started");
        Ok(())
    }

    /// Stop the scheduler and wait for the monitor task to finish.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        self.cancellation.cancel();

        if let Some(mut scheduler) = self.scheduler.take() {
            let stop_timeout = self.config.stop_timeout;
            tokio::time::timeout(stop_timeout, scheduler.shutdown())
                .await
                .map_err(|source| SchedulerError::Timeout { duration: stop_timeout, source })?
                .map_err(|source| SchedulerError::StopFailed { source })?;
        }

        if let Some(handle) = self.monitor_handle.take() {
            let join_timeout = self.config.join_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|source| SchedulerError::Timeout { duration: join_timeout, source })??;
        }

        self.job_id = None;
        info!("Refresh scheduler stopped");
        Ok(())
    }

    /// Returns true when the monitor task is active.
    pub fn is_running(&self) -> bool {
        self.monitor_handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    async fn register_refresh_job(&self, scheduler: &JobScheduler) -> SchedulerResult<Uuid> {
        let job = self.job.clone();
        let job_timeout = self.config.job_timeout;

        let job_definition = Job::new_repeated_async(self.config.interval, move |_id, _lock| {
            let job = job.clone();

            Box::pin(async move {
                let started = Instant::now();
                match tokio::time::timeout(job_timeout, job.run()).await {
                    Ok(Ok(())) => {
                        debug!(elapsed_ms = started.elapsed().as_millis(), "Refresh finished");
                    }
                    Ok(Err(err)) => {
                        error!(error = %err, kind = err.label(), "Refresh failed");
                    }
                    Err(_) => {
                        warn!(timeout_secs = job_timeout.as_secs(), "Refresh timed out");
                    }
                }
            })
        })
        .map_err(|source| SchedulerError::JobRegistrationFailed { source })?;

        let job_id = scheduler
            .add(job_definition)
            .await
            .map_err(|source| SchedulerError::JobRegistrationFailed { source })?;

        debug!(interval = ?self.config.interval, %job_id, "Registered refresh job");
        Ok(job_id)
    }

    async fn monitor_task(cancel: CancellationToken) {
        cancel.cancelled().await;
        debug!("Refresh scheduler monitor cancelled");
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("RefreshScheduler dropped while running; cancelling tasks");
            self.cancellation.cancel();
        }
    }
}
