//! Command handlers behind the `harvest` sub-commands

use std::time::Instant;

use harvest_core::{PauseOutcome, RefreshOutcome};
use harvest_infra::{RefreshScheduler, RefreshSchedulerConfig};
use tracing::{info, warn};

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// Run one reconciliation cycle.
pub async fn refresh(ctx: &AppContext) -> RefreshOutcome {
    let started = Instant::now();
    let outcome = ctx.service.refresh_once().await;
    log_command_execution("refresh", started.elapsed(), outcome.is_success());
    outcome
}

/// Pause (`true`) or resume (`false`) the next delivery.
///
/// Unsupported providers return [`PauseOutcome::Unsupported`] without any
/// upstream call.
pub async fn set_paused(ctx: &AppContext, pause: bool) -> PauseOutcome {
    let started = Instant::now();
    let outcome = ctx.service.change_pause_state(pause).await;
    let command = if pause { "pause" } else { "unpause" };
    log_command_execution(command, started.elapsed(), outcome.is_applied());
    outcome
}

/// Refresh now, then on every interval until Ctrl-C.
///
/// # Errors
/// Returns scheduler lifecycle errors or a failure to listen for the signal.
pub async fn run(ctx: &AppContext) -> anyhow::Result<()> {
    let first = refresh(ctx).await;
    if let Some(err) = &first.error {
        warn!(error = %err, "Initial refresh failed; the scheduler will retry");
    }

    let config = RefreshSchedulerConfig::from(&ctx.config.refresh);
    let mut scheduler = RefreshScheduler::new(config, ctx.service.clone())?;
    scheduler.start().await?;
    info!(interval_secs = ctx.config.refresh.interval_seconds, "Harvest running; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");

    scheduler.stop().await?;
    Ok(())
}
