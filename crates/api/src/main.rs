//! Harvest - next-delivery reconciliation for grocery-box subscriptions
//!
//! Main entry point for the `harvest` binary.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use harvest_app::utils::logging::init_logging;
use harvest_app::{commands, AppContext};
use harvest_infra::config;

#[derive(Parser, Debug)]
#[command(name = "harvest", version, about = "Grocery-box delivery reconciler")]
struct Cli {
    /// Config file (JSON or TOML); defaults to environment then standard paths
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Default)]
enum Command {
    /// Refresh now and then periodically until Ctrl-C (default)
    #[default]
    Run,

    /// Run one refresh cycle and print the result as JSON
    Refresh,

    /// Pause the week of the next delivery
    Pause,

    /// Remove the pause covering the next delivery
    Unpause,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Ok(path) = dotenvy::dotenv() {
        eprintln!("Loaded environment from {}", path.display());
    }

    let app_config = match cli.config {
        Some(path) => config::load_from_file(Some(path)),
        None => config::load(),
    }
    .context("loading configuration")?;

    init_logging(&app_config.logging)?;

    let ctx = AppContext::new(app_config).context("initialising application")?;

    let code = match cli.command.unwrap_or_default() {
        Command::Run => {
            commands::run(&ctx).await?;
            ExitCode::SUCCESS
        }
        Command::Refresh => {
            let outcome = commands::refresh(&ctx).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            exit_code(outcome.is_success())
        }
        Command::Pause => change_pause_state(&ctx, true).await,
        Command::Unpause => change_pause_state(&ctx, false).await,
    };

    if let Err(err) = ctx.shutdown().await {
        tracing::warn!(error = %err, "Failed to close upstream session");
    }
    Ok(code)
}

async fn change_pause_state(ctx: &AppContext, pause: bool) -> ExitCode {
    let outcome = commands::set_paused(ctx, pause).await;
    println!("{outcome}");
    exit_code(outcome.is_applied())
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
