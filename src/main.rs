//! f1sync - F1 Fantasy roster sync
//!
//! Main entry point for the f1sync CLI.

mod app;
mod cli;
mod commands;

use std::path::Path;

use clap::Parser;
use tracing::{debug, error};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app::App;
use crate::cli::{Cli, Commands};

/// Initialize tracing with console and file output.
///
/// Log files go to `{state_dir}/logs/` with daily rotation.
fn init_tracing(state_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = state_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("f1sync")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keep the writer alive for the whole run.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Stdout carries command output, logs go to stderr.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let app = App::load(&cli.config, cli.state_dir)?;
    init_tracing(app.state_dir())?;
    debug!("Config: {:?}", app.config);
    app.validate()?;

    let result = match cli.command {
        Commands::Budget {
            team_id,
            out,
            write_state,
            browser,
        } => commands::budget(&app, team_id, out, write_state, &browser).await,
        Commands::Optimal {
            budget,
            team_id,
            url,
            ideal_out,
            boost_driver_override,
            browser,
        } => {
            commands::optimal(
                &app,
                budget,
                team_id,
                url,
                &ideal_out,
                boost_driver_override,
                &browser,
            )
            .await
        }
        Commands::Plan { ideal, observed } => {
            commands::plan(&app, &ideal, observed.as_deref()).await
        }
        Commands::Sync {
            ideal,
            team_id,
            expected_team_name,
            no_apply,
            force,
            browser,
        } => {
            commands::sync(
                &app,
                &ideal,
                team_id,
                expected_team_name,
                !no_apply,
                force,
                &browser,
            )
            .await
        }
        Commands::Run {
            budget,
            team_id,
            expected_team_name,
            apply,
            force,
            url,
            boost_driver_override,
            out,
            browser,
        } => {
            commands::run(
                &app,
                budget,
                team_id,
                expected_team_name,
                apply,
                force,
                url,
                boost_driver_override,
                out,
                &browser,
            )
            .await
        }
    };

    if let Err(e) = &result {
        error!("{}", e);
    }
    result
}
