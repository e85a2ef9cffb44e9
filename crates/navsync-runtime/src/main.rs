//! Headless simulator for the video-synced carousel.
//!
//! Reads the page markup named by `NAVSYNC_MARKUP`, drives a simulated player
//! and takes navigation commands on stdin.

use std::error::Error;
use std::sync::Arc;

use navsync_core::clock::SystemClock;
use navsync_core::page::Page;
use navsync_core::player::Player;
use navsync_navigation::application::command_handlers::NavSync;
use navsync_runtime::config::NavConfig;
use navsync_runtime::error::AppError;
use navsync_runtime::runtime;
use navsync_runtime::sim::{LoggingPage, SimCommand, SimulatedPlayer};
use navsync_runtime::telemetry;
use navsync_timeline::markup::parse_page;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    telemetry::init();

    tracing::info!("Starting navsync simulator");

    // Read configuration from environment.
    let config = NavConfig::from_env()?;
    let markup_path = std::env::var("NAVSYNC_MARKUP")
        .map_err(|_| "NAVSYNC_MARKUP environment variable must be set")?;
    let fragment = std::env::var("NAVSYNC_FRAGMENT").unwrap_or_default();

    // Build the section timeline.
    let markup = tokio::fs::read_to_string(&markup_path)
        .await
        .map_err(AppError::from)?;
    let report = parse_page(&markup).map_err(AppError::from)?;
    for target in &report.dangling_targets {
        tracing::warn!(target = %target, "navigation trigger names no section");
    }
    tracing::info!(
        sections = report.sections.len(),
        path = %markup_path,
        "timeline loaded"
    );

    // Wire the controller.
    let page = Arc::new(LoggingPage::new(&fragment));
    let player = SimulatedPlayer::new(config.debug_mode);
    let controller = NavSync::new(
        Arc::new(report.sections),
        config.sync_settings(),
        Arc::clone(&page) as Arc<dyn Page>,
        Arc::new(SystemClock),
    );
    let ticker = player.start_ticker(config.tick_interval());
    let (handle, task) = runtime::start(
        controller,
        Some(Arc::new(player.clone()) as Arc<dyn Player>),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<SimCommand>() {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!(error = %e, "ignored input");
                continue;
            }
        };
        match command {
            SimCommand::Navigate { target, origin } => handle.navigate(target, origin)?,
            SimCommand::Fragment(fragment) => {
                page.set_fragment(&fragment);
                handle.fragment_changed()?;
            }
            SimCommand::Play => player.play().await?,
            SimCommand::Pause => player.pause().await?,
            SimCommand::View => {
                let view = handle.view().await?;
                println!("{}", serde_json::to_string_pretty(&view)?);
            }
            SimCommand::Quit => break,
        }
    }

    handle.shutdown()?;
    let controller = task.await?;
    ticker.abort();
    tracing::info!(
        active = ?controller.state().active(),
        "navsync simulator stopped"
    );

    Ok(())
}
