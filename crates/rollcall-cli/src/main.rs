//! # rollcall
//!
//! Attendance terminal: reads contactless cards, reports them to the
//! attendance service and shows the result on a lamp.
//!
//! ```bash
//! # Run with config/rollcall.toml (if present) and ROLLCALL_* overrides
//! rollcall
//!
//! # Explicit settings file
//! rollcall --config /etc/rollcall/rollcall.toml run
//!
//! # Check settings and exit
//! rollcall check
//! ```
//!
//! With the default `stdin` reader, type a card UID in hex and press enter to
//! present it.

mod devices;
mod settings;
mod stdin;
mod telemetry;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rollcall_hardware::{CardReader, IndicatorDevice};
use rollcall_network::{ReportClient, wait_for_link};
use rollcall_terminal::{DeviceState, FeedbackIndicator, ScanPipeline, Terminal};
use tokio::signal;
use tracing::{error, info};

use crate::settings::Settings;

/// RFID attendance terminal
#[derive(Parser, Debug)]
#[command(name = "rollcall")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to config/rollcall.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Run the terminal until Ctrl-C (default)
    Run,

    /// Load and check settings, print them and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Check => {
            println!("{:#?}", settings);
            Ok(())
        }
        Command::Run => run(settings).await,
    }
}

async fn run(settings: Settings) -> Result<()> {
    info!(version = rollcall_core::VERSION, "Starting rollcall");

    let client = ReportClient::new(settings.report_client_config())?;
    let indicator = devices::build_indicator(&settings.indicator)?;
    let (reader, feeder) = devices::build_reader(&settings.reader)?;

    let reader_info = reader.get_reader_info().await?;
    let indicator_info = indicator.get_info().await?;
    info!(
        reader = %reader_info.name,
        indicator = %indicator_info.name,
        endpoint = %client.endpoint(),
        group_id = ?client.group_id(),
        "Devices ready"
    );

    tokio::select! {
        reached = wait_for_link(client.endpoint(), settings.link_retry()) => {
            reached?;
        }
        _ = signal::ctrl_c() => {
            info!("Interrupted during bring-up");
            return Ok(());
        }
    }

    if let Some(handle) = feeder {
        stdin::spawn_feeder(handle);
        info!("Type a card UID in hex and press enter to present it");
    }

    let pipeline = ScanPipeline::new(
        client,
        FeedbackIndicator::new(indicator, settings.feedback_config()),
        DeviceState::new(settings.terminal.dedup),
    );
    let mut terminal = Terminal::new(reader, pipeline, settings.terminal_config())?;

    let stats = terminal
        .run_until(async {
            if let Err(e) = signal::ctrl_c().await {
                error!(error = %e, "Cannot listen for Ctrl-C, running until killed");
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!(
        cards_read = stats.cards_read,
        reported = stats.reported,
        duplicates = stats.duplicates,
        report_failures = stats.report_failures,
        missed = stats.missed,
        "Shutdown complete"
    );
    Ok(())
}
