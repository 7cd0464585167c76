//! Terminal polling loop.
//!
//! The loop polls the reader on a fixed interval and hands each new card to
//! the [`ScanPipeline`]. The pipeline is moved into the running scan and only
//! comes back when the scan, its feedback and the cooldown are over, so at
//! most one scan is ever in flight. Cards read meanwhile are counted as
//! missed and dropped.
//!
//! # Shutdown
//!
//! When the shutdown future completes, polling stops at once. A scan already
//! in flight runs to completion (bounded by the request timeout, the signal
//! duration and the cooldown) before [`Terminal::run_until`] returns.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures::future::OptionFuture;
use rollcall_core::constants::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_SCAN_COOLDOWN_MS};
use rollcall_core::{Error, Result, ScanOutcome, ServerOutcome};
use rollcall_hardware::{CardReader, IndicatorDevice};
use rollcall_network::Reporter;
use serde::Serialize;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{debug, error, info, warn};

use crate::pipeline::ScanPipeline;

/// A scan in flight; resolves to the pipeline and the scan's outcome.
type ScanFuture<'a, P, I> = Pin<Box<dyn Future<Output = (ScanPipeline<P, I>, ScanOutcome)> + 'a>>;

/// Loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalConfig {
    /// Delay between reader polls
    pub poll_interval: Duration,

    /// Pause after each scan before the next card is accepted
    pub scan_cooldown: Duration,
}

impl TerminalConfig {
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the poll interval is zero.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(Error::Config("poll interval must be greater than zero".into()));
        }
        Ok(())
    }
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            scan_cooldown: Duration::from_millis(DEFAULT_SCAN_COOLDOWN_MS),
        }
    }
}

/// Per-process counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TerminalStats {
    /// Cards handed to the pipeline
    pub cards_read: u64,
    pub duplicates: u64,
    /// Scans the service answered, error statuses included
    pub reported: u64,
    pub report_failures: u64,
    pub sessions_started: u64,
    pub sessions_ended: u64,
    /// Cards read while another scan was in flight
    pub missed: u64,
    /// Times the reader entered a fault
    pub reader_faults: u64,
}

impl TerminalStats {
    fn record(&mut self, outcome: &ScanOutcome) {
        match outcome {
            ScanOutcome::Duplicate => self.duplicates += 1,
            ScanOutcome::ReportFailed => self.report_failures += 1,
            ScanOutcome::Reported(server) => {
                self.reported += 1;
                match server {
                    ServerOutcome::SessionStarted => self.sessions_started += 1,
                    ServerOutcome::SessionEnded => self.sessions_ended += 1,
                    ServerOutcome::AttendanceMarked | ServerOutcome::ServerError(_) => {}
                }
            }
        }
    }
}

/// Reader plus pipeline, driven by [`run_until`](Terminal::run_until).
pub struct Terminal<R, P, I>
where
    R: CardReader,
    P: Reporter,
    I: IndicatorDevice,
{
    reader: R,
    pipeline: Option<ScanPipeline<P, I>>,
    config: TerminalConfig,
    stats: TerminalStats,
}

impl<R, P, I> Terminal<R, P, I>
where
    R: CardReader,
    P: Reporter,
    I: IndicatorDevice,
{
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `config` is invalid.
    pub fn new(reader: R, pipeline: ScanPipeline<P, I>, config: TerminalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            reader,
            pipeline: Some(pipeline),
            config,
            stats: TerminalStats::default(),
        })
    }

    pub fn stats(&self) -> TerminalStats {
        self.stats
    }

    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    /// The pipeline, while no scan holds it.
    pub fn pipeline(&self) -> Option<&ScanPipeline<P, I>> {
        self.pipeline.as_ref()
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Run the loop until `shutdown` completes and any in-flight scan ends.
    ///
    /// Returns the counters accumulated so far. If a previous run was dropped
    /// while a scan was in flight the pipeline went with it, and this returns
    /// immediately.
    pub async fn run_until<F>(&mut self, shutdown: F) -> TerminalStats
    where
        F: Future<Output = ()>,
    {
        let Some(mut pipeline) = self.pipeline.take() else {
            error!("Scan pipeline lost by an interrupted run, terminal cannot start");
            return self.stats;
        };

        pipeline.show_idle().await;

        let mut idle = Some(pipeline);
        let mut in_flight: Option<ScanFuture<'_, P, I>> = None;

        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut reader_faulted = false;
        let mut stopping = false;

        tokio::pin!(shutdown);

        info!(
            poll_interval = ?self.config.poll_interval,
            scan_cooldown = ?self.config.scan_cooldown,
            "Terminal started"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown, if !stopping => {
                    info!(in_flight = in_flight.is_some(), "Shutdown requested, polling stopped");
                    stopping = true;
                    if in_flight.is_none() {
                        break;
                    }
                }

                Some((pipeline, outcome)) = OptionFuture::from(in_flight.as_mut()), if in_flight.is_some() => {
                    in_flight = None;
                    self.stats.record(&outcome);
                    idle = Some(pipeline);
                    if stopping {
                        break;
                    }
                }

                _ = ticker.tick(), if !stopping => {
                    let card = match self.reader.poll().await {
                        Ok(card) => {
                            if reader_faulted {
                                reader_faulted = false;
                                info!("Card reader recovered");
                            }
                            card
                        }
                        Err(e) => {
                            if !reader_faulted {
                                reader_faulted = true;
                                self.stats.reader_faults += 1;
                                error!(error = %e, "Card reader fault, still polling");
                            }
                            None
                        }
                    };

                    let Some(card) = card else { continue };

                    match idle.take() {
                        Some(pipeline) => {
                            self.stats.cards_read += 1;
                            debug!(card_type = card.card_type.name(), "Card presented");
                            in_flight = Some(Box::pin(run_scan(pipeline, card.uid, self.config.scan_cooldown)));
                        }
                        None => {
                            self.stats.missed += 1;
                            debug!(uid_len = card.uid.len(), "Card read during a scan, missed");
                        }
                    }
                }

                else => break,
            }
        }

        if idle.is_none() {
            warn!("Terminal stopped without its pipeline");
        }
        self.pipeline = idle;

        info!(stats = ?self.stats, "Terminal stopped");
        self.stats
    }
}

async fn run_scan<P, I>(
    mut pipeline: ScanPipeline<P, I>,
    uid: Vec<u8>,
    cooldown: Duration,
) -> (ScanPipeline<P, I>, ScanOutcome)
where
    P: Reporter,
    I: IndicatorDevice,
{
    let outcome = pipeline.process(&uid).await;
    sleep(cooldown).await;
    (pipeline, outcome)
}
