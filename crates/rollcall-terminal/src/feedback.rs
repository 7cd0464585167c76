//! Operator feedback.
//!
//! Every processed card ends with a timed signal on the indicator, after
//! which the idle display for the current session state comes back. Signals
//! differ in color for multi-color lamps and in pulse count for single lamps:
//!
//! | Signal | Color | Pulses | Duration |
//! |---|---|---|---|
//! | Accepted | green | 1 | short |
//! | Duplicate | yellow | 2 | short |
//! | Error | red | 3 | short |
//! | SessionStarted | cyan | 1 | long |
//! | SessionEnded | magenta | 2 | long |
//!
//! A signal's duration is split into `2 * pulses - 1` equal slots, lit and
//! dark in turn. Indicator faults are logged and otherwise ignored; feedback
//! never fails a scan.

use std::fmt;
use std::time::Duration;

use rollcall_core::constants::{DEFAULT_LONG_SIGNAL_MS, DEFAULT_SHORT_SIGNAL_MS};
use rollcall_core::{ScanOutcome, ServerOutcome, SessionState};
use rollcall_hardware::{IndicatorDevice, LedColor};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Feedback shown for one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Accepted,
    Duplicate,
    Error,
    SessionStarted,
    SessionEnded,
}

impl Signal {
    /// Pick the signal for a scan outcome.
    pub fn for_outcome(outcome: &ScanOutcome) -> Self {
        match outcome {
            ScanOutcome::Duplicate => Signal::Duplicate,
            ScanOutcome::ReportFailed => Signal::Error,
            ScanOutcome::Reported(ServerOutcome::SessionStarted) => Signal::SessionStarted,
            ScanOutcome::Reported(ServerOutcome::SessionEnded) => Signal::SessionEnded,
            ScanOutcome::Reported(ServerOutcome::AttendanceMarked) => Signal::Accepted,
            ScanOutcome::Reported(ServerOutcome::ServerError(_)) => Signal::Error,
        }
    }

    pub fn color(self) -> LedColor {
        match self {
            Signal::Accepted => LedColor::Green,
            Signal::Duplicate => LedColor::Yellow,
            Signal::Error => LedColor::Red,
            Signal::SessionStarted => LedColor::Cyan,
            Signal::SessionEnded => LedColor::Magenta,
        }
    }

    pub fn pulses(self) -> u32 {
        match self {
            Signal::Accepted | Signal::SessionStarted => 1,
            Signal::Duplicate | Signal::SessionEnded => 2,
            Signal::Error => 3,
        }
    }

    /// Session signals use the long duration.
    pub fn is_long(self) -> bool {
        matches!(self, Signal::SessionStarted | Signal::SessionEnded)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::Accepted => "Accepted",
            Signal::Duplicate => "Duplicate",
            Signal::Error => "Error",
            Signal::SessionStarted => "SessionStarted",
            Signal::SessionEnded => "SessionEnded",
        };
        write!(f, "{}", name)
    }
}

/// Idle display for a session state.
pub fn idle_color(session: SessionState) -> LedColor {
    match session {
        SessionState::Active => LedColor::Blue,
        SessionState::Inactive => LedColor::Off,
    }
}

/// Signal durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackConfig {
    pub short: Duration,
    pub long: Duration,
}

impl FeedbackConfig {
    /// Total time a signal occupies the indicator.
    pub fn duration(&self, signal: Signal) -> Duration {
        if signal.is_long() {
            self.long
        } else {
            self.short
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            short: Duration::from_millis(DEFAULT_SHORT_SIGNAL_MS),
            long: Duration::from_millis(DEFAULT_LONG_SIGNAL_MS),
        }
    }
}

/// Renders scan signals and the idle display on an indicator.
#[derive(Debug)]
pub struct FeedbackIndicator<I: IndicatorDevice> {
    device: I,
    config: FeedbackConfig,
}

impl<I: IndicatorDevice> FeedbackIndicator<I> {
    pub fn new(device: I, config: FeedbackConfig) -> Self {
        Self { device, config }
    }

    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }

    pub fn device(&self) -> &I {
        &self.device
    }

    /// Show the signal for `outcome`, then restore the idle display for
    /// `session`.
    ///
    /// Returns once the idle display is back.
    pub async fn show(&mut self, outcome: &ScanOutcome, session: SessionState) -> Signal {
        let signal = Signal::for_outcome(outcome);
        let pulses = signal.pulses();
        let slot = self.config.duration(signal) / (2 * pulses - 1);

        debug!(%signal, pulses, ?slot, "Showing signal");

        for pulse in 0..pulses {
            if pulse > 0 {
                self.set(LedColor::Off).await;
                sleep(slot).await;
            }
            self.set(signal.color()).await;
            sleep(slot).await;
        }

        self.show_idle(session).await;
        signal
    }

    /// Show the idle display for `session`.
    pub async fn show_idle(&mut self, session: SessionState) {
        self.set(idle_color(session)).await;
    }

    async fn set(&mut self, color: LedColor) {
        if let Err(e) = self.device.set_led(color).await {
            warn!(?color, error = %e, "Indicator update failed");
        }
    }
}
