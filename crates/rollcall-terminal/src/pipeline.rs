//! One card, end to end.
//!
//! ```text
//! raw UID ─> normalize ─> dedup ─┬─> submit ─> session ─> feedback
//!                                └─> (duplicate) ──────────> feedback
//! ```

use rollcall_core::{CardIdentifier, ScanOutcome};
use rollcall_hardware::IndicatorDevice;
use rollcall_network::Reporter;
use tracing::{debug, info, warn};

use crate::feedback::FeedbackIndicator;
use crate::state::DeviceState;

/// Processes presented cards against the service and the indicator.
///
/// # Examples
///
/// ```
/// use rollcall_core::{ScanOutcome, ServerOutcome, SessionState};
/// use rollcall_hardware::mock::MockIndicator;
/// use rollcall_network::mock::MockReporter;
/// use rollcall_terminal::{DeviceState, FeedbackConfig, FeedbackIndicator, ScanPipeline};
///
/// #[tokio::main]
/// async fn main() {
///     let (reporter, service) = MockReporter::new();
///     let (indicator, _lamp) = MockIndicator::new();
///     let mut pipeline = ScanPipeline::new(
///         reporter,
///         FeedbackIndicator::new(indicator, FeedbackConfig::default()),
///         DeviceState::default(),
///     );
///
///     service.respond(201, "Admin session started successfully.");
///     let outcome = pipeline.process(&[0x04, 0xA1]).await;
///
///     assert_eq!(outcome, ScanOutcome::Reported(ServerOutcome::SessionStarted));
///     assert_eq!(pipeline.state().session_state(), SessionState::Active);
/// }
/// ```
#[derive(Debug)]
pub struct ScanPipeline<P: Reporter, I: IndicatorDevice> {
    reporter: P,
    feedback: FeedbackIndicator<I>,
    state: DeviceState,
}

impl<P: Reporter, I: IndicatorDevice> ScanPipeline<P, I> {
    pub fn new(reporter: P, feedback: FeedbackIndicator<I>, state: DeviceState) -> Self {
        Self {
            reporter,
            feedback,
            state,
        }
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn reporter(&self) -> &P {
        &self.reporter
    }

    pub fn feedback(&self) -> &FeedbackIndicator<I> {
        &self.feedback
    }

    /// Process one presented card and show its signal.
    ///
    /// Never fails: transport and service errors become outcomes and the
    /// error signal.
    pub async fn process(&mut self, raw: &[u8]) -> ScanOutcome {
        let id = CardIdentifier::normalize(raw);
        let outcome = self.evaluate(&id).await;

        let signal = self
            .feedback
            .show(&outcome, self.state.session_state())
            .await;

        info!(uid = %id, %outcome, %signal, session = %self.state.session_state(), "Scan processed");
        outcome
    }

    /// Show the idle display for the current session state.
    pub async fn show_idle(&mut self) {
        let session = self.state.session_state();
        self.feedback.show_idle(session).await;
    }

    async fn evaluate(&mut self, id: &CardIdentifier) -> ScanOutcome {
        if !self.state.dedup.should_report(id) {
            debug!(uid = %id, "Duplicate scan suppressed");
            return ScanOutcome::Duplicate;
        }

        match self.reporter.submit(id).await {
            Ok(response) => {
                self.state.dedup.mark_reported(id.clone());

                let outcome = self.state.session.apply(&response);
                if outcome.is_error() {
                    warn!(uid = %id, status = response.status, body = %response.body, "Scan rejected by service");
                }
                ScanOutcome::Reported(outcome)
            }
            Err(e) => {
                warn!(uid = %id, error = %e, "Report failed");
                ScanOutcome::ReportFailed
            }
        }
    }
}
