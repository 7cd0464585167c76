//! Scan pipeline and polling loop for the rollcall terminal.
//!
//! This crate wires the pieces of an attendance terminal together:
//!
//! - [`Deduplicator`]: drops an immediate re-presentation of the last
//!   reported card
//! - [`SessionStateMachine`]: mirrors the service's session flag from the
//!   responses it receives
//! - [`FeedbackIndicator`]: timed signals and the idle display
//! - [`ScanPipeline`]: one card from raw UID to feedback
//! - [`Terminal`]: polls the reader and keeps at most one scan in flight
//!
//! # Example
//!
//! ```no_run
//! use rollcall_hardware::mock::{MockIndicator, MockReader};
//! use rollcall_network::{ReportClient, ReportClientConfig};
//! use rollcall_terminal::{
//!     DeviceState, FeedbackConfig, FeedbackIndicator, ScanPipeline, Terminal, TerminalConfig,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (reader, _cards) = MockReader::new();
//! let (indicator, _lamp) = MockIndicator::new();
//!
//! let pipeline = ScanPipeline::new(
//!     ReportClient::new(ReportClientConfig::default())?,
//!     FeedbackIndicator::new(indicator, FeedbackConfig::default()),
//!     DeviceState::default(),
//! );
//!
//! let mut terminal = Terminal::new(reader, pipeline, TerminalConfig::default())?;
//! let stats = terminal
//!     .run_until(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await;
//! println!("{} cards read", stats.cards_read);
//! # Ok(())
//! # }
//! ```

pub mod dedup;
pub mod feedback;
pub mod pipeline;
pub mod session;
pub mod state;
pub mod terminal;

pub use dedup::{DedupPolicy, Deduplicator};
pub use feedback::{FeedbackConfig, FeedbackIndicator, Signal, idle_color};
pub use pipeline::ScanPipeline;
pub use session::{SessionStateMachine, SessionTransition};
pub use state::DeviceState;
pub use terminal::{Terminal, TerminalConfig, TerminalStats};
