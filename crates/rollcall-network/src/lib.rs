//! Network layer for the rollcall terminal
//!
//! This crate reports scanned cards to the attendance service and waits for
//! the service to become reachable at startup.
//!
//! # Components
//!
//! - **ReportClient**: one JSON POST per reported card, bounded by a timeout
//! - **ReportPayload**: the two body shapes the service accepts
//! - **wait_for_link**: bring-up wait that retries a TCP connect forever
//! - **mock::MockReporter**: scripted reporter for tests and development
//!
//! # Example
//!
//! ```no_run
//! use rollcall_core::CardIdentifier;
//! use rollcall_network::{ReportClient, ReportClientConfig, Reporter, wait_for_link};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ReportClient::new(ReportClientConfig {
//!     endpoint: "http://10.0.0.5:5000/log-rfid".to_string(),
//!     timeout: Duration::from_millis(5000),
//!     group_id: None,
//! })?;
//!
//! wait_for_link(client.endpoint(), Duration::from_millis(800)).await?;
//!
//! let response = client.submit(&CardIdentifier::normalize(&[0xB2, 0x00])).await?;
//! println!("status {}", response.status);
//! # Ok(())
//! # }
//! ```

mod client;
mod link;
pub mod mock;
mod payload;

pub use client::{ReportClient, ReportClientConfig, ReportError, Reporter, parse_endpoint};
pub use link::wait_for_link;
pub use payload::ReportPayload;
