//! Hardware device abstraction layer for the rollcall terminal.
//!
//! This crate provides trait-based abstractions for the two peripherals an
//! attendance terminal has: a contactless card reader and a visual
//! indicator. Mock implementations and physical drivers are interchangeable
//! behind the traits.
//!
//! # Design Philosophy
//!
//! - **Async-first**: device operations are native `async fn` in traits
//!   (Rust 1.90 + Edition 2024 RPITIT).
//! - **Poll-driven reader**: [`CardReader::poll`] never blocks waiting for a
//!   card, so the terminal loop stays in control of timing.
//! - **Capability indicator**: [`IndicatorDevice`] only switches colors; the
//!   caller owns patterns and durations.
//! - **Thread-safe**: all traits require `Send + Sync` for use with Tokio.
//!
//! # Card Readers
//!
//! ```no_run
//! use rollcall_hardware::traits::CardReader;
//! use rollcall_hardware::error::Result;
//!
//! async fn wait_for_card<R: CardReader>(reader: &mut R) -> Result<Vec<u8>> {
//!     loop {
//!         if let Some(card) = reader.poll().await? {
//!             return Ok(card.uid);
//!         }
//!         tokio::time::sleep(std::time::Duration::from_millis(50)).await;
//!     }
//! }
//! ```
//!
//! # Indicators
//!
//! ```no_run
//! use rollcall_hardware::traits::IndicatorDevice;
//! use rollcall_hardware::types::LedColor;
//! use rollcall_hardware::error::Result;
//!
//! async fn flash_ok<I: IndicatorDevice>(indicator: &mut I) -> Result<()> {
//!     indicator.set_led(LedColor::Green).await?;
//!     tokio::time::sleep(std::time::Duration::from_millis(700)).await;
//!     indicator.set_led(LedColor::Off).await
//! }
//! ```
//!
//! # Features
//!
//! - `hardware-pcsc`: [`PcscReader`](pcsc_reader::PcscReader) for readers behind
//!   the PC/SC service.
//!
//! [`CardReader::poll`]: traits::CardReader::poll
//! [`IndicatorDevice`]: traits::IndicatorDevice

pub mod devices;
pub mod error;
pub mod lamp;
pub mod line;
pub mod mock;
#[cfg(feature = "hardware-pcsc")]
pub mod pcsc_reader;
pub mod presence;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use devices::{AnyCardReader, AnyIndicator};
pub use error::{HardwareError, Result};
pub use presence::PresenceLatch;
pub use traits::{CardData, CardReader, CardType, IndicatorDevice, OutputLine};
pub use types::{DeviceInfo, LedColor, ReaderInfo};
