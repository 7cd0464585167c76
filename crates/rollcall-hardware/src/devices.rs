//! Enum wrappers for hardware device dispatch.
//!
//! Native `async fn` in traits (RPITIT, Edition 2024) are not object-safe,
//! so `Box<dyn CardReader>` is not available. The terminal picks its reader
//! and indicator from configuration at startup; these enums give that
//! runtime choice a concrete type while keeping static dispatch.
//!
//! # Examples
//!
//! ```
//! use rollcall_hardware::devices::{AnyCardReader, AnyIndicator};
//! use rollcall_hardware::lamp::LogIndicator;
//! use rollcall_hardware::mock::MockReader;
//!
//! let (reader, _handle) = MockReader::new();
//! let reader = AnyCardReader::Mock(reader);
//! let indicator = AnyIndicator::Log(LogIndicator::default());
//! ```

use crate::lamp::{LogIndicator, SingleLamp, TriStateLamp};
use crate::line::SysfsLine;
use crate::mock::{MockIndicator, MockReader};
use crate::traits::{CardReader, IndicatorDevice};
use crate::{CardData, DeviceInfo, LedColor, ReaderInfo, Result};

/// Enum wrapper for card reader dispatch.
#[non_exhaustive]
pub enum AnyCardReader {
    /// Channel-driven reader for development and testing.
    Mock(MockReader),

    /// Reader attached through the PC/SC service.
    #[cfg(feature = "hardware-pcsc")]
    Pcsc(crate::pcsc_reader::PcscReader),
}

impl CardReader for AnyCardReader {
    async fn poll(&mut self) -> Result<Option<CardData>> {
        match self {
            Self::Mock(device) => device.poll().await,
            #[cfg(feature = "hardware-pcsc")]
            Self::Pcsc(device) => device.poll().await,
        }
    }

    async fn get_reader_info(&self) -> Result<ReaderInfo> {
        match self {
            Self::Mock(device) => device.get_reader_info().await,
            #[cfg(feature = "hardware-pcsc")]
            Self::Pcsc(device) => device.get_reader_info().await,
        }
    }
}

/// Enum wrapper for indicator dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyIndicator {
    /// Recording indicator for tests.
    Mock(MockIndicator),

    /// Headless, log-only indicator.
    Log(LogIndicator),

    /// One lamp on a GPIO line.
    Single(SingleLamp<SysfsLine>),

    /// Positive/negative/session lamps on three GPIO lines.
    TriState(TriStateLamp<SysfsLine>),
}

impl IndicatorDevice for AnyIndicator {
    async fn set_led(&mut self, color: LedColor) -> Result<()> {
        match self {
            Self::Mock(device) => device.set_led(color).await,
            Self::Log(device) => device.set_led(color).await,
            Self::Single(device) => device.set_led(color).await,
            Self::TriState(device) => device.set_led(color).await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
            Self::Log(device) => device.get_info().await,
            Self::Single(device) => device.get_info().await,
            Self::TriState(device) => device.get_info().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_reader_dispatch() {
        let (reader, mut handle) = MockReader::new();
        let mut any_reader = AnyCardReader::Mock(reader);

        handle.present_card(vec![0x04, 0xA1]).await.unwrap();
        let card = any_reader.poll().await.unwrap().unwrap();
        assert_eq!(card.uid, vec![0x04, 0xA1]);

        let info = any_reader.get_reader_info().await.unwrap();
        assert_eq!(info.name, "Mock Card Reader");
    }

    #[tokio::test]
    async fn test_any_indicator_dispatch() {
        let (indicator, handle) = MockIndicator::new();
        let mut any_indicator = AnyIndicator::Mock(indicator);

        any_indicator.set_led(LedColor::Green).await.unwrap();
        assert_eq!(handle.current(), LedColor::Green);
    }

    #[tokio::test]
    async fn test_any_indicator_sysfs_lamp() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let line = SysfsLine::open(file.path(), true).unwrap();
        let mut any_indicator = AnyIndicator::Single(SingleLamp::new(line));

        any_indicator.set_led(LedColor::Red).await.unwrap();
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "0");

        any_indicator.set_led(LedColor::Off).await.unwrap();
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "1");
    }
}
