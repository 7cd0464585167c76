//! Hardware device trait definitions.
//!
//! This module defines the contract between the scan pipeline and the
//! terminal's peripherals: the contactless card reader that is polled for
//! new cards, and the indicator that renders operator feedback. Mock and
//! physical implementations are interchangeable behind these traits.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use rollcall_core::constants::MAX_UID_LENGTH;

use crate::error::Result;
use crate::types::{DeviceInfo, LedColor, ReaderInfo};

/// Contactless card type identification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardType {
    /// Mifare Classic 1K (1024 bytes).
    MifareClassic1K,

    /// Mifare Classic 4K (4096 bytes).
    MifareClassic4K,

    /// Mifare Ultralight (64 bytes).
    MifareUltralight,

    /// Unknown card type with ATR bytes, if the reader provided any.
    Unknown(Vec<u8>),
}

impl CardType {
    /// Get a human-readable name for the card type.
    pub fn name(&self) -> &str {
        match self {
            Self::MifareClassic1K => "Mifare Classic 1K",
            Self::MifareClassic4K => "Mifare Classic 4K",
            Self::MifareUltralight => "Mifare Ultralight",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Check if this is a known card type.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Identify a storage card from its PC/SC ATR.
    ///
    /// Contactless readers following PC/SC part 3 synthesize a 20-byte ATR
    /// whose bytes 13-14 hold the card name (`00 01` Classic 1K, `00 02`
    /// Classic 4K, `00 03` Ultralight). Anything else is kept as unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// use rollcall_hardware::traits::CardType;
    ///
    /// let atr = [
    ///     0x3B, 0x8F, 0x80, 0x01, 0x80, 0x4F, 0x0C, 0xA0, 0x00, 0x00,
    ///     0x03, 0x06, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x6A,
    /// ];
    /// assert_eq!(CardType::from_atr(&atr), CardType::MifareClassic1K);
    /// ```
    pub fn from_atr(atr: &[u8]) -> Self {
        const RID_PCSC: [u8; 5] = [0xA0, 0x00, 0x00, 0x03, 0x06];

        if atr.len() < 15 || atr[7..12] != RID_PCSC {
            return Self::Unknown(atr.to_vec());
        }

        match (atr[13], atr[14]) {
            (0x00, 0x01) => Self::MifareClassic1K,
            (0x00, 0x02) => Self::MifareClassic4K,
            (0x00, 0x03) => Self::MifareUltralight,
            _ => Self::Unknown(atr.to_vec()),
        }
    }
}

/// Card data delivered by a reader.
///
/// Contains the raw unique identifier (UID), the detected card type and
/// the moment the card was read.
#[derive(Debug, Clone)]
pub struct CardData {
    /// Card unique identifier (1-10 bytes).
    pub uid: Vec<u8>,

    /// Card type identification.
    pub card_type: CardType,

    /// Timestamp when the card was read.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl CardData {
    /// Create new card data with the current timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the UID is empty or longer than 10 bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use rollcall_hardware::traits::{CardData, CardType};
    ///
    /// let card = CardData::new(vec![0x04, 0xAB, 0xCD, 0xEF], CardType::MifareClassic1K).unwrap();
    /// assert_eq!(card.uid.len(), 4);
    /// ```
    pub fn new(uid: Vec<u8>, card_type: CardType) -> Result<Self> {
        CardDataBuilder::new(uid, card_type).build()
    }

    /// Create a builder for constructing card data with optional fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use rollcall_hardware::traits::{CardData, CardType};
    /// use chrono::{Utc, TimeZone};
    ///
    /// let read_at = Utc.with_ymd_and_hms(2025, 1, 15, 12, 30, 0).unwrap();
    /// let card = CardData::builder(vec![0x04, 0xA1], CardType::Unknown(vec![]))
    ///     .timestamp(read_at)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(card.timestamp, read_at);
    /// ```
    pub fn builder(uid: Vec<u8>, card_type: CardType) -> CardDataBuilder {
        CardDataBuilder::new(uid, card_type)
    }
}

/// Builder for constructing CardData with optional fields.
#[derive(Debug, Clone)]
pub struct CardDataBuilder {
    uid: Vec<u8>,
    card_type: CardType,
    timestamp: Option<chrono::DateTime<chrono::Utc>>,
}

impl CardDataBuilder {
    pub fn new(uid: Vec<u8>, card_type: CardType) -> Self {
        Self {
            uid,
            card_type,
            timestamp: None,
        }
    }

    /// Set a custom timestamp for the card read event.
    ///
    /// If not set, the current time will be used when build() is called.
    pub fn timestamp(mut self, timestamp: chrono::DateTime<chrono::Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Build the CardData instance with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the UID is empty or longer than `MAX_UID_LENGTH`.
    pub fn build(self) -> Result<CardData> {
        if self.uid.is_empty() {
            return Err(crate::HardwareError::invalid_data(
                "Card UID cannot be empty",
            ));
        }

        if self.uid.len() > MAX_UID_LENGTH {
            return Err(crate::HardwareError::invalid_data(format!(
                "Card UID length must be at most {} bytes, got {}",
                MAX_UID_LENGTH,
                self.uid.len()
            )));
        }

        Ok(CardData {
            uid: self.uid,
            card_type: self.card_type,
            timestamp: self.timestamp.unwrap_or_else(chrono::Utc::now),
        })
    }
}

/// Contactless card reader abstraction.
///
/// The reader is polled; it never blocks waiting for a card.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generic type parameters, or the enum wrapper
/// [`AnyCardReader`](crate::devices::AnyCardReader) for dispatch chosen at
/// runtime.
///
/// # Examples
///
/// ```no_run
/// use rollcall_hardware::traits::CardReader;
/// use rollcall_hardware::error::Result;
///
/// async fn next_uid<R: CardReader>(reader: &mut R) -> Result<Option<Vec<u8>>> {
///     Ok(reader.poll().await?.map(|card| card.uid))
/// }
/// ```
pub trait CardReader: Send + Sync {
    /// Check the antenna for a newly presented card.
    ///
    /// Returns `Ok(None)` when no new card is present, and also when a card
    /// is present but could not be read completely; such a frame is dropped
    /// and not retried within the same poll. A card is delivered once per
    /// presentation and must be removed and presented again to be read again.
    ///
    /// # Errors
    ///
    /// Returns an error only for device-level faults:
    /// - The device is disconnected
    /// - The reader service or bus failed
    async fn poll(&mut self) -> Result<Option<CardData>>;

    /// Get reader information.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader cannot be queried.
    async fn get_reader_info(&self) -> Result<ReaderInfo>;
}

/// Visual indicator abstraction.
///
/// An indicator shows one color at a time. Timing and patterns are decided
/// by the caller; the device only switches its outputs.
///
/// For dynamic dispatch use [`AnyIndicator`](crate::devices::AnyIndicator).
pub trait IndicatorDevice: Send + Sync {
    /// Show a color, replacing whatever was shown before.
    ///
    /// # Errors
    ///
    /// Returns an error if an output could not be driven.
    async fn set_led(&mut self, color: LedColor) -> Result<()>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be queried.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// A single on/off output driving one lamp segment.
pub trait OutputLine: Send + Sync {
    /// Switch the output; `true` lights the lamp regardless of wiring polarity.
    ///
    /// # Errors
    ///
    /// Returns an error if the output could not be written.
    fn set_active(&mut self, active: bool) -> Result<()>;
}
