//! Mock card reader implementation for testing and development.
//!
//! This module provides a simulated contactless reader that can be driven
//! programmatically, without a physical antenna.

use crate::{
    Result,
    traits::{CardData, CardReader, CardType},
    types::ReaderInfo,
};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::debug;

/// Mock card reader for testing and development.
///
/// Each presentation made through the [`MockReaderHandle`] is delivered by
/// exactly one [`poll`](CardReader::poll). Dropping every handle disconnects
/// the reader.
///
/// # Examples
///
/// ```
/// use rollcall_hardware::mock::MockReader;
/// use rollcall_hardware::traits::CardReader;
///
/// #[tokio::main]
/// async fn main() -> rollcall_hardware::Result<()> {
///     let (mut reader, mut handle) = MockReader::new();
///
///     assert!(reader.poll().await?.is_none());
///
///     handle.present_card(vec![0x04, 0xA1]).await?;
///     let card = reader.poll().await?.unwrap();
///     assert_eq!(card.uid, vec![0x04, 0xA1]);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockReader {
    /// Channel receiver for card events
    event_rx: mpsc::Receiver<CardEvent>,

    /// Device name
    name: String,
}

impl MockReader {
    /// Create a new mock reader with the default name.
    ///
    /// Returns a tuple of (MockReader, MockReaderHandle) where the handle
    /// can be used to simulate card presentations.
    pub fn new() -> (Self, MockReaderHandle) {
        Self::with_name("Mock Card Reader".to_string())
    }

    /// Create a new mock reader with a custom name.
    ///
    /// # Examples
    ///
    /// ```
    /// use rollcall_hardware::mock::MockReader;
    ///
    /// let (_reader, handle) = MockReader::with_name("Front Door".to_string());
    /// assert_eq!(handle.name(), "Front Door");
    /// ```
    pub fn with_name(name: String) -> (Self, MockReaderHandle) {
        let (event_tx, event_rx) = mpsc::channel(32);

        let reader = Self {
            event_rx,
            name: name.clone(),
        };

        let handle = MockReaderHandle {
            event_tx,
            name,
            cards: HashMap::new(),
        };

        (reader, handle)
    }
}

impl CardReader for MockReader {
    async fn poll(&mut self) -> Result<Option<CardData>> {
        match self.event_rx.try_recv() {
            Ok(CardEvent::CardPresented(card)) => Ok(Some(card)),
            Ok(CardEvent::ReadFailed) => {
                debug!(reader = %self.name, "Incomplete card frame dropped");
                Ok(None)
            }
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(
                crate::HardwareError::disconnected(format!("{} event channel closed", self.name)),
            ),
        }
    }

    async fn get_reader_info(&self) -> Result<ReaderInfo> {
        Ok(ReaderInfo::new(self.name.clone(), vec!["ISO14443A".to_string()]))
    }
}

/// Internal event type for the mock reader.
#[derive(Debug, Clone)]
enum CardEvent {
    CardPresented(CardData),
    ReadFailed,
}

/// Handle for controlling a mock reader.
///
/// The handle keeps an optional card database so presentations can carry a
/// realistic card type; cards that were never registered are presented as
/// [`CardType::Unknown`].
#[derive(Debug, Clone)]
pub struct MockReaderHandle {
    /// Channel sender for card events
    event_tx: mpsc::Sender<CardEvent>,

    /// Device name
    name: String,

    /// Card database (UID -> CardType)
    cards: HashMap<Vec<u8>, CardType>,
}

impl MockReaderHandle {
    /// Register the type of a card that will be presented later.
    pub fn add_card(&mut self, uid: Vec<u8>, card_type: CardType) {
        self.cards.insert(uid, card_type);
    }

    /// Present a card to the reader.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The UID is empty or longer than 10 bytes
    /// - The reader has been dropped and the channel is closed
    pub async fn present_card(&mut self, uid: Vec<u8>) -> Result<()> {
        let card_type = self
            .cards
            .get(&uid)
            .cloned()
            .unwrap_or_else(|| CardType::Unknown(Vec::new()));

        let card = CardData::new(uid, card_type)?;
        self.send(CardEvent::CardPresented(card)).await
    }

    /// Present a card whose frame arrives corrupted.
    ///
    /// The reader swallows the frame and reports no card.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub async fn present_unreadable(&mut self) -> Result<()> {
        self.send(CardEvent::ReadFailed).await
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, event: CardEvent) -> Result<()> {
        self.event_tx.send(event).await.map_err(|_| {
            crate::HardwareError::disconnected(format!("{} event channel closed", self.name))
        })
    }
}
