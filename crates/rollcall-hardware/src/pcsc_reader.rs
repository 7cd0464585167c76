//! PC/SC contactless reader support.
//!
//! Works with any reader exposed by the PC/SC service (pcscd on Linux), such
//! as the ACR122U. The UID is fetched with the PC/SC part 3 pseudo-APDU
//! `FF CA 00 00 00`, which contactless readers answer for every ISO 14443
//! card type.

use crate::{
    HardwareError, Result,
    presence::PresenceLatch,
    traits::{CardData, CardReader, CardType},
    types::ReaderInfo,
};
use pcsc::{Attribute, Context, Protocols, ReaderState, Scope, ShareMode, State};
use std::ffi::CString;
use std::time::Duration;
use tracing::{debug, info};

/// GET DATA (UID) pseudo-APDU.
const APDU_GET_UID: [u8; 5] = [0xFF, 0xCA, 0x00, 0x00, 0x00];

/// Status word for a successful command.
const SW_SUCCESS: [u8; 2] = [0x90, 0x00];

/// Reader attached through the PC/SC service.
///
/// The reader is edge triggered: a card is delivered once when it enters the
/// field and is not delivered again until it has left. A failed read is
/// retried on the next poll while the card stays in the field.
pub struct PcscReader {
    context: Context,
    reader: CString,
    present: bool,
    latch: PresenceLatch,
}

impl PcscReader {
    /// Connect to the PC/SC service and pick a reader.
    ///
    /// With `name = None` the first reader reported by the service is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is not running, no reader is attached,
    /// or the named reader does not exist.
    pub fn open(name: Option<&str>) -> Result<Self> {
        let context = Context::establish(Scope::User).map_err(|e| {
            HardwareError::initialization_failed(format!("PC/SC service unavailable: {}", e))
        })?;

        let readers = context
            .list_readers_owned()
            .map_err(|e| HardwareError::initialization_failed(format!("no PC/SC readers: {}", e)))?;

        let reader = match name {
            Some(wanted) => readers
                .into_iter()
                .find(|r| r.to_string_lossy() == wanted)
                .ok_or_else(|| {
                    HardwareError::initialization_failed(format!("reader {:?} not found", wanted))
                })?,
            None => readers.into_iter().next().ok_or_else(|| {
                HardwareError::initialization_failed("no PC/SC readers attached")
            })?,
        };

        info!(reader = %reader.to_string_lossy(), "PC/SC reader ready");

        Ok(Self {
            context,
            reader,
            present: false,
            latch: PresenceLatch::default(),
        })
    }

    fn is_present(&self) -> Result<bool> {
        let mut states = [ReaderState::new(self.reader.clone(), State::UNAWARE)];
        match self.context.get_status_change(Duration::ZERO, &mut states) {
            Ok(()) => Ok(states[0].event_state().contains(State::PRESENT)),
            // Nothing changed since the last look
            Err(pcsc::Error::Timeout) => Ok(self.present),
            Err(e) => Err(map_pcsc_error(e)),
        }
    }

    fn read_card(&self) -> Result<CardData> {
        let card = self
            .context
            .connect(&self.reader, ShareMode::Shared, Protocols::ANY)
            .map_err(|e| HardwareError::card_read(format!("connect failed: {}", e)))?;

        let mut buffer = [0u8; pcsc::MAX_BUFFER_SIZE];
        let response = card
            .transmit(&APDU_GET_UID, &mut buffer)
            .map_err(|e| HardwareError::card_read(format!("GET UID failed: {}", e)))?;

        let (uid, status) = response.split_at(response.len().saturating_sub(2));
        if status != SW_SUCCESS {
            return Err(HardwareError::card_read(format!(
                "GET UID returned status {:02X?}",
                status
            )));
        }

        let card_type = card
            .get_attribute_owned(Attribute::AtrString)
            .map(|atr| CardType::from_atr(&atr))
            .unwrap_or_else(|_| CardType::Unknown(Vec::new()));

        CardData::new(uid.to_vec(), card_type)
    }
}

impl CardReader for PcscReader {
    async fn poll(&mut self) -> Result<Option<CardData>> {
        self.present = self.is_present()?;
        if !self.latch.should_read(self.present) {
            return Ok(None);
        }

        let read = self.read_card();
        self.latch.record_read(read.is_ok());

        match read {
            Ok(card) => Ok(Some(card)),
            Err(e) => {
                debug!(error = %e, "Card read failed, frame dropped");
                Ok(None)
            }
        }
    }

    async fn get_reader_info(&self) -> Result<ReaderInfo> {
        Ok(ReaderInfo::new(
            self.reader.to_string_lossy(),
            vec!["ISO14443A".to_string(), "ISO14443B".to_string()],
        ))
    }
}

fn map_pcsc_error(error: pcsc::Error) -> HardwareError {
    match error {
        pcsc::Error::NoReadersAvailable
        | pcsc::Error::ReaderUnavailable
        | pcsc::Error::UnknownReader
        | pcsc::Error::NoService
        | pcsc::Error::ServiceStopped => HardwareError::disconnected(error.to_string()),
        other => HardwareError::communication(other.to_string()),
    }
}

