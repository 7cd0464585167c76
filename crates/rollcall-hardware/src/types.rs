//! Common types shared across hardware device implementations.
//!
//! This module defines device information records and the LED colors used
//! for operator feedback.

use serde::{Deserialize, Serialize};

/// Generic device information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "status-lamp", "MockIndicator").
    pub name: String,

    /// Device model identifier.
    pub model: String,
}

impl DeviceInfo {
    /// Create a new DeviceInfo with required fields.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Card reader information.
///
/// Contains reader-specific metadata such as supported protocols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderInfo {
    /// Reader name (e.g., "ACS ACR122U PICC Interface 00 00").
    pub name: String,

    /// List of supported protocols (e.g., ["ISO14443A"]).
    pub protocols: Vec<String>,
}

impl ReaderInfo {
    /// Create a new ReaderInfo.
    pub fn new(name: impl Into<String>, protocols: Vec<String>) -> Self {
        Self {
            name: name.into(),
            protocols,
        }
    }
}

/// LED colors for operator feedback.
///
/// Lamps with fewer channels map colors onto what they have: a tri-state
/// lamp drives one line per RGB channel, a single lamp is simply on for any
/// color other than [`LedColor::Off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum LedColor {
    /// LED off.
    Off,

    /// Red LED.
    Red,

    /// Green LED.
    Green,

    /// Blue LED.
    Blue,

    /// Yellow LED.
    Yellow,

    /// Cyan LED.
    Cyan,

    /// Magenta LED.
    Magenta,
}

impl LedColor {
    /// Get the RGB components of the LED color.
    pub fn as_rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Off => (0, 0, 0),
            Self::Red => (255, 0, 0),
            Self::Green => (0, 255, 0),
            Self::Blue => (0, 0, 255),
            Self::Yellow => (255, 255, 0),
            Self::Cyan => (0, 255, 255),
            Self::Magenta => (255, 0, 255),
        }
    }

    /// Returns `true` if any channel is lit.
    pub fn is_lit(&self) -> bool {
        self.as_rgb() != (0, 0, 0)
    }
}
