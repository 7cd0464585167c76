//! Error types for hardware operations.
//!
//! This module defines error types specific to the card reader and the
//! indicator outputs, covering disconnection, communication failures,
//! malformed card data and output line faults.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Device communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Invalid data received from device.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Device initialization failed.
    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// Device configuration error.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// Card reading error.
    #[error("Card read error: {message}")]
    CardReadError { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new initialization failed error.
    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Create a new card read error.
    pub fn card_read(message: impl Into<String>) -> Self {
        Self::CardReadError {
            message: message.into(),
        }
    }

    /// Returns `true` if the device is gone rather than misbehaving.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_error() {
        let error = HardwareError::disconnected("ACR122U");
        assert!(error.is_disconnected());
        assert_eq!(error.to_string(), "Device disconnected: ACR122U");
    }

    #[test]
    fn test_communication_error() {
        let error = HardwareError::communication("PC/SC service stopped");
        assert!(matches!(error, HardwareError::CommunicationError { .. }));
        assert!(!error.is_disconnected());
        assert_eq!(error.to_string(), "Communication error: PC/SC service stopped");
    }

    #[test]
    fn test_invalid_data_error() {
        let error = HardwareError::invalid_data("UID too long");
        assert_eq!(error.to_string(), "Invalid data: UID too long");
    }

    #[test]
    fn test_configuration_error() {
        let error = HardwareError::configuration("tri-state lamp needs 3 lines, got 2");
        assert_eq!(
            error.to_string(),
            "Configuration error: tri-state lamp needs 3 lines, got 2"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "gpio busy");
        let error: HardwareError = io.into();
        assert!(matches!(error, HardwareError::Io(_)));
        assert_eq!(error.to_string(), "I/O error: gpio busy");
    }
}
