//! Shared constants for the terminal and its report endpoint.
//!
//! The status codes and the session-end marker form the compatibility
//! contract with the attendance service. The timing defaults mirror the
//! behaviour of the deployed terminals and are overridable through
//! configuration.
//!
//! ```
//! use rollcall_core::constants::*;
//!
//! assert_eq!(STATUS_SESSION_STARTED, 201);
//! assert!("Active session ended successfully.".contains(SESSION_ENDED_MARKER));
//! ```

// ============================================================================
// Service Contract
// ============================================================================

/// Status returned when an admin scan opens a session.
pub const STATUS_SESSION_STARTED: u16 = 201;

/// Status returned when a scan was accepted (attendance or session close).
pub const STATUS_OK: u16 = 200;

/// Substring of a 200 response body that marks the session as closed.
///
/// The service answers `"Active session ended successfully."` when an admin
/// card closes the running session. It has no structured status field, so
/// this marker must stay in sync with the service text.
pub const SESSION_ENDED_MARKER: &str = "ended";

// ============================================================================
// Card Identifiers
// ============================================================================

/// Maximum UID length in bytes (ISO 14443 triple size UID).
pub const MAX_UID_LENGTH: usize = 10;

// ============================================================================
// Timing Defaults (milliseconds)
// ============================================================================

/// Hold time for attendance, duplicate and error signals.
pub const DEFAULT_SHORT_SIGNAL_MS: u64 = 700;

/// Hold time for session start and session end signals.
pub const DEFAULT_LONG_SIGNAL_MS: u64 = 1500;

/// Interval between reader polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Pause after each processed scan before the next card is accepted.
pub const DEFAULT_SCAN_COOLDOWN_MS: u64 = 1000;

/// Upper bound for a single report request.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;

/// Delay between link bring-up attempts.
pub const DEFAULT_LINK_RETRY_MS: u64 = 800;
