use crate::{
    Result,
    constants::{SESSION_ENDED_MARKER, STATUS_OK, STATUS_SESSION_STARTED},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Canonical card identifier: lowercase hex, two digits per raw byte.
///
/// Built from the raw UID bytes by [`CardIdentifier::normalize`]. Equal byte
/// sequences always produce equal identifiers and distinct sequences always
/// produce distinct ones, so the identifier can stand in for the bytes in
/// duplicate checks and on the wire.
///
/// # Security
/// Comparison is constant-time, like any other credential comparison in the
/// terminal.
///
/// # Examples
/// ```
/// use rollcall_core::CardIdentifier;
///
/// let id = CardIdentifier::normalize(&[0x04, 0xA1]);
/// assert_eq!(id.as_str(), "04a1");
/// ```
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardIdentifier(String);

impl CardIdentifier {
    /// Normalize raw UID bytes into their canonical textual form.
    ///
    /// Each byte becomes exactly two lowercase hex digits (`0x04` is `"04"`,
    /// never `"4"`), in the original byte order, with no separators.
    #[must_use]
    pub fn normalize(raw: &[u8]) -> Self {
        CardIdentifier(raw.iter().map(|b| format!("{:02x}", b)).collect())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of raw bytes this identifier was built from.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.0.len() / 2
    }
}

impl fmt::Display for CardIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses an already-normalized identifier.
///
/// Uppercase digits are accepted and folded to lowercase; odd lengths and
/// non-hex characters are rejected.
impl std::str::FromStr for CardIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s.len() % 2 != 0 {
            return Err(Error::InvalidIdentifier(format!(
                "expected an even number of hex digits, got {:?}",
                s
            )));
        }

        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidIdentifier(format!(
                "non-hex character in {:?}",
                s
            )));
        }

        Ok(CardIdentifier(s.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for CardIdentifier {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<CardIdentifier> for String {
    fn from(id: CardIdentifier) -> Self {
        id.0
    }
}

impl PartialEq for CardIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl std::hash::Hash for CardIdentifier {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// Process-wide session flag.
///
/// A session is opened and closed on the service by admin scans; the
/// terminal mirrors it locally to drive the idle indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Inactive,
    Active,
}

impl SessionState {
    /// Returns `true` if a session is running.
    #[inline]
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, SessionState::Active)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SessionState::Inactive => write!(f, "Inactive"),
            SessionState::Active => write!(f, "Active"),
        }
    }
}

/// A response received from the attendance service.
///
/// Any status counts as received, including 4xx and 5xx; only failures to
/// obtain a response at all are transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerResponse {
    /// HTTP status code.
    pub status: u16,

    /// Raw response body (plain text or JSON).
    pub body: String,
}

impl ServerResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Classify this response without touching any state.
    ///
    /// The checks run in priority order: 201 opens a session, 200 with the
    /// session-ended marker closes it, any other 200 is an attendance mark,
    /// everything else is a server error. The marker is only looked for on
    /// 200 responses.
    ///
    /// # Examples
    /// ```
    /// use rollcall_core::{ServerOutcome, ServerResponse};
    ///
    /// let response = ServerResponse::new(200, "Active session ended successfully.");
    /// assert_eq!(response.classify(), ServerOutcome::SessionEnded);
    /// ```
    #[must_use]
    pub fn classify(&self) -> ServerOutcome {
        match self.status {
            STATUS_SESSION_STARTED => ServerOutcome::SessionStarted,
            STATUS_OK if self.body.contains(SESSION_ENDED_MARKER) => ServerOutcome::SessionEnded,
            STATUS_OK => ServerOutcome::AttendanceMarked,
            _ => ServerOutcome::ServerError(self.body.clone()),
        }
    }
}

/// Interpretation of a service response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerOutcome {
    SessionStarted,
    SessionEnded,
    AttendanceMarked,
    /// Rejected scan or failed request; carries the body or error text.
    ServerError(String),
}

impl ServerOutcome {
    /// The session state this outcome forces, if any.
    #[must_use]
    pub fn session_target(&self) -> Option<SessionState> {
        match self {
            ServerOutcome::SessionStarted => Some(SessionState::Active),
            ServerOutcome::SessionEnded => Some(SessionState::Inactive),
            ServerOutcome::AttendanceMarked | ServerOutcome::ServerError(_) => None,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, ServerOutcome::ServerError(_))
    }
}

impl fmt::Display for ServerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServerOutcome::SessionStarted => write!(f, "SessionStarted"),
            ServerOutcome::SessionEnded => write!(f, "SessionEnded"),
            ServerOutcome::AttendanceMarked => write!(f, "AttendanceMarked"),
            ServerOutcome::ServerError(_) => write!(f, "ServerError"),
        }
    }
}

/// Result of processing one presented card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    /// Same identifier as the last reported one; nothing was sent.
    Duplicate,

    /// The service answered.
    Reported(ServerOutcome),

    /// No response could be obtained.
    ReportFailed,
}

impl ScanOutcome {
    /// Returns `true` for outcomes the operator sees as a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        match self {
            ScanOutcome::ReportFailed => true,
            ScanOutcome::Reported(outcome) => outcome.is_error(),
            ScanOutcome::Duplicate => false,
        }
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScanOutcome::Duplicate => write!(f, "Duplicate"),
            ScanOutcome::Reported(outcome) => write!(f, "Reported({})", outcome),
            ScanOutcome::ReportFailed => write!(f, "ReportFailed"),
        }
    }
}
