//! Mutable device state threaded through the scan pipeline.

use crate::dedup::{DedupPolicy, Deduplicator};
use crate::session::SessionStateMachine;
use rollcall_core::SessionState;

/// Everything the terminal remembers between scans.
///
/// Volatile: a restart begins with no remembered card and no session.
#[derive(Debug, Clone, Default)]
pub struct DeviceState {
    pub session: SessionStateMachine,
    pub dedup: Deduplicator,
}

impl DeviceState {
    pub fn new(policy: DedupPolicy) -> Self {
        Self {
            session: SessionStateMachine::new(),
            dedup: Deduplicator::new(policy),
        }
    }

    /// Shortcut for the current session flag.
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }
}
