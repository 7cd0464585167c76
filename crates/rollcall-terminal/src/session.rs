//! Session state machine.
//!
//! The attendance service opens and closes sessions in response to admin
//! scans. The terminal mirrors the session flag locally, driven only by the
//! responses it receives:
//!
//! | Response | New state | Outcome |
//! |---|---|---|
//! | 201 | `Active` | `SessionStarted` |
//! | 200, body contains `"ended"` | `Inactive` | `SessionEnded` |
//! | 200 | unchanged | `AttendanceMarked` |
//! | anything else | unchanged | `ServerError` |
//!
//! # Examples
//!
//! ```
//! use rollcall_core::{ServerOutcome, ServerResponse, SessionState};
//! use rollcall_terminal::SessionStateMachine;
//!
//! let mut machine = SessionStateMachine::new();
//! assert_eq!(machine.state(), SessionState::Inactive);
//!
//! let outcome = machine.apply(&ServerResponse::new(201, "Admin session started successfully."));
//! assert_eq!(outcome, ServerOutcome::SessionStarted);
//! assert_eq!(machine.state(), SessionState::Active);
//! assert_eq!(machine.history().len(), 1);
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rollcall_core::{ServerOutcome, ServerResponse, SessionState};
use tracing::info;

/// Maximum number of session transitions to keep in history.
///
/// Sessions change a handful of times a day; 100 entries cover weeks of
/// operation while staying a few kilobytes.
const MAX_HISTORY_SIZE: usize = 100;

/// A recorded change of the session flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTransition {
    pub from: SessionState,
    pub to: SessionState,

    /// Outcome that caused the change
    pub outcome: ServerOutcome,

    pub timestamp: Instant,
}

impl SessionTransition {
    pub fn new(from: SessionState, to: SessionState, outcome: ServerOutcome) -> Self {
        Self {
            from,
            to,
            outcome,
            timestamp: Instant::now(),
        }
    }

    /// Time since this transition happened.
    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }
}

/// Owner of the local session flag.
#[derive(Debug, Clone)]
pub struct SessionStateMachine {
    state: SessionState,
    history: VecDeque<SessionTransition>,
}

impl SessionStateMachine {
    /// Create a machine in the `Inactive` state.
    pub fn new() -> Self {
        Self::with_state(SessionState::default())
    }

    /// Create a machine in a given state, with empty history.
    pub fn with_state(state: SessionState) -> Self {
        Self {
            state,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Interpret a received response and update the session flag.
    ///
    /// Error outcomes never touch the flag. Applying the same response twice
    /// yields the same outcome and the same state.
    pub fn apply(&mut self, response: &ServerResponse) -> ServerOutcome {
        let outcome = response.classify();

        if let Some(target) = outcome.session_target()
            && target != self.state
        {
            let transition = SessionTransition::new(self.state, target, outcome.clone());
            info!(from = %transition.from, to = %transition.to, "Session state changed");

            self.state = target;
            self.add_to_history(transition);
        }

        outcome
    }

    /// Session changes, oldest first, capped at the last 100.
    pub fn history(&self) -> &VecDeque<SessionTransition> {
        &self.history
    }

    /// Get the most recent transitions, newest first.
    pub fn last_transitions(&self, count: usize) -> Vec<SessionTransition> {
        self.history.iter().rev().take(count).cloned().collect()
    }

    fn add_to_history(&mut self, transition: SessionTransition) {
        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
