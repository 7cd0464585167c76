//! Scripted reporter for testing and development.
//!
//! [`MockReporter`] answers each submit with the next scripted result and
//! records every identifier it was given. Scripted results are consumed in
//! order; once the script is empty every submit fails as unreachable.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rollcall_core::{CardIdentifier, ServerResponse};

use crate::client::{ReportError, Reporter};

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<Result<ServerResponse, ReportError>>,
    submitted: Vec<CardIdentifier>,
}

/// Reporter that replays a script instead of talking to a service.
///
/// # Examples
///
/// ```
/// use rollcall_core::{CardIdentifier, ServerOutcome};
/// use rollcall_network::Reporter;
/// use rollcall_network::mock::MockReporter;
///
/// #[tokio::main]
/// async fn main() {
///     let (reporter, handle) = MockReporter::new();
///     handle.respond(201, "Admin session started successfully.");
///
///     let id = CardIdentifier::normalize(&[0x04, 0xA1]);
///     let response = reporter.submit(&id).await.unwrap();
///     assert_eq!(response.classify(), ServerOutcome::SessionStarted);
///     assert_eq!(handle.submitted(), vec![id]);
/// }
/// ```
#[derive(Debug)]
pub struct MockReporter {
    script: Arc<Mutex<Script>>,
    latency: Duration,
}

impl MockReporter {
    /// Create a reporter that answers immediately.
    pub fn new() -> (Self, MockReporterHandle) {
        Self::with_latency(Duration::ZERO)
    }

    /// Create a reporter that takes `latency` to answer each submit.
    pub fn with_latency(latency: Duration) -> (Self, MockReporterHandle) {
        let script = Arc::new(Mutex::new(Script::default()));
        let handle = MockReporterHandle {
            script: Arc::clone(&script),
        };
        (Self { script, latency }, handle)
    }
}

impl Reporter for MockReporter {
    async fn submit(&self, id: &CardIdentifier) -> Result<ServerResponse, ReportError> {
        let reply = {
            let mut script = lock(&self.script);
            script.submitted.push(id.clone());
            script.replies.pop_front()
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        reply.unwrap_or_else(|| Err(ReportError::Connect("no scripted reply".to_string())))
    }
}

/// Handle for scripting a [`MockReporter`].
#[derive(Debug, Clone)]
pub struct MockReporterHandle {
    script: Arc<Mutex<Script>>,
}

impl MockReporterHandle {
    /// Queue a response with the given status and body.
    pub fn respond(&self, status: u16, body: impl Into<String>) {
        lock(&self.script)
            .replies
            .push_back(Ok(ServerResponse::new(status, body)));
    }

    /// Queue a transport failure.
    pub fn fail(&self, error: ReportError) {
        lock(&self.script).replies.push_back(Err(error));
    }

    /// Identifiers submitted so far, oldest first.
    pub fn submitted(&self) -> Vec<CardIdentifier> {
        lock(&self.script).submitted.clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.script).submitted.len()
    }
}

fn lock(script: &Mutex<Script>) -> MutexGuard<'_, Script> {
    script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
