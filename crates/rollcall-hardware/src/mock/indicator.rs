//! Mock indicator and output line for testing.
//!
//! Both record what they were told to show so tests can assert on the
//! exact sequence of feedback, and both can be told to fail.

use crate::{
    HardwareError, Result,
    traits::{IndicatorDevice, OutputLine},
    types::{DeviceInfo, LedColor},
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared state between a mock indicator and its handle.
#[derive(Debug, Default)]
struct IndicatorState {
    history: Mutex<Vec<LedColor>>,
    failing: AtomicBool,
}

impl IndicatorState {
    fn history(&self) -> MutexGuard<'_, Vec<LedColor>> {
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Mock indicator that records every color it is set to.
///
/// # Examples
///
/// ```
/// use rollcall_hardware::mock::MockIndicator;
/// use rollcall_hardware::traits::IndicatorDevice;
/// use rollcall_hardware::types::LedColor;
///
/// #[tokio::main]
/// async fn main() -> rollcall_hardware::Result<()> {
///     let (mut indicator, handle) = MockIndicator::new();
///
///     indicator.set_led(LedColor::Green).await?;
///     indicator.set_led(LedColor::Off).await?;
///
///     assert_eq!(handle.history(), vec![LedColor::Green, LedColor::Off]);
///     assert_eq!(handle.current(), LedColor::Off);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockIndicator {
    state: Arc<IndicatorState>,
}

impl MockIndicator {
    /// Create a new mock indicator and the handle used to inspect it.
    pub fn new() -> (Self, MockIndicatorHandle) {
        let state = Arc::new(IndicatorState::default());
        (
            Self {
                state: Arc::clone(&state),
            },
            MockIndicatorHandle { state },
        )
    }
}

impl IndicatorDevice for MockIndicator {
    async fn set_led(&mut self, color: LedColor) -> Result<()> {
        if self.state.failing.load(Ordering::SeqCst) {
            return Err(HardwareError::communication("mock indicator failure"));
        }
        self.state.history().push(color);
        Ok(())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new("MockIndicator", "Mock"))
    }
}

/// Handle for inspecting a [`MockIndicator`].
#[derive(Debug, Clone)]
pub struct MockIndicatorHandle {
    state: Arc<IndicatorState>,
}

impl MockIndicatorHandle {
    /// Every color shown so far, oldest first.
    pub fn history(&self) -> Vec<LedColor> {
        self.state.history().clone()
    }

    /// The color currently shown (`Off` if nothing was shown yet).
    pub fn current(&self) -> LedColor {
        self.state.history().last().copied().unwrap_or(LedColor::Off)
    }

    /// Forget the recorded history.
    pub fn clear(&self) {
        self.state.history().clear();
    }

    /// Make subsequent `set_led` calls fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }
}

/// Mock output line backed by a shared flag.
///
/// # Examples
///
/// ```
/// use rollcall_hardware::mock::MockLine;
/// use rollcall_hardware::traits::OutputLine;
///
/// let mut line = MockLine::new();
/// let probe = line.clone();
/// line.set_active(true).unwrap();
/// assert!(probe.is_active());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockLine {
    active: Arc<AtomicBool>,
}

impl MockLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl OutputLine for MockLine {
    fn set_active(&mut self, active: bool) -> Result<()> {
        self.active.store(active, Ordering::SeqCst);
        Ok(())
    }
}
