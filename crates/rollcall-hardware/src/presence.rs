//! Edge detection for edge-triggered readers.

/// Tracks whether the card currently in the field has been delivered.
///
/// A card is read when it shows up and read again on every poll until one
/// read succeeds. After that it is skipped until it leaves the field.
///
/// # Examples
///
/// ```
/// use rollcall_hardware::presence::PresenceLatch;
///
/// let mut latch = PresenceLatch::default();
/// assert!(latch.should_read(true));
/// latch.record_read(true);
/// assert!(!latch.should_read(true));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresenceLatch {
    delivered: bool,
}

impl PresenceLatch {
    /// Whether a poll that observed `present` should read the card.
    pub fn should_read(&mut self, present: bool) -> bool {
        if !present {
            self.delivered = false;
        }
        present && !self.delivered
    }

    /// Record the result of the read that [`should_read`](Self::should_read)
    /// asked for.
    pub fn record_read(&mut self, success: bool) {
        self.delivered = success;
    }
}
