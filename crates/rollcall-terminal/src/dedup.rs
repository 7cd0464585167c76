//! Duplicate suppression.
//!
//! The terminal remembers the last identifier the service answered for and
//! drops an immediate re-presentation of the same card. Only one identifier is
//! remembered, so `A, B, A` reports `A` twice.

use rollcall_core::CardIdentifier;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// How repeated presentations are filtered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Suppress a card equal to the last one that got a response.
    #[default]
    LastReported,

    /// Report every card.
    Disabled,
}

/// Single-slot duplicate filter.
///
/// The slot is written only by [`mark_reported`](Deduplicator::mark_reported),
/// which the pipeline calls once the service has answered. A card whose
/// report failed in transport is therefore retried on its next presentation.
///
/// # Examples
///
/// ```
/// use rollcall_core::CardIdentifier;
/// use rollcall_terminal::{DedupPolicy, Deduplicator};
///
/// let mut dedup = Deduplicator::new(DedupPolicy::LastReported);
/// let card = CardIdentifier::normalize(&[0x04, 0xA1]);
///
/// assert!(dedup.should_report(&card));
/// dedup.mark_reported(card.clone());
/// assert!(!dedup.should_report(&card));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    policy: DedupPolicy,
    last: Option<CardIdentifier>,
}

impl Deduplicator {
    pub fn new(policy: DedupPolicy) -> Self {
        Self { policy, last: None }
    }

    pub fn policy(&self) -> DedupPolicy {
        self.policy
    }

    /// Decide whether `id` must be sent to the service.
    ///
    /// Never changes the remembered identifier.
    pub fn should_report(&self, id: &CardIdentifier) -> bool {
        match self.policy {
            DedupPolicy::Disabled => true,
            DedupPolicy::LastReported => self.last.as_ref() != Some(id),
        }
    }

    /// Remember `id` as the last card the service answered for.
    pub fn mark_reported(&mut self, id: CardIdentifier) {
        trace!(uid = %id, "Remembering last reported card");
        self.last = Some(id);
    }

    /// The remembered identifier, if any card was reported yet.
    pub fn last_reported(&self) -> Option<&CardIdentifier> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &[u8]) -> CardIdentifier {
        CardIdentifier::normalize(raw)
    }

    #[test]
    fn test_first_scan_is_reportable() {
        let dedup = Deduplicator::default();
        assert_eq!(dedup.policy(), DedupPolicy::LastReported);
        assert!(dedup.should_report(&id(&[0x04, 0xA1])));
        assert!(dedup.last_reported().is_none());
    }

    #[test]
    fn test_repeat_after_report_is_duplicate() {
        let mut dedup = Deduplicator::default();
        dedup.mark_reported(id(&[0x04, 0xA1]));

        assert!(!dedup.should_report(&id(&[0x04, 0xA1])));
        assert!(dedup.should_report(&id(&[0xB2, 0x00])));
    }

    #[test]
    fn test_single_slot_reports_a_b_a() {
        let mut dedup = Deduplicator::default();
        let mut reported = Vec::new();

        for card in [id(&[0x0A]), id(&[0x0B]), id(&[0x0A])] {
            if dedup.should_report(&card) {
                reported.push(card.clone());
                dedup.mark_reported(card);
            }
        }

        assert_eq!(reported.len(), 3);
    }

    #[test]
    fn test_check_does_not_mark() {
        let dedup = Deduplicator::default();
        let card = id(&[0x01, 0x02]);

        assert!(dedup.should_report(&card));
        assert!(dedup.should_report(&card));
    }

    #[test]
    fn test_disabled_policy_reports_everything() {
        let mut dedup = Deduplicator::new(DedupPolicy::Disabled);
        dedup.mark_reported(id(&[0x04, 0xA1]));

        assert!(dedup.should_report(&id(&[0x04, 0xA1])));
    }

    #[test]
    fn test_policy_serde_names() {
        let policy: DedupPolicy = serde_json::from_str("\"disabled\"").unwrap();
        assert_eq!(policy, DedupPolicy::Disabled);
        assert_eq!(
            serde_json::to_string(&DedupPolicy::LastReported).unwrap(),
            "\"last_reported\""
        );
    }
}
