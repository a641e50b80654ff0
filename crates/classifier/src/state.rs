//! Per-user probe state and its transition table.
//!
//! A user with no entry in the [`ProbeRegistry`](crate::ProbeRegistry) is
//! "unseen". Tracking starts in `RequestingStats` when the user queues an
//! upload, and each probing episode moves forward towards `Okay` or
//! `ProcessedLeecher`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Probe state of a tracked user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProbeState {
    /// Waiting for share statistics to arrive.
    RequestingStats,
    /// A share browse was issued because the reported counts were empty.
    RequestingShares,
    /// User meets the share requirement.
    Okay,
    /// User is banned; the warning goes out once the current upload finishes.
    PendingLeecher,
    /// Enforcement is complete for this episode.
    ProcessedLeecher,
}

impl ProbeState {
    /// Whether a decision may still be taken from this state.
    pub fn is_requesting(&self) -> bool {
        matches!(self, Self::RequestingStats | Self::RequestingShares)
    }

    /// Returns true if `next` is reachable from `self` in one step.
    ///
    /// Staying in the same state is always allowed. Acceptance is reachable
    /// from every state, and `Okay` only goes back to `RequestingStats` when a
    /// recheck starts a new episode.
    pub fn can_transition_to(&self, next: ProbeState) -> bool {
        use ProbeState::*;

        if *self == next {
            return true;
        }

        match (self, next) {
            (_, Okay) => true,
            (RequestingStats, RequestingShares | PendingLeecher | ProcessedLeecher) => true,
            (RequestingShares, PendingLeecher | ProcessedLeecher) => true,
            (PendingLeecher, ProcessedLeecher) => true,
            (Okay, RequestingStats) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_requesting_family() {
        assert!(ProbeState::RequestingStats.is_requesting());
        assert!(ProbeState::RequestingShares.is_requesting());
        assert!(!ProbeState::Okay.is_requesting());
        assert!(!ProbeState::PendingLeecher.is_requesting());
        assert!(!ProbeState::ProcessedLeecher.is_requesting());
    }

    #[test]
    fn test_forward_transitions() {
        use ProbeState::*;

        assert!(RequestingStats.can_transition_to(RequestingShares));
        assert!(RequestingStats.can_transition_to(PendingLeecher));
        assert!(RequestingShares.can_transition_to(PendingLeecher));
        assert!(PendingLeecher.can_transition_to(ProcessedLeecher));
        assert!(ProcessedLeecher.can_transition_to(Okay));
    }

    #[test]
    fn test_no_regression() {
        use ProbeState::*;

        assert!(!RequestingShares.can_transition_to(RequestingStats));
        assert!(!PendingLeecher.can_transition_to(RequestingStats));
        assert!(!PendingLeecher.can_transition_to(RequestingShares));
        assert!(!ProcessedLeecher.can_transition_to(PendingLeecher));
        assert!(!ProcessedLeecher.can_transition_to(RequestingStats));
        assert!(!Okay.can_transition_to(PendingLeecher));
        assert!(!Okay.can_transition_to(RequestingShares));
    }

    #[test]
    fn test_every_state_accepts_self_and_okay() {
        for state in ProbeState::iter() {
            assert!(state.can_transition_to(state));
            assert!(state.can_transition_to(ProbeState::Okay));
        }
    }

    #[test]
    fn test_display_matches_serde() {
        assert_eq!(ProbeState::PendingLeecher.to_string(), "pending_leecher");
        assert_eq!(
            serde_json::to_string(&ProbeState::RequestingShares).unwrap(),
            "\"requesting_shares\""
        );
    }
}
