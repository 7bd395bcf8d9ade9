//! Coup lifecycle - an internal uprising against a sitting ruler
//!
//! A coup opens a two-hour voting window. Participants pick a side while the
//! window is open; when it closes the resolver computes the outcome exactly
//! once. Defenders fight with personal defense power only - walls never help
//! against a rebellion from inside.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::conflict::constants::VOTING_WINDOW;
use crate::conflict::outcome::CoupOutcome;
use crate::core::types::{ConflictId, ConflictSide, ParticipantId, TerritoryId};
use crate::core::Timestamp;

/// A single coup attempt against one territory's ruler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoupEvent {
    pub id: ConflictId,
    pub initiator: ParticipantId,
    pub territory: TerritoryId,
    pub territory_name: String,
    pub opened_at: Timestamp,
    pub voting_deadline: Timestamp,
    attackers: Vec<ParticipantId>,
    defenders: Vec<ParticipantId>,
    /// Set exactly once by the ledger; doubles as the resolved flag
    outcome: Option<CoupOutcome>,
}

impl CoupEvent {
    /// Open a coup. The initiator is on the attacker roster from creation.
    pub fn open(
        initiator: ParticipantId,
        territory: TerritoryId,
        territory_name: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: ConflictId::new(),
            initiator,
            territory,
            territory_name: territory_name.into(),
            opened_at: now,
            voting_deadline: now + VOTING_WINDOW,
            attackers: vec![initiator],
            defenders: Vec::new(),
            outcome: None,
        }
    }

    /// Join one side of the coup
    ///
    /// Valid only while the voting window is open and the coup is
    /// unresolved; otherwise a silent no-op returning false. Joining one
    /// side removes the participant from the other. The initiator can never
    /// be moved off the attacker roster.
    pub fn join(&mut self, side: ConflictSide, participant: ParticipantId, now: Timestamp) -> bool {
        if self.resolved() || now >= self.voting_deadline {
            return false;
        }
        if side == ConflictSide::Defender && participant == self.initiator {
            return false;
        }

        let (target, other) = match side {
            ConflictSide::Attacker => (&mut self.attackers, &mut self.defenders),
            ConflictSide::Defender => (&mut self.defenders, &mut self.attackers),
        };

        other.retain(|p| *p != participant);
        if !target.contains(&participant) {
            target.push(participant);
        }
        true
    }

    /// Time left in the voting window, zero once the deadline passes
    pub fn time_remaining(&self, now: Timestamp) -> Duration {
        self.voting_deadline.saturating_duration_since(now)
    }

    /// Sole resolution trigger; an external scheduler polls this
    pub fn should_resolve(&self, now: Timestamp) -> bool {
        now >= self.voting_deadline && !self.resolved()
    }

    pub fn resolved(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn attackers(&self) -> &[ParticipantId] {
        &self.attackers
    }

    pub fn defenders(&self) -> &[ParticipantId] {
        &self.defenders
    }

    pub fn outcome(&self) -> Option<&CoupOutcome> {
        self.outcome.as_ref()
    }

    /// Record the outcome. Called by the ledger under the event lock;
    /// a second call is ignored.
    pub(crate) fn record_outcome(&mut self, outcome: CoupOutcome) {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_coup(now: Timestamp) -> CoupEvent {
        CoupEvent::open(
            ParticipantId::new(),
            TerritoryId::new(),
            "Ravenholm",
            now,
        )
    }

    #[test]
    fn test_initiator_is_attacker_from_creation() {
        let coup = open_coup(Timestamp(0));
        assert_eq!(coup.attackers(), &[coup.initiator]);
        assert!(coup.defenders().is_empty());
    }

    #[test]
    fn test_join_respects_voting_deadline() {
        let mut coup = open_coup(Timestamp(0));
        let rebel = ParticipantId::new();

        assert!(coup.join(ConflictSide::Attacker, rebel, Timestamp(7199)));
        // At the deadline the window is already closed
        assert!(!coup.join(ConflictSide::Defender, ParticipantId::new(), Timestamp(7200)));
        assert_eq!(coup.attackers().len(), 2);
        assert!(coup.defenders().is_empty());
    }

    #[test]
    fn test_switching_sides_removes_old_membership() {
        let mut coup = open_coup(Timestamp(0));
        let waverer = ParticipantId::new();

        coup.join(ConflictSide::Defender, waverer, Timestamp(10));
        coup.join(ConflictSide::Attacker, waverer, Timestamp(20));

        assert!(coup.attackers().contains(&waverer));
        assert!(!coup.defenders().contains(&waverer));
    }

    #[test]
    fn test_joining_same_side_twice_does_not_duplicate() {
        let mut coup = open_coup(Timestamp(0));
        let rebel = ParticipantId::new();

        coup.join(ConflictSide::Attacker, rebel, Timestamp(10));
        coup.join(ConflictSide::Attacker, rebel, Timestamp(20));

        assert_eq!(coup.attackers().len(), 2); // initiator + rebel
    }

    #[test]
    fn test_initiator_cannot_defect_to_defenders() {
        let mut coup = open_coup(Timestamp(0));
        let initiator = coup.initiator;

        assert!(!coup.join(ConflictSide::Defender, initiator, Timestamp(10)));
        assert!(coup.attackers().contains(&initiator));
        assert!(!coup.defenders().contains(&initiator));
    }

    #[test]
    fn test_time_remaining_clamps_to_zero() {
        let coup = open_coup(Timestamp(100));
        assert_eq!(
            coup.time_remaining(Timestamp(100)),
            Duration::from_secs(7200)
        );
        assert_eq!(coup.time_remaining(Timestamp(10_000)), Duration::ZERO);
    }

    #[test]
    fn test_should_resolve_only_after_deadline() {
        let coup = open_coup(Timestamp(0));
        assert!(!coup.should_resolve(Timestamp(7199)));
        assert!(coup.should_resolve(Timestamp(7200)));
    }
}
