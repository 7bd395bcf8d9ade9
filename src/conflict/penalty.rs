//! Penalty records handed to the player-state collaborator
//!
//! A [`ParticipantPenalty`] describes what one participant loses as a
//! consequence of a resolved conflict. It is a description, not an action:
//! the kingdom state store decides how to apply it (see
//! `kingdom::participant`).

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::conflict::constants::{
    COUP_FAILURE_REPUTATION_LOSS, COUP_FAILURE_STAT_LOSS, INVASION_DEFEAT_ATTACK_LOSS,
    INVASION_DEFEAT_REPUTATION_LOSS, WOUND_DURATION,
};
use crate::core::types::Gold;

/// Consequences of a lost conflict for a single participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantPenalty {
    pub gold_lost: Gold,
    pub reputation_lost: i64,
    pub attack_lost: u32,
    pub defense_lost: u32,
    /// Present for temporary effects (wound debuffs); None for permanent ones
    pub duration: Option<Duration>,
}

impl ParticipantPenalty {
    /// Penalty for an attacker on the losing side of a coup
    ///
    /// Gold loss is half the attacker's current gold, floor division.
    pub fn coup_failure(attacker_gold: Gold) -> Self {
        Self {
            gold_lost: attacker_gold / 2,
            reputation_lost: COUP_FAILURE_REPUTATION_LOSS,
            attack_lost: COUP_FAILURE_STAT_LOSS,
            defense_lost: COUP_FAILURE_STAT_LOSS,
            duration: None,
        }
    }

    /// Temporary debuff for an attacker on the losing side of an invasion
    pub fn invasion_defeat() -> Self {
        Self {
            gold_lost: 0,
            reputation_lost: INVASION_DEFEAT_REPUTATION_LOSS,
            attack_lost: INVASION_DEFEAT_ATTACK_LOSS,
            defense_lost: 0,
            duration: Some(WOUND_DURATION),
        }
    }

    /// True if this penalty wears off on its own
    pub fn is_temporary(&self) -> bool {
        self.duration.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coup_failure_halves_gold() {
        let penalty = ParticipantPenalty::coup_failure(501);
        assert_eq!(penalty.gold_lost, 250); // floor division
        assert_eq!(penalty.reputation_lost, 100);
        assert_eq!(penalty.attack_lost, 2);
        assert_eq!(penalty.defense_lost, 2);
        assert!(!penalty.is_temporary());
    }

    #[test]
    fn test_invasion_defeat_is_temporary() {
        let debuff = ParticipantPenalty::invasion_defeat();
        assert_eq!(debuff.gold_lost, 0);
        assert_eq!(debuff.reputation_lost, 50);
        assert_eq!(debuff.attack_lost, 1);
        assert_eq!(debuff.duration, Some(Duration::from_secs(24 * 60 * 60)));
        assert!(debuff.is_temporary());
    }
}
