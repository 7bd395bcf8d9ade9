//! Persistent participant attributes and the penalty transformations
//!
//! Penalties are pure: each transformation takes a record and returns the
//! record after the consequence, leaving the input untouched. The store is
//! the only place records are swapped, which keeps concurrent resolution
//! from tearing a participant's state.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::conflict::constants::{
    COUP_FAILURE_REPUTATION_LOSS, OVERTHROWN_REPUTATION_LOSS, OVERTHROWN_STAT_LOSS, STAT_FLOOR,
};
use crate::core::types::{Gold, ParticipantId, Reputation, TerritoryId};
use crate::core::Timestamp;

/// Temporary attack reduction with an explicit expiry
///
/// No timer fires at expiry; the debuff is cleared lazily on the next read
/// of effective attack power. `now >= expires_at` counts as expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WoundDebuff {
    pub attack_loss: u32,
    pub expires_at: Timestamp,
}

/// One participant's persistent attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub id: ParticipantId,
    pub name: String,
    pub attack_power: u32,
    pub defense_power: u32,
    pub leadership: u32,
    pub gold: Gold,
    /// Global standing; territory-scoped standing tracked separately
    pub reputation: Reputation,
    pub territory_reputation: AHashMap<TerritoryId, Reputation>,
    /// Authoritative ownership is re-synced externally; a lost throne is
    /// not cleared here (avoids local/server divergence)
    pub ruled_territory: Option<TerritoryId>,
    pub wound: Option<WoundDebuff>,
}

impl ParticipantRecord {
    pub fn new(name: impl Into<String>, attack_power: u32, defense_power: u32, gold: Gold) -> Self {
        Self {
            id: ParticipantId::new(),
            name: name.into(),
            attack_power,
            defense_power,
            leadership: STAT_FLOOR,
            gold,
            reputation: 0,
            territory_reputation: AHashMap::new(),
            ruled_territory: None,
            wound: None,
        }
    }

    /// Record after losing a coup as an attacker
    ///
    /// All gold is forfeit (the store transfers it to the new ruler),
    /// reputation drops globally and in the conflict territory, and combat
    /// stats reset to the floor.
    pub fn with_coup_failure(&self, territory: TerritoryId) -> Self {
        let mut next = self.clone();
        next.gold = 0;
        next.reputation -= COUP_FAILURE_REPUTATION_LOSS;
        *next.territory_reputation.entry(territory).or_insert(0) -= COUP_FAILURE_REPUTATION_LOSS;
        next.attack_power = STAT_FLOOR;
        next.defense_power = STAT_FLOOR;
        next.leadership = STAT_FLOOR;
        next
    }

    /// Record after being overthrown by a successful coup
    ///
    /// Gold is zeroed, global reputation drops, standing in the lost
    /// territory resets to zero, and stats drop without going below the
    /// floor. `ruled_territory` is deliberately untouched.
    pub fn with_overthrow(&self, territory: TerritoryId) -> Self {
        let mut next = self.clone();
        next.gold = 0;
        next.reputation -= OVERTHROWN_REPUTATION_LOSS;
        next.territory_reputation.insert(territory, 0);
        next.attack_power = next.attack_power.saturating_sub(OVERTHROWN_STAT_LOSS).max(STAT_FLOOR);
        next.defense_power = next.defense_power.saturating_sub(OVERTHROWN_STAT_LOSS).max(STAT_FLOOR);
        next.leadership = next.leadership.saturating_sub(OVERTHROWN_STAT_LOSS).max(STAT_FLOOR);
        next
    }

    /// Record carrying a fresh wound debuff
    pub fn with_wound(&self, attack_loss: u32, expires_at: Timestamp) -> Self {
        let mut next = self.clone();
        next.wound = Some(WoundDebuff {
            attack_loss,
            expires_at,
        });
        next
    }

    /// Lazy expiry - must run before any read of effective attack power
    pub fn clear_expired_debuffs(&mut self, now: Timestamp) {
        if let Some(wound) = self.wound {
            if now >= wound.expires_at {
                self.wound = None;
            }
        }
    }

    /// Attack power after debuffs, never below the floor
    pub fn effective_attack_power(&mut self, now: Timestamp) -> u32 {
        self.clear_expired_debuffs(now);
        let loss = self.wound.map_or(0, |w| w.attack_loss);
        self.attack_power.saturating_sub(loss).max(STAT_FLOOR)
    }

    /// Read-only variant for stats lookups that must not mutate
    pub fn effective_attack_power_at(&self, now: Timestamp) -> u32 {
        let loss = match self.wound {
            Some(wound) if now < wound.expires_at => wound.attack_loss,
            _ => 0,
        };
        self.attack_power.saturating_sub(loss).max(STAT_FLOOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn veteran() -> ParticipantRecord {
        let mut record = ParticipantRecord::new("Aldric", 12, 9, 600);
        record.leadership = 8;
        record.reputation = 300;
        record
    }

    #[test]
    fn test_coup_failure_resets_stats_to_floor() {
        let territory = TerritoryId::new();
        let before = veteran();
        let after = before.with_coup_failure(territory);

        assert_eq!(after.gold, 0);
        assert_eq!(after.reputation, 200);
        assert_eq!(after.territory_reputation[&territory], -100);
        assert_eq!(after.attack_power, 1);
        assert_eq!(after.defense_power, 1);
        assert_eq!(after.leadership, 1);
        // Pure transformation: the input is untouched
        assert_eq!(before.gold, 600);
    }

    #[test]
    fn test_overthrow_reduces_stats_with_floor() {
        let territory = TerritoryId::new();
        let mut before = veteran();
        before.territory_reputation.insert(territory, 250);
        before.ruled_territory = Some(territory);

        let after = before.with_overthrow(territory);
        assert_eq!(after.gold, 0);
        assert_eq!(after.reputation, 100);
        assert_eq!(after.territory_reputation[&territory], 0);
        assert_eq!(after.attack_power, 7);
        assert_eq!(after.leadership, 3);
        // Throne status waits for the authoritative ownership re-sync
        assert_eq!(after.ruled_territory, Some(territory));
    }

    #[test]
    fn test_overthrow_never_drops_below_floor() {
        let territory = TerritoryId::new();
        let mut weak = veteran();
        weak.attack_power = 3;
        weak.leadership = 2;

        let after = weak.with_overthrow(territory);
        assert_eq!(after.attack_power, 1);
        assert_eq!(after.leadership, 1);
    }

    #[test]
    fn test_effective_attack_never_below_one() {
        let mut record = veteran();
        record.attack_power = 3;
        let mut wounded = record.with_wound(10, Timestamp(1000));

        assert_eq!(wounded.effective_attack_power(Timestamp(500)), 1);
    }

    #[test]
    fn test_debuff_expiry_boundary_is_expired() {
        let record = veteran().with_wound(5, Timestamp(1000));

        // Strictly before expiry the wound still bites
        assert_eq!(record.effective_attack_power_at(Timestamp(999)), 7);
        // At the boundary it is already gone
        assert_eq!(record.effective_attack_power_at(Timestamp(1000)), 12);

        let mut record = record;
        record.clear_expired_debuffs(Timestamp(1000));
        assert!(record.wound.is_none());
    }

    #[test]
    fn test_wound_duration_arithmetic() {
        let now = Timestamp(100);
        let record = veteran().with_wound(1, now + Duration::from_secs(24 * 3600));
        assert_eq!(record.wound.unwrap().expires_at, Timestamp(100 + 86_400));
    }
}
