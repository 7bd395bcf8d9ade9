//! Territory state - ruler, treasury, and structure levels
//!
//! The conflict engine never mutates a territory directly; it hands back an
//! outcome and this module applies the ownership change, loot withdrawal,
//! and structural damage.

use serde::{Deserialize, Serialize};

use crate::conflict::constants::INVASION_PRODUCTION_DAMAGE;
use crate::conflict::outcome::{CoupOutcome, InvasionOutcome};
use crate::conflict::stats::TerritorySnapshot;
use crate::core::types::{Gold, ParticipantId, TerritoryId};

/// One player-claimable kingdom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerritoryState {
    pub id: TerritoryId,
    pub name: String,
    pub ruler: ParticipantId,
    pub treasury_gold: Gold,
    pub wall_level: u8,
    pub vault_level: u8,
    pub production_level: u8,
}

impl TerritoryState {
    pub fn new(name: impl Into<String>, ruler: ParticipantId) -> Self {
        Self {
            id: TerritoryId::new(),
            name: name.into(),
            ruler,
            treasury_gold: 0,
            wall_level: 0,
            vault_level: 0,
            production_level: 0,
        }
    }

    /// Point-in-time view handed to the resolver
    pub fn snapshot(&self) -> TerritorySnapshot {
        TerritorySnapshot {
            treasury_gold: self.treasury_gold,
            wall_level: self.wall_level,
            vault_level: self.vault_level,
            ruler: self.ruler,
        }
    }

    /// Apply a resolved coup: ownership changes on victory, nothing else
    ///
    /// Coups leave walls and treasury alone - the rebels inherit the
    /// kingdom intact.
    pub fn apply_coup_outcome(&mut self, outcome: &CoupOutcome) {
        if let Some(new_ruler) = outcome.new_ruler {
            tracing::info!(territory = %self.name, ?new_ruler, "throne changed hands by coup");
            self.ruler = new_ruler;
        }
    }

    /// Apply a resolved invasion: loot leaves, structures take damage,
    /// ownership changes - all only on an attacker victory
    pub fn apply_invasion_outcome(&mut self, outcome: &InvasionOutcome) {
        if !outcome.victory {
            return;
        }
        if let Some(new_ruler) = outcome.new_ruler {
            self.ruler = new_ruler;
        }
        self.treasury_gold = self.treasury_gold.saturating_sub(outcome.total_loot());
        self.wall_level = self.wall_level.saturating_sub(outcome.wall_damage);
        if outcome.production_damage {
            self.production_level = self.production_level.saturating_sub(INVASION_PRODUCTION_DAMAGE);
        }
        tracing::info!(
            territory = %self.name,
            looted = outcome.total_loot(),
            wall_level = self.wall_level,
            production_level = self.production_level,
            "invasion consequences applied"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ConflictId;

    fn kingdom() -> TerritoryState {
        let mut t = TerritoryState::new("Saltcliff", ParticipantId::new());
        t.treasury_gold = 1000;
        t.wall_level = 3;
        t.vault_level = 1;
        t.production_level = 1;
        t
    }

    fn invasion_victory(territory: &TerritoryState, loot_per_attacker: Gold) -> InvasionOutcome {
        InvasionOutcome {
            conflict: ConflictId::new(),
            territory: territory.id,
            victory: true,
            attacker_strength: 100.0,
            defender_strength: 10.0,
            attackers: (0..5).map(|_| ParticipantId::new()).collect(),
            defenders: vec![],
            new_ruler: Some(ParticipantId::new()),
            loot_per_attacker,
            wall_damage: 2,
            production_damage: true,
            attacker_wound: None,
        }
    }

    #[test]
    fn test_invasion_victory_changes_ruler_and_damages_structures() {
        let mut territory = kingdom();
        let outcome = invasion_victory(&territory, 160);

        territory.apply_invasion_outcome(&outcome);
        assert_eq!(territory.ruler, outcome.new_ruler.unwrap());
        assert_eq!(territory.treasury_gold, 200); // 1000 - 5*160
        assert_eq!(territory.wall_level, 1);
        assert_eq!(territory.production_level, 0);
    }

    #[test]
    fn test_structure_damage_floors_at_zero() {
        let mut territory = kingdom();
        territory.wall_level = 1;
        territory.production_level = 0;
        let outcome = invasion_victory(&territory, 0);

        territory.apply_invasion_outcome(&outcome);
        assert_eq!(territory.wall_level, 0);
        assert_eq!(territory.production_level, 0);
    }

    #[test]
    fn test_invasion_defeat_leaves_territory_untouched() {
        let mut territory = kingdom();
        let before = territory.clone();
        let mut outcome = invasion_victory(&territory, 160);
        outcome.victory = false;
        outcome.new_ruler = None;

        territory.apply_invasion_outcome(&outcome);
        assert_eq!(territory, before);
    }

    #[test]
    fn test_coup_only_changes_the_throne() {
        let mut territory = kingdom();
        let old_ruler = territory.ruler;
        let new_ruler = ParticipantId::new();
        let outcome = CoupOutcome {
            conflict: ConflictId::new(),
            territory: territory.id,
            victory: true,
            attacker_strength: 50.0,
            defender_strength: 10.0,
            attackers: vec![new_ruler],
            defenders: vec![],
            new_ruler: Some(new_ruler),
            previous_ruler: old_ruler,
        };

        territory.apply_coup_outcome(&outcome);
        assert_eq!(territory.ruler, new_ruler);
        assert_eq!(territory.treasury_gold, 1000);
        assert_eq!(territory.wall_level, 3);
    }
}
