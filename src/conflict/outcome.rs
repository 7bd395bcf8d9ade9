//! Immutable records of resolved conflicts
//!
//! An outcome is written once by the ledger and never mutated. Everything a
//! collaborator needs afterwards - flee rolls, penalty records, structural
//! damage - is derived from it on demand.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::conflict::penalty::ParticipantPenalty;
use crate::conflict::stats::CombatStats;
use crate::core::types::{ConflictId, Gold, ParticipantId, TerritoryId};

/// Result of a resolved coup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoupOutcome {
    pub conflict: ConflictId,
    pub territory: TerritoryId,
    pub victory: bool,
    pub attacker_strength: f64,
    pub defender_strength: f64,
    pub attackers: Vec<ParticipantId>,
    pub defenders: Vec<ParticipantId>,
    /// Set iff the attackers won; always the coup initiator
    pub new_ruler: Option<ParticipantId>,
    /// The ruler deposed (or defended), for the flee computation
    pub previous_ruler: ParticipantId,
}

impl CoupOutcome {
    /// Chance the deposed ruler escapes punitive penalties
    ///
    /// Proportional to the fraction of participants who sided with them.
    /// Zero unless the coup succeeded; zero rosters never divide by zero.
    pub fn flee_chance(&self) -> f64 {
        if !self.victory {
            return 0.0;
        }
        let total = self.attackers.len() + self.defenders.len();
        if total == 0 {
            return 0.0;
        }
        self.defenders.len() as f64 / total as f64
    }

    /// Roll the flee check - the engine's only nondeterministic step
    ///
    /// The rng is injected so tests can force either branch with a seed.
    pub fn did_ruler_flee<R: Rng>(&self, rng: &mut R) -> bool {
        let chance = self.flee_chance();
        if chance <= 0.0 {
            return false;
        }
        rng.gen_range(0.0..1.0) < chance
    }

    /// Penalty for an attacker on the losing side; None after a victory
    pub fn attacker_penalty(&self, attacker: &CombatStats) -> Option<ParticipantPenalty> {
        if self.victory {
            return None;
        }
        Some(ParticipantPenalty::coup_failure(attacker.gold))
    }
}

/// Result of a resolved invasion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvasionOutcome {
    pub conflict: ConflictId,
    pub territory: TerritoryId,
    pub victory: bool,
    pub attacker_strength: f64,
    pub defender_strength: f64,
    pub attackers: Vec<ParticipantId>,
    pub defenders: Vec<ParticipantId>,
    /// Set iff the attackers won; always the attacking ruler
    pub new_ruler: Option<ParticipantId>,
    /// Even share of the raidable treasury per attacker; zero on defeat
    pub loot_per_attacker: Gold,
    /// Wall levels lost by the target on defeat
    pub wall_damage: u8,
    /// Signals the building collaborator to downgrade production
    pub production_damage: bool,
    /// Wound applied to every attacker when the invasion fails
    pub attacker_wound: Option<Duration>,
}

impl InvasionOutcome {
    /// Temporary debuff for an attacker on the losing side; None on victory
    pub fn attacker_debuff(&self) -> Option<ParticipantPenalty> {
        if self.victory {
            return None;
        }
        Some(ParticipantPenalty::invasion_defeat())
    }

    /// Total gold leaving the treasury
    pub fn total_loot(&self) -> Gold {
        self.loot_per_attacker * self.attackers.len() as Gold
    }
}

/// Either kind of resolved conflict, as retained by the ledger history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConflictOutcome {
    Coup(CoupOutcome),
    Invasion(InvasionOutcome),
}

impl ConflictOutcome {
    pub fn victory(&self) -> bool {
        match self {
            ConflictOutcome::Coup(o) => o.victory,
            ConflictOutcome::Invasion(o) => o.victory,
        }
    }

    pub fn territory(&self) -> TerritoryId {
        match self {
            ConflictOutcome::Coup(o) => o.territory,
            ConflictOutcome::Invasion(o) => o.territory,
        }
    }

    pub fn new_ruler(&self) -> Option<ParticipantId> {
        match self {
            ConflictOutcome::Coup(o) => o.new_ruler,
            ConflictOutcome::Invasion(o) => o.new_ruler,
        }
    }
}
