//! Interfaces the resolver consumes from external collaborators
//!
//! The resolver never reaches into player or territory state directly. It
//! reads combat-relevant numbers through [`StatsSource`] and a point-in-time
//! [`TerritorySnapshot`], so the same resolution code runs against the live
//! kingdom stores, a test fixture, or a scenario file.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{Gold, ParticipantId, Reputation, TerritoryId};
use crate::core::Timestamp;

/// Combat-relevant view of one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub attack_power: u32,
    pub defense_power: u32,
    pub gold: Gold,
    /// Reputation standing per territory the participant has acted in
    #[serde(default)]
    pub reputation: AHashMap<TerritoryId, Reputation>,
}

impl CombatStats {
    pub fn new(attack_power: u32, defense_power: u32, gold: Gold) -> Self {
        Self {
            attack_power,
            defense_power,
            gold,
            reputation: AHashMap::new(),
        }
    }
}

/// Participant-stats lookup
///
/// Identities absent from the source contribute zero strength during
/// resolution (silent skip). `now` lets live stores report wound-adjusted
/// attack power; fixed fixtures ignore it.
pub trait StatsSource: Send + Sync {
    fn combat_stats(&self, id: ParticipantId, now: Timestamp) -> Option<CombatStats>;
}

impl StatsSource for AHashMap<ParticipantId, CombatStats> {
    fn combat_stats(&self, id: ParticipantId, _now: Timestamp) -> Option<CombatStats> {
        self.get(&id).cloned()
    }
}

/// Point-in-time view of the contested territory
///
/// Captured by the caller immediately before resolution; the resolver never
/// re-reads territory state mid-computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerritorySnapshot {
    pub treasury_gold: Gold,
    pub wall_level: u8,
    pub vault_level: u8,
    pub ruler: ParticipantId,
}

/// Territory-snapshot lookup, used by batch resolution
pub trait SnapshotSource: Send + Sync {
    fn territory_snapshot(&self, id: TerritoryId) -> Option<TerritorySnapshot>;
}

impl SnapshotSource for AHashMap<TerritoryId, TerritorySnapshot> {
    fn territory_snapshot(&self, id: TerritoryId) -> Option<TerritorySnapshot> {
        self.get(&id).copied()
    }
}
