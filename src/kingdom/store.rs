//! Participant store - arena of records keyed by identity
//!
//! Records live in a flat arena with an identity index; every mutation
//! happens under the store lock by swapping in the record a pure penalty
//! transformation produced. Implements [`StatsSource`] so the resolver
//! reads wound-adjusted attack power without ever touching the arena
//! directly.

use ahash::AHashMap;
use std::sync::RwLock;

use crate::conflict::stats::{CombatStats, StatsSource};
use crate::core::error::{ConflictError, Result};
use crate::core::types::{Gold, ParticipantId, TerritoryId};
use crate::core::Timestamp;
use crate::kingdom::participant::ParticipantRecord;

struct Arena {
    records: Vec<ParticipantRecord>,
    index: AHashMap<ParticipantId, usize>,
}

/// Shared, concurrency-safe registry of participant records
pub struct ParticipantStore {
    inner: RwLock<Arena>,
}

impl ParticipantStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Arena {
                records: Vec::new(),
                index: AHashMap::new(),
            }),
        }
    }

    pub fn insert(&self, record: ParticipantRecord) -> ParticipantId {
        let id = record.id;
        let mut arena = self.inner.write().unwrap();
        let slot = arena.records.len();
        arena.records.push(record);
        arena.index.insert(id, slot);
        id
    }

    pub fn get(&self, id: ParticipantId) -> Option<ParticipantRecord> {
        let arena = self.inner.read().unwrap();
        let slot = *arena.index.get(&id)?;
        Some(arena.records[slot].clone())
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn update<F>(&self, id: ParticipantId, f: F) -> Result<()>
    where
        F: FnOnce(&ParticipantRecord) -> ParticipantRecord,
    {
        let mut arena = self.inner.write().unwrap();
        let slot = *arena
            .index
            .get(&id)
            .ok_or(ConflictError::ParticipantNotFound(id))?;
        let next = f(&arena.records[slot]);
        arena.records[slot] = next;
        Ok(())
    }

    /// Apply the coup-failure penalty to one losing attacker
    ///
    /// The loser's entire gold balance transfers to the new ruler; returns
    /// the amount moved.
    pub fn apply_coup_failure(
        &self,
        loser: ParticipantId,
        new_ruler: ParticipantId,
        territory: TerritoryId,
    ) -> Result<Gold> {
        let mut arena = self.inner.write().unwrap();
        let loser_slot = *arena
            .index
            .get(&loser)
            .ok_or(ConflictError::ParticipantNotFound(loser))?;
        let ruler_slot = *arena
            .index
            .get(&new_ruler)
            .ok_or(ConflictError::ParticipantNotFound(new_ruler))?;

        let forfeited = arena.records[loser_slot].gold;
        arena.records[loser_slot] = arena.records[loser_slot].with_coup_failure(territory);
        arena.records[ruler_slot].gold += forfeited;

        tracing::debug!(?loser, ?new_ruler, forfeited, "coup failure penalty applied");
        Ok(forfeited)
    }

    /// Apply the overthrown-ruler penalty after a successful coup
    pub fn apply_overthrown_ruler(
        &self,
        former_ruler: ParticipantId,
        territory: TerritoryId,
    ) -> Result<()> {
        self.update(former_ruler, |record| record.with_overthrow(territory))?;
        tracing::debug!(?former_ruler, ?territory, "overthrown ruler penalty applied");
        Ok(())
    }

    /// Wound a participant until `expires_at`
    pub fn apply_wound_debuff(
        &self,
        id: ParticipantId,
        attack_loss: u32,
        expires_at: Timestamp,
    ) -> Result<()> {
        self.update(id, |record| record.with_wound(attack_loss, expires_at))
    }

    /// Deduct reputation without touching anything else
    pub fn deduct_reputation(&self, id: ParticipantId, amount: i64) -> Result<()> {
        self.update(id, |record| {
            let mut next = record.clone();
            next.reputation -= amount;
            next
        })
    }

    /// Wound-adjusted attack power, clearing any expired debuff in place
    pub fn effective_attack_power(&self, id: ParticipantId, now: Timestamp) -> Result<u32> {
        let mut arena = self.inner.write().unwrap();
        let slot = *arena
            .index
            .get(&id)
            .ok_or(ConflictError::ParticipantNotFound(id))?;
        Ok(arena.records[slot].effective_attack_power(now))
    }
}

impl Default for ParticipantStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsSource for ParticipantStore {
    fn combat_stats(&self, id: ParticipantId, now: Timestamp) -> Option<CombatStats> {
        let arena = self.inner.read().unwrap();
        let slot = *arena.index.get(&id)?;
        let record = &arena.records[slot];
        Some(CombatStats {
            attack_power: record.effective_attack_power_at(now),
            defense_power: record.defense_power,
            gold: record.gold,
            reputation: record.territory_reputation.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coup_failure_transfers_all_gold() {
        let store = ParticipantStore::new();
        let territory = TerritoryId::new();
        let loser = store.insert(ParticipantRecord::new("Bram", 10, 8, 450));
        let ruler = store.insert(ParticipantRecord::new("Maret", 15, 12, 1000));

        let moved = store.apply_coup_failure(loser, ruler, territory).unwrap();
        assert_eq!(moved, 450);
        assert_eq!(store.get(loser).unwrap().gold, 0);
        assert_eq!(store.get(ruler).unwrap().gold, 1450);
        assert_eq!(store.get(loser).unwrap().attack_power, 1);
    }

    #[test]
    fn test_unknown_participant_is_an_error() {
        let store = ParticipantStore::new();
        let result = store.apply_overthrown_ruler(ParticipantId::new(), TerritoryId::new());
        assert!(matches!(result, Err(ConflictError::ParticipantNotFound(_))));
    }

    #[test]
    fn test_stats_source_reports_wound_adjusted_attack() {
        let store = ParticipantStore::new();
        let id = store.insert(ParticipantRecord::new("Edda", 9, 6, 50));
        store.apply_wound_debuff(id, 3, Timestamp(1000)).unwrap();

        let during = store.combat_stats(id, Timestamp(500)).unwrap();
        assert_eq!(during.attack_power, 6);

        let after = store.combat_stats(id, Timestamp(1000)).unwrap();
        assert_eq!(after.attack_power, 9);
    }

    #[test]
    fn test_effective_attack_clears_expired_wound() {
        let store = ParticipantStore::new();
        let id = store.insert(ParticipantRecord::new("Edda", 9, 6, 50));
        store.apply_wound_debuff(id, 3, Timestamp(1000)).unwrap();

        assert_eq!(store.effective_attack_power(id, Timestamp(2000)).unwrap(), 9);
        assert!(store.get(id).unwrap().wound.is_none());
    }
}
