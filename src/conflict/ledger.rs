//! Conflict ledger - owns every live event and serializes access to it
//!
//! Each event sits behind its own mutex (single writer per event), which
//! closes the check-then-act races on joins, launches, and resolution. An
//! event resolves exactly once: a second resolve call returns the stored
//! outcome without recomputing or reapplying anything.
//!
//! The ledger also enforces the one-unresolved-conflict-per-territory rule
//! at open time, and retains terminal events for historical display up to
//! the configured retention.

use ahash::AHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};

use crate::conflict::coup::CoupEvent;
use crate::conflict::invasion::InvasionEvent;
use crate::conflict::outcome::ConflictOutcome;
use crate::conflict::resolver;
use crate::conflict::stats::{SnapshotSource, StatsSource};
use crate::core::config::EngineConfig;
use crate::core::error::{ConflictError, Result};
use crate::core::types::{ConflictId, ConflictSide, ParticipantId, TerritoryId};
use crate::core::Timestamp;

/// Which kind of conflict an event is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    Coup,
    Invasion,
}

impl ConflictKind {
    fn label(self) -> &'static str {
        match self {
            ConflictKind::Coup => "coup",
            ConflictKind::Invasion => "invasion",
        }
    }
}

#[derive(Debug)]
enum LiveEvent {
    Coup(CoupEvent),
    Invasion(InvasionEvent),
}

impl LiveEvent {
    fn kind(&self) -> ConflictKind {
        match self {
            LiveEvent::Coup(_) => ConflictKind::Coup,
            LiveEvent::Invasion(_) => ConflictKind::Invasion,
        }
    }

    /// The territory whose ownership is at stake
    fn contested_territory(&self) -> TerritoryId {
        match self {
            LiveEvent::Coup(c) => c.territory,
            LiveEvent::Invasion(i) => i.target_territory,
        }
    }

    fn outcome(&self) -> Option<ConflictOutcome> {
        match self {
            LiveEvent::Coup(c) => c.outcome().cloned().map(ConflictOutcome::Coup),
            LiveEvent::Invasion(i) => i.outcome().cloned().map(ConflictOutcome::Invasion),
        }
    }
}

struct LedgerState {
    events: AHashMap<ConflictId, Arc<Mutex<LiveEvent>>>,
    /// One unresolved conflict of each kind per territory
    live: AHashMap<(TerritoryId, ConflictKind), ConflictId>,
    /// Terminal events, oldest first; trimmed to the configured retention
    history: VecDeque<ConflictId>,
}

/// Registry of every conflict the engine knows about
pub struct ConflictLedger {
    state: RwLock<LedgerState>,
    config: EngineConfig,
}

impl ConflictLedger {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: RwLock::new(LedgerState {
                events: AHashMap::new(),
                live: AHashMap::new(),
                history: VecDeque::new(),
            }),
            config,
        }
    }

    /// Open a coup against a territory's sitting ruler
    pub fn open_coup(
        &self,
        initiator: ParticipantId,
        territory: TerritoryId,
        territory_name: impl Into<String>,
        now: Timestamp,
    ) -> Result<ConflictId> {
        let event = CoupEvent::open(initiator, territory, territory_name, now);
        let id = event.id;
        self.register(territory, ConflictKind::Coup, id, LiveEvent::Coup(event))?;
        tracing::info!(conflict = ?id, ?territory, ?initiator, "coup opened");
        Ok(id)
    }

    /// Open invasion recruitment against a target territory
    #[allow(clippy::too_many_arguments)]
    pub fn open_invasion(
        &self,
        attacking_territory: TerritoryId,
        attacking_territory_name: impl Into<String>,
        attacking_ruler: ParticipantId,
        attacking_ruler_name: impl Into<String>,
        target_territory: TerritoryId,
        target_territory_name: impl Into<String>,
        now: Timestamp,
    ) -> Result<ConflictId> {
        let event = InvasionEvent::open(
            attacking_territory,
            attacking_territory_name,
            attacking_ruler,
            attacking_ruler_name,
            target_territory,
            target_territory_name,
            now,
        );
        let id = event.id;
        self.register(
            target_territory,
            ConflictKind::Invasion,
            id,
            LiveEvent::Invasion(event),
        )?;
        tracing::info!(conflict = ?id, target = ?target_territory, "invasion recruitment opened");
        Ok(id)
    }

    fn register(
        &self,
        territory: TerritoryId,
        kind: ConflictKind,
        id: ConflictId,
        event: LiveEvent,
    ) -> Result<()> {
        let mut state = self.state.write().unwrap();
        if state.live.contains_key(&(territory, kind)) {
            return Err(ConflictError::TerritoryContested {
                territory,
                kind: kind.label(),
            });
        }
        state.live.insert((territory, kind), id);
        state.events.insert(id, Arc::new(Mutex::new(event)));
        Ok(())
    }

    fn event(&self, id: ConflictId) -> Result<Arc<Mutex<LiveEvent>>> {
        self.state
            .read()
            .unwrap()
            .events
            .get(&id)
            .cloned()
            .ok_or(ConflictError::ConflictNotFound(id))
    }

    /// Join one side of a coup; false if the window is closed
    pub fn join_coup(
        &self,
        id: ConflictId,
        side: ConflictSide,
        participant: ParticipantId,
        now: Timestamp,
    ) -> Result<bool> {
        let event = self.event(id)?;
        let mut guard = event.lock().unwrap();
        match &mut *guard {
            LiveEvent::Coup(coup) => Ok(coup.join(side, participant, now)),
            LiveEvent::Invasion(_) => Err(ConflictError::ConflictNotFound(id)),
        }
    }

    /// Sign up as an invasion attacker; false once launched or expired
    pub fn signup(&self, id: ConflictId, participant: ParticipantId, now: Timestamp) -> Result<bool> {
        let event = self.event(id)?;
        let mut guard = event.lock().unwrap();
        match &mut *guard {
            LiveEvent::Invasion(invasion) => Ok(invasion.signup(participant, now)),
            LiveEvent::Coup(_) => Err(ConflictError::ConflictNotFound(id)),
        }
    }

    /// Launch an invasion; false below the minimum-attacker threshold
    pub fn launch(&self, id: ConflictId, now: Timestamp) -> Result<bool> {
        let event = self.event(id)?;
        let mut guard = event.lock().unwrap();
        match &mut *guard {
            LiveEvent::Invasion(invasion) => {
                let launched = invasion.launch(now);
                if launched {
                    tracing::info!(
                        conflict = ?id,
                        attackers = invasion.signups().len(),
                        "invasion launched, rally window open"
                    );
                }
                Ok(launched)
            }
            LiveEvent::Coup(_) => Err(ConflictError::ConflictNotFound(id)),
        }
    }

    /// Join an invasion's defense during the rally window
    pub fn join_invasion_defender(
        &self,
        id: ConflictId,
        participant: ParticipantId,
        now: Timestamp,
    ) -> Result<bool> {
        let event = self.event(id)?;
        let mut guard = event.lock().unwrap();
        match &mut *guard {
            LiveEvent::Invasion(invasion) => Ok(invasion.join_defender(participant, now)),
            LiveEvent::Coup(_) => Err(ConflictError::ConflictNotFound(id)),
        }
    }

    /// Resolve one event exactly once
    ///
    /// Runs under the event's lock. An already-resolved event returns its
    /// stored outcome with no recomputation; an event before its deadline
    /// is [`ConflictError::ResolutionNotDue`].
    pub fn resolve(
        &self,
        id: ConflictId,
        stats: &dyn StatsSource,
        snapshots: &dyn SnapshotSource,
        now: Timestamp,
    ) -> Result<ConflictOutcome> {
        let event = self.event(id)?;
        let mut guard = event.lock().unwrap();

        // Idempotence: the first resolution is the only one
        if let Some(outcome) = guard.outcome() {
            return Ok(outcome);
        }

        let territory = guard.contested_territory();
        let kind = guard.kind();
        let snapshot = snapshots
            .territory_snapshot(territory)
            .ok_or(ConflictError::TerritoryNotFound(territory))?;

        let outcome = match &mut *guard {
            LiveEvent::Coup(coup) => {
                if !coup.should_resolve(now) {
                    return Err(ConflictError::ResolutionNotDue(id));
                }
                let outcome = resolver::resolve_coup(coup, stats, &snapshot, now);
                coup.record_outcome(outcome.clone());
                ConflictOutcome::Coup(outcome)
            }
            LiveEvent::Invasion(invasion) => {
                if invasion.phase() == crate::conflict::invasion::InvasionPhase::Expired {
                    return Err(ConflictError::ConflictClosed(id));
                }
                if !invasion.should_resolve(now) {
                    return Err(ConflictError::ResolutionNotDue(id));
                }
                let outcome = resolver::resolve_invasion(invasion, stats, &snapshot, now);
                invasion.record_outcome(outcome.clone());
                ConflictOutcome::Invasion(outcome)
            }
        };
        drop(guard);

        tracing::info!(
            conflict = ?id,
            ?territory,
            victory = outcome.victory(),
            "conflict resolved"
        );
        self.retire(id, territory, kind);
        Ok(outcome)
    }

    /// Move a terminal event out of the live index and trim history
    fn retire(&self, id: ConflictId, territory: TerritoryId, kind: ConflictKind) {
        let mut state = self.state.write().unwrap();
        if state.live.get(&(territory, kind)) == Some(&id) {
            state.live.remove(&(territory, kind));
        }
        state.history.push_back(id);
        while state.history.len() > self.config.history_retention {
            if let Some(evicted) = state.history.pop_front() {
                state.events.remove(&evicted);
            }
        }
    }

    /// Ids of events past their deadline and still unresolved
    pub fn due_events(&self, now: Timestamp) -> Vec<ConflictId> {
        let state = self.state.read().unwrap();
        state
            .events
            .values()
            .filter_map(|event| {
                let guard = event.lock().unwrap();
                let due = match &*guard {
                    LiveEvent::Coup(c) => c.should_resolve(now),
                    LiveEvent::Invasion(i) => i.should_resolve(now),
                };
                due.then(|| match &*guard {
                    LiveEvent::Coup(c) => c.id,
                    LiveEvent::Invasion(i) => i.id,
                })
            })
            .collect()
    }

    /// Resolve every due event, in parallel once the batch is large enough
    ///
    /// Independent events share no state, so batch resolution distributes
    /// over rayon when the due count reaches the configured threshold.
    /// Unlaunched invasions past their recruitment deadline are expired in
    /// the same sweep.
    pub fn resolve_due(
        &self,
        stats: &dyn StatsSource,
        snapshots: &dyn SnapshotSource,
        now: Timestamp,
    ) -> Vec<(ConflictId, ConflictOutcome)> {
        self.expire_due(now);

        let due = self.due_events(now);
        if due.is_empty() {
            return Vec::new();
        }

        let resolve_one = |&id: &ConflictId| -> Option<(ConflictId, ConflictOutcome)> {
            match self.resolve(id, stats, snapshots, now) {
                Ok(outcome) => Some((id, outcome)),
                Err(e) => {
                    tracing::warn!(conflict = ?id, error = %e, "batch resolution skipped event");
                    None
                }
            }
        };

        if due.len() >= self.config.parallel_threshold {
            due.par_iter().filter_map(resolve_one).collect()
        } else {
            due.iter().filter_map(resolve_one).collect()
        }
    }

    /// Expire unlaunched invasions whose recruitment window has closed
    pub fn expire_due(&self, now: Timestamp) -> Vec<ConflictId> {
        let candidates: Vec<_> = {
            let state = self.state.read().unwrap();
            state.events.iter().map(|(id, e)| (*id, e.clone())).collect()
        };

        let mut expired = Vec::new();
        for (id, event) in candidates {
            let territory = {
                let mut guard = event.lock().unwrap();
                match &mut *guard {
                    LiveEvent::Invasion(invasion) => {
                        if invasion.expire(now) {
                            Some(invasion.target_territory)
                        } else {
                            None
                        }
                    }
                    _ => None,
                }
            };
            if let Some(territory) = territory {
                tracing::info!(conflict = ?id, "invasion expired below attacker threshold");
                self.retire(id, territory, ConflictKind::Invasion);
                expired.push(id);
            }
        }
        expired
    }

    /// Stored outcome of a resolved conflict, if still retained
    pub fn outcome(&self, id: ConflictId) -> Option<ConflictOutcome> {
        let event = self.event(id).ok()?;
        let guard = event.lock().unwrap();
        guard.outcome()
    }

    /// Snapshot of a coup event for display
    pub fn coup(&self, id: ConflictId) -> Option<CoupEvent> {
        let event = self.event(id).ok()?;
        let guard = event.lock().unwrap();
        match &*guard {
            LiveEvent::Coup(c) => Some(c.clone()),
            LiveEvent::Invasion(_) => None,
        }
    }

    /// Snapshot of an invasion event for display
    pub fn invasion(&self, id: ConflictId) -> Option<InvasionEvent> {
        let event = self.event(id).ok()?;
        let guard = event.lock().unwrap();
        match &*guard {
            LiveEvent::Invasion(i) => Some(i.clone()),
            LiveEvent::Coup(_) => None,
        }
    }

    /// Terminal conflicts, oldest first
    pub fn history(&self) -> Vec<ConflictId> {
        self.state.read().unwrap().history.iter().copied().collect()
    }

    pub fn live_count(&self) -> usize {
        self.state.read().unwrap().live.len()
    }
}

impl Default for ConflictLedger {
    fn default() -> Self {
        Self::new(crate::core::config::config().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::stats::{CombatStats, TerritorySnapshot};

    fn fixtures(
        territory: TerritoryId,
        ruler: ParticipantId,
    ) -> (
        AHashMap<ParticipantId, CombatStats>,
        AHashMap<TerritoryId, TerritorySnapshot>,
    ) {
        let mut snapshots = AHashMap::new();
        snapshots.insert(
            territory,
            TerritorySnapshot {
                treasury_gold: 1000,
                wall_level: 0,
                vault_level: 0,
                ruler,
            },
        );
        (AHashMap::new(), snapshots)
    }

    #[test]
    fn test_second_territory_coup_rejected_while_live() {
        let ledger = ConflictLedger::default();
        let territory = TerritoryId::new();

        ledger
            .open_coup(ParticipantId::new(), territory, "Ravenholm", Timestamp(0))
            .unwrap();
        let second = ledger.open_coup(ParticipantId::new(), territory, "Ravenholm", Timestamp(1));
        assert!(matches!(
            second,
            Err(ConflictError::TerritoryContested { .. })
        ));

        // A different kind on the same territory is fine
        assert!(ledger
            .open_invasion(
                TerritoryId::new(),
                "Ironmoor",
                ParticipantId::new(),
                "Queen Maret",
                territory,
                "Ravenholm",
                Timestamp(2),
            )
            .is_ok());
    }

    #[test]
    fn test_resolve_before_deadline_is_not_due() {
        let ledger = ConflictLedger::default();
        let territory = TerritoryId::new();
        let ruler = ParticipantId::new();
        let (stats, snapshots) = fixtures(territory, ruler);

        let id = ledger
            .open_coup(ParticipantId::new(), territory, "Ravenholm", Timestamp(0))
            .unwrap();
        let result = ledger.resolve(id, &stats, &snapshots, Timestamp(100));
        assert!(matches!(result, Err(ConflictError::ResolutionNotDue(_))));
    }

    #[test]
    fn test_double_resolve_returns_stored_outcome() {
        let ledger = ConflictLedger::default();
        let territory = TerritoryId::new();
        let ruler = ParticipantId::new();
        let (stats, snapshots) = fixtures(territory, ruler);

        let id = ledger
            .open_coup(ParticipantId::new(), territory, "Ravenholm", Timestamp(0))
            .unwrap();

        let first = ledger.resolve(id, &stats, &snapshots, Timestamp(7200)).unwrap();
        let second = ledger.resolve(id, &stats, &snapshots, Timestamp(9999)).unwrap();
        assert_eq!(first, second);
        assert_eq!(ledger.history(), vec![id]);
    }

    #[test]
    fn test_territory_freed_after_resolution() {
        let ledger = ConflictLedger::default();
        let territory = TerritoryId::new();
        let ruler = ParticipantId::new();
        let (stats, snapshots) = fixtures(territory, ruler);

        let id = ledger
            .open_coup(ParticipantId::new(), territory, "Ravenholm", Timestamp(0))
            .unwrap();
        ledger.resolve(id, &stats, &snapshots, Timestamp(7200)).unwrap();

        assert_eq!(ledger.live_count(), 0);
        assert!(ledger
            .open_coup(ParticipantId::new(), territory, "Ravenholm", Timestamp(8000))
            .is_ok());
    }

    #[test]
    fn test_history_retention_evicts_oldest() {
        let mut config = EngineConfig::default();
        config.history_retention = 2;
        let ledger = ConflictLedger::new(config);
        let ruler = ParticipantId::new();

        let mut ids = Vec::new();
        for _ in 0..3 {
            let territory = TerritoryId::new();
            let (stats, snapshots) = fixtures(territory, ruler);
            let id = ledger
                .open_coup(ParticipantId::new(), territory, "Keep", Timestamp(0))
                .unwrap();
            ledger.resolve(id, &stats, &snapshots, Timestamp(7200)).unwrap();
            ids.push(id);
        }

        assert_eq!(ledger.history(), vec![ids[1], ids[2]]);
        assert!(ledger.outcome(ids[0]).is_none());
        assert!(ledger.outcome(ids[2]).is_some());
    }

    #[test]
    fn test_expire_due_retires_stalled_invasion() {
        let ledger = ConflictLedger::default();
        let target = TerritoryId::new();

        let id = ledger
            .open_invasion(
                TerritoryId::new(),
                "Ironmoor",
                ParticipantId::new(),
                "Queen Maret",
                target,
                "Saltcliff",
                Timestamp(0),
            )
            .unwrap();
        ledger.signup(id, ParticipantId::new(), Timestamp(10)).unwrap();

        let expired = ledger.expire_due(Timestamp(24 * 3600 + 1));
        assert_eq!(expired, vec![id]);
        assert_eq!(ledger.live_count(), 0);

        // Terminal state: resolution is refused, not recomputed
        let ruler = ParticipantId::new();
        let (stats, snapshots) = fixtures(target, ruler);
        let result = ledger.resolve(id, &stats, &snapshots, Timestamp(100_000));
        assert!(matches!(result, Err(ConflictError::ConflictClosed(_))));
    }
}
